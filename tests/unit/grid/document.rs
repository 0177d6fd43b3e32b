use super::*;
use crate::{export::encode::OutputFormat, grid::config::FitMode};

#[test]
fn parses_full_document() {
    let json = r#"{
        "grid": { "rows": 1, "cols": 2, "fitMode": "cover", "gap": 4 },
        "cells": ["left.png", null],
        "export": { "format": "jpeg", "quality": 85 }
    }"#;
    let doc = LayoutDocument::from_reader(json.as_bytes()).unwrap();
    assert_eq!(doc.grid.rows, Some(1));
    assert_eq!(doc.grid.fit_mode, Some(FitMode::Cover));
    assert_eq!(doc.cells, vec![Some(PathBuf::from("left.png")), None]);
    assert_eq!(doc.export.format, OutputFormat::Jpeg);
    assert_eq!(doc.export.quality.get(), 85);
}

#[test]
fn empty_document_uses_defaults() {
    let doc = LayoutDocument::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(doc, LayoutDocument::default());
}

#[test]
fn unknown_fields_are_rejected() {
    let err = LayoutDocument::from_reader(r#"{"grd":{}}"#.as_bytes()).unwrap_err();
    assert!(matches!(err, StitchError::Validation(_)));
}

#[test]
fn relative_paths_resolve_against_document_dir() {
    let dir = PathBuf::from("target").join("unit_layout_document");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("layout.json");
    std::fs::write(&path, r#"{"cells":["a.png",null,"/abs/b.png"]}"#).unwrap();

    let doc = LayoutDocument::from_path(&path).unwrap();
    assert_eq!(doc.cells[0], Some(dir.join("a.png")));
    assert_eq!(doc.cells[1], None);
    assert_eq!(doc.cells[2], Some(PathBuf::from("/abs/b.png")));
}
