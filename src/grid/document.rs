use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    export::encode::ExportOptions,
    foundation::error::{StitchError, StitchResult},
    grid::config::GridConfigPatch,
};

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
/// JSON layout document: grid options, row-major cell image paths and export options.
///
/// ```json
/// {
///   "grid": { "rows": 1, "cols": 2, "fitMode": "cover", "gap": 4 },
///   "cells": ["left.png", null],
///   "export": { "format": "jpeg", "quality": 85 }
/// }
/// ```
pub struct LayoutDocument {
    /// Grid configuration overrides applied on top of the defaults.
    #[serde(default)]
    pub grid: GridConfigPatch,
    /// Image path per cell in row-major order; `null` leaves a cell empty.
    #[serde(default)]
    pub cells: Vec<Option<PathBuf>>,
    /// Output encoding.
    #[serde(default)]
    pub export: ExportOptions,
}

impl LayoutDocument {
    /// Parse a layout document from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> StitchResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| StitchError::validation(format!("parse layout JSON: {e}")))
    }

    /// Parse a layout document from disk; relative cell paths are resolved against the
    /// document's directory.
    pub fn from_path(path: impl AsRef<Path>) -> StitchResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StitchError::validation(format!("open layout JSON '{}': {e}", path.display()))
        })?;
        let mut doc = Self::from_reader(BufReader::new(f))?;
        if let Some(root) = path.parent() {
            doc.resolve_relative_to(root);
        }
        Ok(doc)
    }

    /// Rebase every relative cell path onto `root`.
    pub fn resolve_relative_to(&mut self, root: &Path) {
        for p in self.cells.iter_mut().flatten() {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/document.rs"]
mod tests;
