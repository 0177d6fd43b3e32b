use super::*;

#[test]
fn default_config_matches_documented_defaults() {
    let cfg = GridConfig::default();
    assert_eq!((cfg.rows, cfg.cols), (2, 2));
    assert_eq!((cfg.cell_width, cfg.cell_height), (300, 300));
    assert_eq!(cfg.gap, 0);
    assert!(!cfg.show_grid);
    assert_eq!(cfg.fit_mode, FitMode::Contain);
    assert_eq!(cfg.size_mode, SizeMode::Fixed);
    assert_eq!(cfg.cell_count(), 4);
}

#[test]
fn validate_rejects_degenerate_shapes() {
    let mut cfg = GridConfig::default();
    cfg.validate().unwrap();

    cfg.rows = 0;
    assert!(matches!(cfg.validate(), Err(StitchError::Validation(_))));

    let cfg = GridConfig {
        cell_height: 0,
        ..GridConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn patch_only_overrides_set_fields() {
    let base = GridConfig::default();
    let patch = GridConfigPatch::default()
        .gap(8)
        .fit_mode(FitMode::Cover);
    let out = patch.apply_to(&base);
    assert_eq!(out.gap, 8);
    assert_eq!(out.fit_mode, FitMode::Cover);
    assert_eq!(out.rows, base.rows);
    assert_eq!(out.cell_width, base.cell_width);
}

#[test]
fn merge_prefers_the_overlay() {
    let a = GridConfigPatch::default().layout(1, 3).gap(4);
    let b = GridConfigPatch::default().gap(10).show_grid(true);
    let m = a.merge(&b);
    assert_eq!(m.rows, Some(1));
    assert_eq!(m.cols, Some(3));
    assert_eq!(m.gap, Some(10));
    assert_eq!(m.show_grid, Some(true));
}

#[test]
fn operator_cell_sizes_are_clamped() {
    let p = GridConfigPatch::default().cell_size_clamped(10, 5000);
    assert_eq!(p.cell_width, Some(MIN_CELL_INPUT_PX));
    assert_eq!(p.cell_height, Some(MAX_CELL_INPUT_PX));
}

#[test]
fn layout_presets_parse() {
    let p = parse_layout_preset("2x3").unwrap();
    assert_eq!((p.rows, p.cols), (Some(2), Some(3)));
    let p = parse_layout_preset(" 1X4 ").unwrap();
    assert_eq!((p.rows, p.cols), (Some(1), Some(4)));

    assert!(parse_layout_preset("0x2").is_err());
    assert!(parse_layout_preset("3").is_err());
    assert!(parse_layout_preset("ax2").is_err());
}

#[test]
fn modes_parse_case_insensitively() {
    assert_eq!("Cover".parse::<FitMode>().unwrap(), FitMode::Cover);
    assert_eq!("tile".parse::<FitMode>().unwrap(), FitMode::Tile);
    assert_eq!("AUTO".parse::<SizeMode>().unwrap(), SizeMode::Auto);
    assert!("zoom".parse::<FitMode>().is_err());
}

#[test]
fn config_json_uses_camel_case_option_names() {
    let json = serde_json::to_value(GridConfig::default()).unwrap();
    assert_eq!(json["cellWidth"], 300);
    assert_eq!(json["fitMode"], "contain");
    assert_eq!(json["sizeMode"], "fixed");

    let patch: GridConfigPatch =
        serde_json::from_str(r#"{"rows":3,"fitMode":"tile","showGrid":true}"#).unwrap();
    assert_eq!(patch.rows, Some(3));
    assert_eq!(patch.fit_mode, Some(FitMode::Tile));
    assert_eq!(patch.show_grid, Some(true));
    assert_eq!(patch.cols, None);
}

#[test]
fn checked_extent_detects_overflow() {
    let cfg = GridConfig {
        rows: 2,
        cols: 3,
        cell_width: 10,
        cell_height: 20,
        gap: 5,
        ..GridConfig::default()
    };
    assert_eq!(cfg.checked_extent(), Some(Size::new(40, 45)));

    let wide = GridConfig {
        cols: 3,
        cell_width: 2_000_000_000,
        ..GridConfig::default()
    };
    assert_eq!(wide.checked_extent(), None);
    assert!(matches!(wide.validate(), Err(StitchError::Validation(_))));
}
