use super::*;

#[test]
fn premultiply_scales_color_channels() {
    let c = Rgba8Premul::from_straight_rgba(200, 100, 50, 128);
    assert_eq!(c.a, 128);
    assert_eq!(c.r, ((200u16 * 128 + 127) / 255) as u8);
    assert_eq!(c.g, ((100u16 * 128 + 127) / 255) as u8);
    assert_eq!(c.b, ((50u16 * 128 + 127) / 255) as u8);
}

#[test]
fn opaque_colors_are_unchanged_by_premultiplication() {
    assert_eq!(
        Rgba8Premul::from_straight_rgba(0xe0, 0xe0, 0xe0, 255),
        Rgba8Premul::GRID_LINE
    );
    assert_eq!(Rgba8Premul::WHITE.to_array(), [255, 255, 255, 255]);
}

#[test]
fn size_area_and_emptiness() {
    assert_eq!(Size::new(3, 4).area(), 12);
    assert!(Size::new(0, 4).is_empty());
    assert!(!Size::new(1, 1).is_empty());
}
