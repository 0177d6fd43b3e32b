use std::io::Cursor;

use super::*;
use crate::assets::source::MemorySource;

fn png_bytes(img: image::RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let img = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();

    let decoded = decode_image(&png_bytes(img), "one.png").unwrap();
    assert_eq!(decoded.width(), 1);
    assert_eq!(decoded.height(), 1);
    assert_eq!(decoded.origin(), "one.png");
    assert_eq!(
        decoded.rgba8_premul(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_keeps_row_major_layout() {
    let img = image::RgbaImage::from_fn(3, 2, |x, y| image::Rgba([x as u8 * 10, y as u8 * 10, 0, 255]));
    let decoded = decode_image(&png_bytes(img), "grad.png").unwrap();
    assert_eq!(decoded.pixel(2, 0), [20, 0, 0, 255]);
    assert_eq!(decoded.pixel(1, 1), [10, 10, 0, 255]);
}

#[test]
fn garbage_bytes_are_a_typed_error() {
    let err = decode_image(b"definitely not an image", "junk.bin").unwrap_err();
    assert_eq!(err.source_name(), "junk.bin");
    assert!(matches!(
        err,
        DecodeError::Unsupported { .. } | DecodeError::Corrupt { .. }
    ));
}

#[test]
fn truncated_png_is_corrupt() {
    let img = image::RgbaImage::from_pixel(16, 16, image::Rgba([1, 2, 3, 255]));
    let mut bytes = png_bytes(img);
    bytes.truncate(bytes.len() / 2);
    let err = decode_image(&bytes, "cut.png").unwrap_err();
    assert!(!matches!(err, DecodeError::Cancelled { .. }));
}

#[test]
fn decode_source_reports_read_failures() {
    let source = crate::assets::source::FileSource::new("target/definitely/missing.png");
    let err = decode_source(&source).unwrap_err();
    assert!(matches!(err, DecodeError::Read { .. }));
    assert_eq!(err.source_name(), "missing.png");

    let ok = MemorySource::new(
        "mem.png",
        png_bytes(image::RgbaImage::from_pixel(2, 2, image::Rgba([9, 9, 9, 255]))),
    );
    assert_eq!(decode_source(&ok).unwrap().width(), 2);
}
