use std::sync::Arc;

use crate::foundation::core::Size;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image, immutable once created.
///
/// Pixels are premultiplied RGBA8, row-major and tightly packed. Cloning shares the pixel
/// buffer.
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
    origin: String,
}

impl DecodedImage {
    pub(crate) fn from_premul_parts(
        width: u32,
        height: u32,
        rgba8_premul: Vec<u8>,
        origin: impl Into<String>,
    ) -> Self {
        debug_assert_eq!(rgba8_premul.len(), width as usize * height as usize * 4);
        Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
            origin: origin.into(),
        }
    }

    /// Build from a straight-alpha RGBA image, premultiplying its pixels.
    pub fn from_rgba(image: image::RgbaImage, origin: impl Into<String>) -> Self {
        let (width, height) = image.dimensions();
        let mut data = image.into_raw();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_parts(width, height, data, origin)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Dimensions in pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Name of the source this image was decoded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Premultiplied RGBA8 pixel data.
    pub fn rgba8_premul(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`; callers keep coordinates in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
