use crate::{
    foundation::core::{Rgba8Premul, Size},
    grid::model::CellGeometry,
    render::blend::{PremulRgba8, over, unpremultiply},
};

#[derive(Clone, Debug, PartialEq, Eq)]
/// CPU drawing target holding premultiplied RGBA8 pixels, row-major and tightly packed.
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Transparent surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Surface of the given size filled with `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8Premul) -> Self {
        let mut s = Self::new(width, height);
        s.fill(color);
        s
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

    /// Raw premultiplied pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Overwrite every pixel with `color`.
    pub fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulRgba8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = self.offset(x, y);
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Composite `src` over the pixel at `(x, y)`; outside pixels are ignored.
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: PremulRgba8) {
        let Some(dst) = self.pixel(x, y) else {
            return;
        };
        let i = self.offset(x, y);
        self.data[i..i + 4].copy_from_slice(&over(dst, src));
    }

    /// Draw a 1px outline on the boundary pixels of `rect`, clipped to the surface.
    pub fn stroke_rect(&mut self, rect: CellGeometry, color: Rgba8Premul) {
        if rect.width == 0 || rect.height == 0 {
            return;
        }
        let src = color.to_array();
        let x1 = rect.x + rect.width - 1;
        let y1 = rect.y + rect.height - 1;
        for x in rect.x..=x1 {
            self.blend_pixel(x, rect.y, src);
            if y1 != rect.y {
                self.blend_pixel(x, y1, src);
            }
        }
        for y in rect.y + 1..y1 {
            self.blend_pixel(rect.x, y, src);
            if x1 != rect.x {
                self.blend_pixel(x1, y, src);
            }
        }
    }

    /// Straight-alpha copy for encoders.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        image::RgbaImage::from_raw(self.width, self.height, out)
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
