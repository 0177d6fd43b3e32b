//! Fit planning: where a source image lands inside a destination cell.
//!
//! Pure geometry, no pixels. `src` rectangles are in image pixel space, `dst` and `clip`
//! rectangles are in surface space.

use crate::{foundation::core::Rect, grid::config::FitMode};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Result of fitting an image into a cell.
pub enum Placement {
    /// Draw the `src` region of the image scaled onto `dst`.
    Scaled {
        /// Sampled image region.
        src: Rect,
        /// Covered surface region.
        dst: Rect,
    },
    /// Repeat the whole image at native size starting at `clip`'s top-left corner.
    Tiled {
        /// Cell rectangle every tile is clipped to.
        clip: Rect,
        /// Native image width.
        tile_width: f64,
        /// Native image height.
        tile_height: f64,
        /// Tiles per row, `ceil(cell_width / tile_width)`.
        tiles_x: u32,
        /// Tiles per column, `ceil(cell_height / tile_height)`.
        tiles_y: u32,
    },
}

impl Placement {
    /// Unclipped tile rectangles in row-major order; empty for scaled placements.
    pub fn tile_rects(&self) -> Vec<Rect> {
        let Self::Tiled {
            clip,
            tile_width,
            tile_height,
            tiles_x,
            tiles_y,
        } = *self
        else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(tiles_x as usize * tiles_y as usize);
        for ty in 0..tiles_y {
            for tx in 0..tiles_x {
                let x0 = clip.x0 + f64::from(tx) * tile_width;
                let y0 = clip.y0 + f64::from(ty) * tile_height;
                out.push(Rect::new(x0, y0, x0 + tile_width, y0 + tile_height));
            }
        }
        out
    }
}

/// Plan how an `image_width` x `image_height` image is placed into `cell` under `mode`.
///
/// Returns `None` when the image or the cell has no area.
pub fn plan_fit(image_width: u32, image_height: u32, cell: Rect, mode: FitMode) -> Option<Placement> {
    let (iw, ih) = (f64::from(image_width), f64::from(image_height));
    let (cw, ch) = (cell.width(), cell.height());
    if iw <= 0.0 || ih <= 0.0 || cw <= 0.0 || ch <= 0.0 {
        return None;
    }
    let full = Rect::new(0.0, 0.0, iw, ih);

    let placement = match mode {
        FitMode::Contain => {
            let scale = (cw / iw).min(ch / ih);
            let (dw, dh) = (iw * scale, ih * scale);
            let x0 = cell.x0 + (cw - dw) / 2.0;
            let y0 = cell.y0 + (ch - dh) / 2.0;
            Placement::Scaled {
                src: full,
                dst: Rect::new(x0, y0, x0 + dw, y0 + dh),
            }
        }
        FitMode::Cover => {
            let scale = (cw / iw).max(ch / ih);
            let (sw, sh) = ((cw / scale).min(iw), (ch / scale).min(ih));
            let sx = (iw - sw) / 2.0;
            let sy = (ih - sh) / 2.0;
            Placement::Scaled {
                src: Rect::new(sx, sy, sx + sw, sy + sh),
                dst: cell,
            }
        }
        FitMode::Stretch => Placement::Scaled {
            src: full,
            dst: cell,
        },
        FitMode::Tile => Placement::Tiled {
            clip: cell,
            tile_width: iw,
            tile_height: ih,
            tiles_x: (cw / iw).ceil() as u32,
            tiles_y: (ch / ih).ceil() as u32,
        },
    };
    Some(placement)
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
