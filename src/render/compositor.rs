use rayon::prelude::*;

use crate::{
    assets::decoded::DecodedImage,
    foundation::core::{Rect, Rgba8Premul},
    grid::{config::FitMode, model::CellGeometry, model::GridModel},
    render::{
        blend::{bilerp, over},
        fit::{Placement, plan_fit},
        surface::Surface,
    },
};

/// Background every composed output starts from.
pub const BACKGROUND: Rgba8Premul = Rgba8Premul::WHITE;
/// Color of the optional cell outlines.
pub const GRID_LINE_COLOR: Rgba8Premul = Rgba8Premul::GRID_LINE;

/// Draw `image` into the cell at `geometry` using `fit`.
pub fn render_cell(surface: &mut Surface, image: &DecodedImage, geometry: CellGeometry, fit: FitMode) {
    let cell = geometry.to_rect();
    match plan_fit(image.width(), image.height(), cell, fit) {
        None => {}
        Some(Placement::Scaled { src, dst }) => draw_image(surface, image, src, dst, cell),
        Some(Placement::Tiled { .. }) => tile_image(surface, image, geometry),
    }
}

/// Render every cell of `model` onto `surface` in index order: image first, then the cell
/// outline when `show_grid` is set.
///
/// Empty cells draw nothing. The surface is expected to be at least
/// [`GridModel::total_size`] and already cleared to a background.
pub fn render_grid(surface: &mut Surface, model: &GridModel) {
    let config = model.config();
    for (index, cell) in model.cells().iter().enumerate() {
        let geometry = model.cell_geometry(index);
        if let Some(image) = cell {
            render_cell(surface, image, geometry, config.fit_mode);
        }
        if config.show_grid {
            surface.stroke_rect(geometry, GRID_LINE_COLOR);
        }
    }
}

/// Compose the whole grid onto a new white surface sized to [`GridModel::total_size`].
///
/// Rendering an unchanged model twice yields identical pixels.
#[tracing::instrument(skip(model), fields(cells = model.cells().len(), populated = model.populated_count()))]
pub fn render_full(model: &GridModel) -> Surface {
    let size = model.total_size();
    let mut surface = Surface::filled(size.width, size.height, BACKGROUND);
    render_grid(&mut surface, model);
    surface
}

/// Resample the `src` region of `image` onto the `dst` region of `surface`, restricted to
/// `clip`, compositing source-over.
///
/// A surface pixel is covered when its center lies inside `dst` and `clip`. Samples are
/// bilinear and clamped to the texels of `src`, so crops never bleed in pixels from outside
/// the region; a 1:1 mapping at integer offsets copies pixels exactly.
pub fn draw_image(surface: &mut Surface, image: &DecodedImage, src: Rect, dst: Rect, clip: Rect) {
    let (sw, sh) = (surface.width(), surface.height());
    let bounds = Rect::new(0.0, 0.0, f64::from(sw), f64::from(sh));
    let area = dst.intersect(clip).intersect(bounds);
    if area.width() <= 0.0
        || area.height() <= 0.0
        || src.width() <= 0.0
        || src.height() <= 0.0
        || image.width() == 0
        || image.height() == 0
    {
        return;
    }

    let px0 = center_start(area.x0);
    let px1 = center_start(area.x1).min(sw);
    let py0 = center_start(area.y0);
    let py1 = center_start(area.y1).min(sh);
    if px0 >= px1 || py0 >= py1 {
        return;
    }

    let scale_x = src.width() / dst.width();
    let scale_y = src.height() / dst.height();
    let (tx_min, tx_max) = texel_span(src.x0, src.x1, image.width());
    let (ty_min, ty_max) = texel_span(src.y0, src.y1, image.height());

    let stride = sw as usize * 4;
    surface
        .data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(py0 as usize)
        .take((py1 - py0) as usize)
        .for_each(|(py, row)| {
            let v = src.y0 + (py as f64 + 0.5 - dst.y0) * scale_y - 0.5;
            let (y_a, y_b, fy) = taps(v, ty_min, ty_max);
            for px in px0..px1 {
                let u = src.x0 + (f64::from(px) + 0.5 - dst.x0) * scale_x - 0.5;
                let (x_a, x_b, fx) = taps(u, tx_min, tx_max);
                let texel = bilerp(
                    image.pixel(x_a, y_a),
                    image.pixel(x_b, y_a),
                    image.pixel(x_a, y_b),
                    image.pixel(x_b, y_b),
                    fx,
                    fy,
                );
                let i = px as usize * 4;
                let under = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                row[i..i + 4].copy_from_slice(&over(under, texel));
            }
        });
}

/// Repeat `image` at native size from the top-left corner of `geometry`, clipped to it,
/// in one pass over the covered rows.
pub fn tile_image(surface: &mut Surface, image: &DecodedImage, geometry: CellGeometry) {
    let (iw, ih) = (image.width(), image.height());
    if iw == 0 || ih == 0 {
        return;
    }
    let x0 = geometry.x.min(surface.width());
    let y0 = geometry.y.min(surface.height());
    let x1 = geometry.x.saturating_add(geometry.width).min(surface.width());
    let y1 = geometry.y.saturating_add(geometry.height).min(surface.height());
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let stride = surface.width() as usize * 4;
    surface
        .data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .skip(y0 as usize)
        .take((y1 - y0) as usize)
        .for_each(|(py, row)| {
            let sy = (py as u32 - geometry.y) % ih;
            for px in x0..x1 {
                let texel = image.pixel((px - geometry.x) % iw, sy);
                let i = px as usize * 4;
                let under = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                row[i..i + 4].copy_from_slice(&over(under, texel));
            }
        });
}

// First pixel index whose center (`i + 0.5`) is at or beyond `edge`.
fn center_start(edge: f64) -> u32 {
    (edge - 0.5).ceil().max(0.0) as u32
}

fn texel_span(lo: f64, hi: f64, len: u32) -> (u32, u32) {
    let max = len - 1;
    let first = (lo.floor().max(0.0) as u32).min(max);
    let last = ((hi.ceil() as i64 - 1).max(0) as u32).clamp(first, max);
    (first, last)
}

fn taps(coord: f64, min: u32, max: u32) -> (u32, u32, f32) {
    let c = coord.clamp(f64::from(min), f64::from(max));
    let base = c.floor();
    let frac = (c - base) as f32;
    let a = base as u32;
    (a, (a + 1).min(max), frac)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
