use std::sync::Arc;

use crate::{
    assets::{decoded::DecodedImage, decoder::Decoder, source::SharedSource},
    foundation::{
        core::{Rect, Size},
        error::StitchResult,
    },
    grid::{
        config::{GridConfig, GridConfigPatch, MIN_AUTO_CELL_PX, SizeMode},
        events::{EventBus, GridChange, GridEvent, GridEventKind, SubscriptionId},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// Output-pixel rectangle of one cell, derived from config and index.
pub struct CellGeometry {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl CellGeometry {
    /// Same rectangle as a `kurbo` rect.
    pub fn to_rect(self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.y) + f64::from(self.height),
        )
    }

    /// Whether `(x, y)` lies inside, right and bottom edges excluded.
    pub fn contains(self, x: f64, y: f64) -> bool {
        self.to_rect().contains(kurbo::Point::new(x, y))
    }
}

/// Grid configuration plus the sparse array of cell contents.
///
/// `cells().len() == config().cell_count()` holds after every call. Every mutating call
/// notifies listeners synchronously before returning.
#[derive(Debug)]
pub struct GridModel {
    config: GridConfig,
    cells: Vec<Option<Arc<DecodedImage>>>,
    events: EventBus,
}

impl Default for GridModel {
    fn default() -> Self {
        let config = GridConfig::default();
        Self {
            cells: vec![None; config.cell_count()],
            config,
            events: EventBus::new(),
        }
    }
}

impl GridModel {
    /// Model with the default 2x2 configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Model with an explicit starting configuration.
    pub fn with_config(config: GridConfig) -> StitchResult<Self> {
        config.validate()?;
        Ok(Self {
            cells: vec![None; config.cell_count()],
            config,
            events: EventBus::new(),
        })
    }

    /// Current configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Cell contents in row-major order.
    pub fn cells(&self) -> &[Option<Arc<DecodedImage>>] {
        &self.cells
    }

    /// Content of one cell; `None` when empty or out of range.
    pub fn cell(&self, index: usize) -> Option<&Arc<DecodedImage>> {
        self.cells.get(index).and_then(Option::as_ref)
    }

    /// Number of cells holding an image.
    pub fn populated_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Register a listener for `kind` events.
    pub fn subscribe(
        &mut self,
        kind: GridEventKind,
        handler: impl FnMut(&GridEvent) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(kind, handler)
    }

    /// Remove a listener.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Merge `patch` into the configuration.
    ///
    /// If rows or columns end up different, every cell is reset to empty. Patches that
    /// would produce an invalid configuration are rejected without touching the model.
    pub fn set_config(&mut self, patch: &GridConfigPatch) -> StitchResult<()> {
        let next = patch.apply_to(&self.config);
        next.validate()?;

        let reshaped = next.rows != self.config.rows || next.cols != self.config.cols;
        self.config = next;
        if reshaped {
            self.cells = vec![None; self.config.cell_count()];
            tracing::debug!(
                rows = self.config.rows,
                cols = self.config.cols,
                "grid reshaped, cells reset"
            );
            self.events.emit(&GridEvent::Reshape {
                rows: self.config.rows,
                cols: self.config.cols,
            });
        }
        self.events
            .emit(&GridEvent::Change(GridChange::Config { reshaped }));
        Ok(())
    }

    /// Place `image` in cell `index`. Out-of-range indexes are ignored.
    pub fn set_cell(&mut self, index: usize, image: impl Into<Arc<DecodedImage>>) {
        let Some(slot) = self.cells.get_mut(index) else {
            tracing::trace!(index, "set_cell out of range, ignored");
            return;
        };
        *slot = Some(image.into());

        if self.config.size_mode == SizeMode::Auto {
            self.update_auto_size();
        }
        self.events
            .emit(&GridEvent::Change(GridChange::CellSet { index }));
    }

    /// Empty cell `index`. Out-of-range indexes are ignored.
    pub fn clear_cell(&mut self, index: usize) {
        let Some(slot) = self.cells.get_mut(index) else {
            tracing::trace!(index, "clear_cell out of range, ignored");
            return;
        };
        *slot = None;
        self.events
            .emit(&GridEvent::Change(GridChange::CellCleared { index }));
    }

    /// Empty every cell.
    pub fn clear_all(&mut self) {
        self.cells.iter_mut().for_each(|c| *c = None);
        self.events.emit(&GridEvent::Change(GridChange::AllCleared));
    }

    /// Decode `source` and place the result in cell `index`.
    ///
    /// On decode failure the grid is left untouched and the error is returned.
    pub async fn load_cell(
        &mut self,
        index: usize,
        decoder: &Decoder,
        source: SharedSource,
    ) -> StitchResult<()> {
        let image = decoder.load_image(source).await?;
        self.set_cell(index, image);
        Ok(())
    }

    /// Size of the composed output: cells plus the gaps between them.
    pub fn total_size(&self) -> Size {
        // Accepted configs always fit; saturate rather than wrap if that ever breaks.
        self.config
            .checked_extent()
            .unwrap_or(Size::new(u32::MAX, u32::MAX))
    }

    /// Rectangle of cell `index` (row-major).
    pub fn cell_geometry(&self, index: usize) -> CellGeometry {
        let cols = self.config.cols as usize;
        let col = (index % cols) as u32;
        let row = (index / cols) as u32;
        CellGeometry {
            x: col.saturating_mul(self.config.cell_width.saturating_add(self.config.gap)),
            y: row.saturating_mul(self.config.cell_height.saturating_add(self.config.gap)),
            width: self.config.cell_width,
            height: self.config.cell_height,
        }
    }

    /// Index of the cell containing point `(x, y)`; `None` over gaps or outside the grid.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<usize> {
        if x < 0.0 || y < 0.0 {
            return None;
        }
        let pitch_x = f64::from(self.config.cell_width) + f64::from(self.config.gap);
        let pitch_y = f64::from(self.config.cell_height) + f64::from(self.config.gap);
        let col = (x / pitch_x).floor() as usize;
        let row = (y / pitch_y).floor() as usize;
        if col >= self.config.cols as usize || row >= self.config.rows as usize {
            return None;
        }
        let index = row * self.config.cols as usize + col;
        self.cell_geometry(index).contains(x, y).then_some(index)
    }

    fn update_auto_size(&mut self) {
        let (w, h) = self
            .cells
            .iter()
            .flatten()
            .fold((MIN_AUTO_CELL_PX, MIN_AUTO_CELL_PX), |(w, h), img| {
                (w.max(img.width()), h.max(img.height()))
            });
        let next = GridConfig {
            cell_width: w,
            cell_height: h,
            ..self.config.clone()
        };
        if next.checked_extent().is_none() {
            tracing::warn!(width = w, height = h, "auto cell size too large for the grid, kept previous size");
            return;
        }
        self.config = next;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/model.rs"]
mod tests;
