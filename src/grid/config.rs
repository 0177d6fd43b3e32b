use std::{fmt, str::FromStr};

use crate::foundation::{
    core::Size,
    error::{StitchError, StitchResult},
};

/// Smallest cell edge produced by auto sizing, so a single small image never collapses the grid.
pub const MIN_AUTO_CELL_PX: u32 = 100;
/// Lower bound applied to operator-entered cell sizes.
pub const MIN_CELL_INPUT_PX: u32 = 50;
/// Upper bound applied to operator-entered cell sizes.
pub const MAX_CELL_INPUT_PX: u32 = 2000;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Policy for mapping an image rectangle onto a cell rectangle.
pub enum FitMode {
    /// Scale uniformly until the whole image fits, centered; may leave background bars.
    #[default]
    Contain,
    /// Scale uniformly until the cell is filled, cropping the overflowing axis symmetrically.
    Cover,
    /// Scale each axis independently to the cell size.
    Stretch,
    /// Repeat the image at native resolution from the top-left corner, clipped to the cell.
    Tile,
}

impl FitMode {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contain => "contain",
            Self::Cover => "cover",
            Self::Stretch => "stretch",
            Self::Tile => "tile",
        }
    }
}

impl fmt::Display for FitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitMode {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "contain" => Ok(Self::Contain),
            "cover" => Ok(Self::Cover),
            "stretch" => Ok(Self::Stretch),
            "tile" => Ok(Self::Tile),
            other => Err(StitchError::validation(format!(
                "unknown fit mode '{other}' (expected contain, cover, stretch or tile)"
            ))),
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Whether cell dimensions are operator-fixed or derived from loaded content.
pub enum SizeMode {
    /// Cells keep the configured `cell_width` / `cell_height`.
    #[default]
    Fixed,
    /// Cells grow to the largest loaded image, never below [`MIN_AUTO_CELL_PX`].
    Auto,
}

impl FromStr for SizeMode {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "auto" => Ok(Self::Auto),
            other => Err(StitchError::validation(format!(
                "unknown size mode '{other}' (expected fixed or auto)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Grid configuration: shape, cell size, spacing and drawing policy.
pub struct GridConfig {
    /// Row count, at least 1.
    pub rows: u32,
    /// Column count, at least 1.
    pub cols: u32,
    /// Cell width in output pixels.
    pub cell_width: u32,
    /// Cell height in output pixels.
    pub cell_height: u32,
    /// Spacing between neighbouring cells in output pixels.
    pub gap: u32,
    /// Draw a light outline around every cell.
    pub show_grid: bool,
    /// Fit policy applied to every populated cell.
    pub fit_mode: FitMode,
    /// Fixed or content-derived cell size.
    pub size_mode: SizeMode,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 2,
            cell_width: 300,
            cell_height: 300,
            gap: 0,
            show_grid: false,
            fit_mode: FitMode::Contain,
            size_mode: SizeMode::Fixed,
        }
    }
}

impl GridConfig {
    /// Number of addressable cells (`rows * cols`).
    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.cols as usize
    }

    /// Check the structural invariants the model relies on.
    pub fn validate(&self) -> StitchResult<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(StitchError::validation(format!(
                "grid must have at least one row and one column (got {}x{})",
                self.rows, self.cols
            )));
        }
        if self.cell_width == 0 || self.cell_height == 0 {
            return Err(StitchError::validation(format!(
                "cell size must be positive (got {}x{})",
                self.cell_width, self.cell_height
            )));
        }
        if self.checked_extent().is_none() {
            return Err(StitchError::validation(format!(
                "grid of {}x{} cells at {}x{} px with gap {} exceeds the maximum output size",
                self.rows, self.cols, self.cell_width, self.cell_height, self.gap
            )));
        }
        Ok(())
    }

    /// Output size in pixels, `None` when a side does not fit in `u32`.
    pub fn checked_extent(&self) -> Option<Size> {
        fn side(count: u32, cell: u32, gap: u32) -> Option<u32> {
            count
                .checked_mul(cell)?
                .checked_add(count.saturating_sub(1).checked_mul(gap)?)
        }
        Some(Size::new(
            side(self.cols, self.cell_width, self.gap)?,
            side(self.rows, self.cell_height, self.gap)?,
        ))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Partial [`GridConfig`]; `None` fields are left as they are when merged.
pub struct GridConfigPatch {
    /// New row count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    /// New column count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    /// New cell width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_width: Option<u32>,
    /// New cell height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_height: Option<u32>,
    /// New gap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    /// New outline toggle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_grid: Option<bool>,
    /// New fit mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit_mode: Option<FitMode>,
    /// New size mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_mode: Option<SizeMode>,
}

impl GridConfigPatch {
    /// Set rows and columns together.
    pub fn layout(mut self, rows: u32, cols: u32) -> Self {
        self.rows = Some(rows);
        self.cols = Some(cols);
        self
    }

    /// Set the cell size as given.
    pub fn cell_size(mut self, width: u32, height: u32) -> Self {
        self.cell_width = Some(width);
        self.cell_height = Some(height);
        self
    }

    /// Set an operator-entered cell size, clamped to
    /// [`MIN_CELL_INPUT_PX`]..=[`MAX_CELL_INPUT_PX`].
    pub fn cell_size_clamped(self, width: u32, height: u32) -> Self {
        self.cell_size(
            width.clamp(MIN_CELL_INPUT_PX, MAX_CELL_INPUT_PX),
            height.clamp(MIN_CELL_INPUT_PX, MAX_CELL_INPUT_PX),
        )
    }

    /// Set the gap.
    pub fn gap(mut self, gap: u32) -> Self {
        self.gap = Some(gap);
        self
    }

    /// Set the outline toggle.
    pub fn show_grid(mut self, show: bool) -> Self {
        self.show_grid = Some(show);
        self
    }

    /// Set the fit mode.
    pub fn fit_mode(mut self, mode: FitMode) -> Self {
        self.fit_mode = Some(mode);
        self
    }

    /// Set the size mode.
    pub fn size_mode(mut self, mode: SizeMode) -> Self {
        self.size_mode = Some(mode);
        self
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(mut self, other: &GridConfigPatch) -> Self {
        macro_rules! take {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        take!(rows, cols, cell_width, cell_height, gap, show_grid, fit_mode, size_mode);
        self
    }

    /// Produce the config that results from merging this patch into `base`.
    pub fn apply_to(&self, base: &GridConfig) -> GridConfig {
        GridConfig {
            rows: self.rows.unwrap_or(base.rows),
            cols: self.cols.unwrap_or(base.cols),
            cell_width: self.cell_width.unwrap_or(base.cell_width),
            cell_height: self.cell_height.unwrap_or(base.cell_height),
            gap: self.gap.unwrap_or(base.gap),
            show_grid: self.show_grid.unwrap_or(base.show_grid),
            fit_mode: self.fit_mode.unwrap_or(base.fit_mode),
            size_mode: self.size_mode.unwrap_or(base.size_mode),
        }
    }
}

/// Parse a layout preset such as `"2x2"` or `"1x3"` (rows x columns) into a patch.
pub fn parse_layout_preset(preset: &str) -> StitchResult<GridConfigPatch> {
    let invalid = || StitchError::validation(format!("invalid layout preset '{preset}' (expected RxC)"));

    let (rows, cols) = preset
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(invalid)?;
    let rows: u32 = rows.trim().parse().map_err(|_| invalid())?;
    let cols: u32 = cols.trim().parse().map_err(|_| invalid())?;
    if rows == 0 || cols == 0 {
        return Err(invalid());
    }
    Ok(GridConfigPatch::default().layout(rows, cols))
}

#[cfg(test)]
#[path = "../../tests/unit/grid/config.rs"]
mod tests;
