//! Gridstitch composites images onto a fixed grid and merges numbered image pairs in batches.
//!
//! - Configure a [`GridModel`], fill its cells through a [`Decoder`], then [`render_full`]
//!   or [`export_grid`] the result
//! - Pair files with [`find_matches`] and merge every pair with [`BatchProcessor::process`]
//!
//! Decoding is limited to [`MAX_CONCURRENT_DECODES`] at a time and needs a Tokio runtime.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod assets;
pub(crate) mod batch;
pub(crate) mod export;
pub(crate) mod grid;
pub(crate) mod render;

pub use crate::foundation::core::{Rect, Rgba8Premul, Size};
pub use crate::foundation::error::{DecodeError, StitchError, StitchResult};

pub use crate::grid::config::{
    FitMode, GridConfig, GridConfigPatch, MAX_CELL_INPUT_PX, MIN_AUTO_CELL_PX, MIN_CELL_INPUT_PX,
    SizeMode, parse_layout_preset,
};
pub use crate::grid::document::LayoutDocument;
pub use crate::grid::events::{EventBus, GridChange, GridEvent, GridEventKind, SubscriptionId};
pub use crate::grid::model::{CellGeometry, GridModel};

pub use crate::assets::decode::{decode_image, decode_source};
pub use crate::assets::decoded::DecodedImage;
pub use crate::assets::decoder::{DecodeHandle, Decoder, MAX_CONCURRENT_DECODES};
pub use crate::assets::source::{
    FileSource, IMAGE_EXTENSIONS, ImageSource, MemorySource, SharedSource, collect_image_files,
    is_image_file_name,
};

pub use crate::render::blend::{PremulRgba8, bilerp, over, unpremultiply};
pub use crate::render::compositor::{
    BACKGROUND, GRID_LINE_COLOR, draw_image, render_cell, render_full, render_grid, tile_image,
};
pub use crate::render::fit::{Placement, plan_fit};
pub use crate::render::surface::Surface;

pub use crate::export::encode::{ExportOptions, OutputFormat, Quality, encode_surface};
pub use crate::export::naming::{batch_file_name, export_file_name};
pub use crate::export::sink::{DirectorySink, MemorySink, OutputSink};
pub use crate::export::{ExportedFile, export_grid, export_grid_at};

pub use crate::batch::pattern::{BatchMatch, NamePattern, PLACEHOLDER, file_stem, find_matches};
pub use crate::batch::pipeline::{
    BatchItemResult, BatchOptions, BatchOutcome, BatchProcessor, BatchProgress, BatchReport,
    MergeMode, compose_pair,
};
