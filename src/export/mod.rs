pub(crate) mod encode;
pub(crate) mod naming;
pub(crate) mod sink;

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::{
    export::{
        encode::{ExportOptions, encode_surface},
        naming::export_file_name,
        sink::OutputSink,
    },
    foundation::{core::Size, error::StitchResult},
    grid::model::GridModel,
    render::compositor::render_full,
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Record of a persisted interactive export.
pub struct ExportedFile {
    /// Generated file name, `stitched-<timestamp>.<ext>`.
    pub filename: String,
    /// Where the sink put it.
    pub location: PathBuf,
    /// Pixel size of the encoded image.
    pub size: Size,
    /// Encoded byte length.
    pub bytes: usize,
}

/// Render the whole grid, encode it and hand it to `sink` under a timestamped name.
pub fn export_grid(
    model: &GridModel,
    options: &ExportOptions,
    sink: &mut dyn OutputSink,
) -> StitchResult<ExportedFile> {
    export_grid_at(model, options, sink, Utc::now())
}

/// [`export_grid`] with an explicit timestamp for the generated file name.
#[tracing::instrument(skip(model, sink), fields(format = ?options.format))]
pub fn export_grid_at(
    model: &GridModel,
    options: &ExportOptions,
    sink: &mut dyn OutputSink,
    at: DateTime<Utc>,
) -> StitchResult<ExportedFile> {
    let surface = render_full(model);
    let encoded = encode_surface(&surface, options)?;
    let filename = export_file_name(options.format, at);
    let location = sink.persist(&filename, &encoded)?;
    tracing::info!(file = %location.display(), width = surface.width(), height = surface.height(), "exported grid");
    Ok(ExportedFile {
        filename,
        location,
        size: surface.size(),
        bytes: encoded.len(),
    })
}
