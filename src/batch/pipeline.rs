use std::{
    fmt,
    path::PathBuf,
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
};

use crate::{
    assets::{decoded::DecodedImage, decoder::Decoder, source::SharedSource},
    batch::pattern::{BatchMatch, find_matches},
    export::{
        encode::{ExportOptions, OutputFormat, Quality, encode_surface},
        naming::batch_file_name,
        sink::OutputSink,
    },
    foundation::{
        core::Rect,
        error::{StitchError, StitchResult},
    },
    render::{
        compositor::{BACKGROUND, draw_image},
        surface::Surface,
    },
};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
/// Axis along which the two images of a pair are placed.
pub enum MergeMode {
    /// Side by side: `2w x h`.
    #[default]
    Horizontal,
    /// Stacked: `w x 2h`.
    Vertical,
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

impl FromStr for MergeMode {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(StitchError::validation(format!(
                "unknown merge mode '{other}' (expected horizontal or vertical)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Options for one batch run.
pub struct BatchOptions {
    /// File name pattern with a single `{n}` placeholder.
    pub pattern: String,
    /// Placement axis.
    pub mode: MergeMode,
    /// Width every image is drawn at.
    pub target_width: u32,
    /// Height every image is drawn at.
    pub target_height: u32,
    /// Output format.
    pub format: OutputFormat,
    /// Quality for lossy formats.
    pub quality: Quality,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            pattern: "img{n}".to_string(),
            mode: MergeMode::Horizontal,
            target_width: 800,
            target_height: 800,
            format: OutputFormat::Png,
            quality: Quality::DEFAULT,
        }
    }
}

impl BatchOptions {
    /// Reject options that cannot produce any output.
    pub fn validate(&self) -> StitchResult<()> {
        if self.target_width == 0 || self.target_height == 0 {
            return Err(StitchError::validation(format!(
                "batch target size must be positive (got {}x{})",
                self.target_width, self.target_height
            )));
        }
        let doubled = match self.mode {
            MergeMode::Horizontal => self.target_width.checked_mul(2),
            MergeMode::Vertical => self.target_height.checked_mul(2),
        };
        if doubled.is_none() {
            return Err(StitchError::validation(format!(
                "batch target size {}x{} is too large for {} merging",
                self.target_width, self.target_height, self.mode
            )));
        }
        Ok(())
    }

    fn export_options(&self) -> ExportOptions {
        ExportOptions {
            format: self.format,
            quality: self.quality,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Progress after a match resolved, successfully or not.
pub struct BatchProgress {
    /// Matches resolved so far.
    pub completed: usize,
    /// Matches in this run.
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
/// What happened to one match.
pub enum BatchOutcome {
    /// Output was encoded and persisted.
    Saved {
        /// Generated output file name.
        filename: String,
        /// Where the sink stored it.
        location: PathBuf,
    },
    /// Processing stopped for this match; the run continued.
    Failed {
        /// Human-readable reason.
        error: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
/// Itemized result for one match.
pub struct BatchItemResult {
    /// Match name, `<prefix><n>-<n+1>`.
    pub name: String,
    /// Outcome.
    #[serde(flatten)]
    pub outcome: BatchOutcome,
}

impl BatchItemResult {
    /// Whether the item was persisted.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Saved { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
/// Results of a whole run, in match order.
pub struct BatchReport {
    /// One entry per match.
    pub items: Vec<BatchItemResult>,
}

impl BatchReport {
    /// Number of persisted items.
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|i| i.is_success()).count()
    }

    /// Number of failed items.
    pub fn failed(&self) -> usize {
        self.items.len() - self.succeeded()
    }
}

/// Runs batch merges one at a time.
///
/// A second [`BatchProcessor::process`] call while one is active is rejected with
/// [`StitchError::BatchInProgress`] and does not disturb the active run.
#[derive(Debug, Default)]
pub struct BatchProcessor {
    running: AtomicBool,
}

struct RunGuard<'a>(&'a AtomicBool);

impl<'a> RunGuard<'a> {
    fn claim(flag: &'a AtomicBool) -> StitchResult<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StitchError::BatchInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BatchProcessor {
    /// Idle processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a run is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Pair `files` by `options.pattern` and merge every pair, strictly one after another.
    ///
    /// Per-match failures (decode, encode, persist) are recorded in the report and the run
    /// moves on. `progress` is called after every match. Only a concurrent run or invalid
    /// options fail the call itself.
    #[tracing::instrument(skip_all, fields(pattern = %options.pattern, files = files.len()))]
    pub async fn process(
        &self,
        files: &[SharedSource],
        options: &BatchOptions,
        decoder: &Decoder,
        sink: &mut dyn OutputSink,
        mut progress: impl FnMut(BatchProgress),
    ) -> StitchResult<BatchReport> {
        let _guard = RunGuard::claim(&self.running)?;
        options.validate()?;

        let matches = find_matches(files, &options.pattern);
        let total = matches.len();
        tracing::info!(total, mode = %options.mode, "batch started");

        let mut report = BatchReport::default();
        for (i, m) in matches.iter().enumerate() {
            let outcome = match process_match(m, options, decoder, sink).await {
                Ok((filename, location)) => {
                    tracing::info!(name = %m.name, file = %location.display(), "batch item saved");
                    BatchOutcome::Saved { filename, location }
                }
                Err(err) => {
                    tracing::warn!(name = %m.name, error = %err, "batch item failed");
                    BatchOutcome::Failed {
                        error: err.to_string(),
                    }
                }
            };
            report.items.push(BatchItemResult {
                name: m.name.clone(),
                outcome,
            });
            progress(BatchProgress {
                completed: i + 1,
                total,
            });
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "batch finished"
        );
        Ok(report)
    }
}

async fn process_match(
    m: &BatchMatch,
    options: &BatchOptions,
    decoder: &Decoder,
    sink: &mut dyn OutputSink,
) -> StitchResult<(String, PathBuf)> {
    let [first, second] = &m.files;
    let first = decoder.load_image(first.clone());
    let second = decoder.load_image(second.clone());
    let (first, second) = (first.await, second.await);
    let images = [first?, second?];

    let surface = compose_pair(
        &images,
        options.mode,
        options.target_width,
        options.target_height,
    );
    let encoded = encode_surface(&surface, &options.export_options())?;
    let filename = batch_file_name(&m.name, options.format);
    let location = sink.persist(&filename, &encoded)?;
    Ok((filename, location))
}

/// Merge two images onto a white surface, each stretched to exactly `width x height`,
/// the second one offset along the `mode` axis.
pub fn compose_pair(images: &[DecodedImage; 2], mode: MergeMode, width: u32, height: u32) -> Surface {
    let (out_w, out_h) = match mode {
        MergeMode::Horizontal => (width * 2, height),
        MergeMode::Vertical => (width, height * 2),
    };
    let mut surface = Surface::filled(out_w, out_h, BACKGROUND);

    let (w, h) = (f64::from(width), f64::from(height));
    for (i, image) in images.iter().enumerate() {
        let offset = i as f64;
        let dst = match mode {
            MergeMode::Horizontal => Rect::new(offset * w, 0.0, offset * w + w, h),
            MergeMode::Vertical => Rect::new(0.0, offset * h, w, offset * h + h),
        };
        let src = Rect::new(0.0, 0.0, f64::from(image.width()), f64::from(image.height()));
        draw_image(&mut surface, image, src, dst, dst);
    }
    surface
}

#[cfg(test)]
#[path = "../../tests/unit/batch/pipeline.rs"]
mod tests;
