use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use gridstitch::{
    BatchOptions, BatchProcessor, Decoder, DirectorySink, ExportOptions, FileSource, FitMode,
    GridConfigPatch, GridModel, LayoutDocument, MergeMode, OutputFormat, Quality, SharedSource,
    SizeMode,
};

#[derive(Parser, Debug)]
#[command(name = "gridstitch", version)]
struct Cli {
    /// Log debug events.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compose images onto a grid and export one image.
    Grid(GridArgs),
    /// Merge numbered image pairs found in a directory.
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
struct GridArgs {
    /// Layout document (JSON) with grid settings, cell paths and export options.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Layout preset such as `2x2` or `1x3`.
    #[arg(long)]
    preset: Option<String>,

    /// Row count.
    #[arg(long)]
    rows: Option<u32>,

    /// Column count.
    #[arg(long)]
    cols: Option<u32>,

    /// Cell width in pixels (clamped to 50..=2000).
    #[arg(long, requires = "cell_height")]
    cell_width: Option<u32>,

    /// Cell height in pixels (clamped to 50..=2000).
    #[arg(long, requires = "cell_width")]
    cell_height: Option<u32>,

    /// Gap between cells in pixels.
    #[arg(long)]
    gap: Option<u32>,

    /// Fit mode: contain, cover, stretch or tile.
    #[arg(long)]
    fit: Option<FitMode>,

    /// Size cells to the largest loaded image.
    #[arg(long)]
    auto_size: bool,

    /// Draw cell outlines.
    #[arg(long)]
    show_grid: bool,

    /// Output format: png or jpeg.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Output quality for jpeg (0-100).
    #[arg(long)]
    quality: Option<Quality>,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Images placed into cells in row-major order; overrides the layout's cells.
    images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct BatchArgs {
    /// Directory whose image files are paired.
    #[arg(long)]
    dir: PathBuf,

    /// File name pattern with one `{n}` placeholder.
    #[arg(long)]
    pattern: String,

    /// Merge axis: horizontal or vertical.
    #[arg(long, default_value_t = MergeMode::Horizontal)]
    mode: MergeMode,

    /// Width every image is drawn at.
    #[arg(long, default_value_t = 800)]
    width: u32,

    /// Height every image is drawn at.
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Output format: png or jpeg.
    #[arg(long, default_value_t = OutputFormat::Png)]
    format: OutputFormat,

    /// Output quality for jpeg (0-100).
    #[arg(long, default_value_t = Quality::DEFAULT)]
    quality: Quality,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Write the itemized results as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let rt = tokio::runtime::Builder::new_current_thread()
        .build()
        .context("build tokio runtime")?;
    match cli.cmd {
        Command::Grid(args) => rt.block_on(cmd_grid(args)),
        Command::Batch(args) => rt.block_on(cmd_batch(args)),
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else if quiet {
        tracing::Level::WARN
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn grid_patch(args: &GridArgs) -> anyhow::Result<GridConfigPatch> {
    let mut patch = match &args.preset {
        Some(preset) => gridstitch::parse_layout_preset(preset)?,
        None => GridConfigPatch::default(),
    };
    if let Some(rows) = args.rows {
        patch.rows = Some(rows);
    }
    if let Some(cols) = args.cols {
        patch.cols = Some(cols);
    }
    if let (Some(w), Some(h)) = (args.cell_width, args.cell_height) {
        patch = patch.cell_size_clamped(w, h);
    }
    if let Some(gap) = args.gap {
        patch = patch.gap(gap);
    }
    if let Some(fit) = args.fit {
        patch = patch.fit_mode(fit);
    }
    if args.auto_size {
        patch = patch.size_mode(SizeMode::Auto);
    }
    if args.show_grid {
        patch = patch.show_grid(true);
    }
    Ok(patch)
}

async fn cmd_grid(args: GridArgs) -> anyhow::Result<()> {
    let doc = match &args.layout {
        Some(path) => LayoutDocument::from_path(path)?,
        None => LayoutDocument::default(),
    };

    let patch = doc.grid.clone().merge(&grid_patch(&args)?);
    let mut model = GridModel::new();
    model.set_config(&patch)?;

    let cells: Vec<Option<PathBuf>> = if args.images.is_empty() {
        doc.cells
    } else {
        args.images.into_iter().map(Some).collect()
    };
    let capacity = model.config().cell_count();
    if cells.len() > capacity {
        tracing::warn!(
            images = cells.len(),
            cells = capacity,
            "more images than cells; extra images are ignored"
        );
    }

    let decoder = Decoder::new();
    let pending: Vec<_> = cells
        .into_iter()
        .take(capacity)
        .enumerate()
        .filter_map(|(index, path)| {
            let source: SharedSource = Arc::new(FileSource::new(path?));
            Some((index, decoder.load_image(source)))
        })
        .collect();
    for (index, handle) in pending {
        match handle.await {
            Ok(image) => model.set_cell(index, image),
            Err(err) => tracing::warn!(cell = index, error = %err, "cell left empty"),
        }
    }

    let options = ExportOptions {
        format: args.format.unwrap_or(doc.export.format),
        quality: args.quality.unwrap_or(doc.export.quality),
    };
    let mut sink = DirectorySink::new(&args.out);
    let exported = gridstitch::export_grid(&model, &options, &mut sink)?;
    println!("{}", exported.location.display());
    Ok(())
}

async fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let files: Vec<SharedSource> = gridstitch::collect_image_files(&args.dir)?
        .into_iter()
        .map(FileSource::shared)
        .collect();

    let options = BatchOptions {
        pattern: args.pattern,
        mode: args.mode,
        target_width: args.width,
        target_height: args.height,
        format: args.format,
        quality: args.quality,
    };
    let decoder = Decoder::new();
    let mut sink = DirectorySink::new(&args.out);

    let report = BatchProcessor::new()
        .process(&files, &options, &decoder, &mut sink, |p| {
            tracing::info!(completed = p.completed, total = p.total, "batch progress");
        })
        .await?;

    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    if report.items.is_empty() {
        tracing::warn!(pattern = %options.pattern, "no file pairs matched");
    }
    if report.failed() > 0 {
        anyhow::bail!(
            "{} of {} batch items failed",
            report.failed(),
            report.items.len()
        );
    }
    Ok(())
}

fn write_report(path: &Path, report: &gridstitch::BatchReport) -> anyhow::Result<()> {
    let f = File::create(path).with_context(|| format!("create report '{}'", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(f), report)
        .with_context(|| format!("write report '{}'", path.display()))?;
    Ok(())
}
