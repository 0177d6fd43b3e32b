use std::{
    io::Cursor,
    sync::{Arc, Condvar, Mutex},
};

use super::*;
use crate::{
    assets::source::{ImageSource, MemorySource},
    export::sink::MemorySink,
};

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> image::RgbaImage {
    image::RgbaImage::from_pixel(w, h, image::Rgba(rgba))
}

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(solid(w, h, rgba))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn png_source(name: &str, rgba: [u8; 4]) -> SharedSource {
    MemorySource::new(name, png_bytes(4, 2, rgba)).shared()
}

fn small_options(pattern: &str) -> BatchOptions {
    BatchOptions {
        pattern: pattern.to_string(),
        target_width: 3,
        target_height: 2,
        ..BatchOptions::default()
    }
}

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

#[test]
fn compose_pair_horizontal_stretches_each_half() {
    let images = [
        DecodedImage::from_rgba(solid(2, 2, RED), "a"),
        DecodedImage::from_rgba(solid(4, 1, BLUE), "b"),
    ];
    let surface = compose_pair(&images, MergeMode::Horizontal, 3, 2);
    assert_eq!((surface.width(), surface.height()), (6, 2));
    for y in 0..2 {
        for x in 0..3 {
            assert_eq!(surface.pixel(x, y), Some(RED));
            assert_eq!(surface.pixel(x + 3, y), Some(BLUE));
        }
    }
}

#[test]
fn compose_pair_vertical_stacks() {
    let images = [
        DecodedImage::from_rgba(solid(5, 5, RED), "a"),
        DecodedImage::from_rgba(solid(1, 3, BLUE), "b"),
    ];
    let surface = compose_pair(&images, MergeMode::Vertical, 2, 3);
    assert_eq!((surface.width(), surface.height()), (2, 6));
    assert_eq!(surface.pixel(1, 2), Some(RED));
    assert_eq!(surface.pixel(0, 3), Some(BLUE));
    assert_eq!(surface.pixel(1, 5), Some(BLUE));
}

#[test]
fn compose_pair_keeps_white_under_transparency() {
    let images = [
        DecodedImage::from_rgba(solid(2, 2, [0, 0, 0, 0]), "a"),
        DecodedImage::from_rgba(solid(2, 2, RED), "b"),
    ];
    let surface = compose_pair(&images, MergeMode::Horizontal, 2, 2);
    assert_eq!(surface.pixel(0, 0), Some([255, 255, 255, 255]));
    assert_eq!(surface.pixel(2, 0), Some(RED));
}

#[tokio::test]
async fn merges_every_match_and_reports_progress() {
    let files = vec![
        png_source("img3.png", RED),
        png_source("img1.png", RED),
        png_source("notes.png", RED),
        png_source("img2.png", BLUE),
        png_source("img4.png", BLUE),
    ];
    let decoder = Decoder::new();
    let mut sink = MemorySink::new();
    let mut seen = Vec::new();

    let report = BatchProcessor::new()
        .process(&files, &small_options("img{n}"), &decoder, &mut sink, |p| {
            seen.push(p)
        })
        .await
        .unwrap();

    let names: Vec<&str> = report.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["img3-4", "img1-2"]);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(
        seen,
        [
            BatchProgress { completed: 1, total: 2 },
            BatchProgress { completed: 2, total: 2 },
        ]
    );

    let merged = image::load_from_memory(sink.get("img1-2-merged.png").unwrap())
        .unwrap()
        .to_rgba8();
    assert_eq!(merged.dimensions(), (6, 2));
    assert_eq!(merged.get_pixel(0, 0).0, RED);
    assert_eq!(merged.get_pixel(5, 1).0, BLUE);
    assert!(sink.get("img3-4-merged.png").is_some());
}

#[tokio::test]
async fn failed_match_is_recorded_and_the_run_continues() {
    let files = vec![
        png_source("img1.png", RED),
        MemorySource::new("img2.png", b"not a png".to_vec()).shared(),
        png_source("img3.png", RED),
        png_source("img4.png", BLUE),
    ];
    let decoder = Decoder::new();
    let mut sink = MemorySink::new();
    let mut calls = 0;

    let report = BatchProcessor::new()
        .process(&files, &small_options("img{n}"), &decoder, &mut sink, |_| {
            calls += 1
        })
        .await
        .unwrap();

    assert_eq!(calls, 2);
    assert_eq!(report.failed(), 1);
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.items[0].name, "img1-2");
    match &report.items[0].outcome {
        BatchOutcome::Failed { error } => assert!(error.contains("img2.png"), "{error}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(
        report.items[1].outcome,
        BatchOutcome::Saved {
            filename: "img3-4-merged.png".to_string(),
            location: PathBuf::from("img3-4-merged.png"),
        }
    );
    assert_eq!(sink.files().len(), 1);
}

#[tokio::test]
async fn jpeg_outputs_use_jpg_extension() {
    let files = vec![png_source("s1.png", RED), png_source("s2.png", BLUE)];
    let options = BatchOptions {
        format: OutputFormat::Jpeg,
        quality: Quality::new(80).unwrap(),
        ..small_options("s{n}")
    };
    let mut sink = MemorySink::new();

    BatchProcessor::new()
        .process(&files, &options, &Decoder::new(), &mut sink, |_| {})
        .await
        .unwrap();

    let bytes = sink.get("s1-2-merged.jpg").unwrap();
    assert_eq!(image::guess_format(bytes).unwrap(), image::ImageFormat::Jpeg);
}

#[tokio::test]
async fn no_matches_yields_empty_report() {
    let files = vec![png_source("a.png", RED), png_source("b.png", RED)];
    let mut sink = MemorySink::new();
    let mut calls = 0;

    let report = BatchProcessor::new()
        .process(&files, &small_options("img{n}"), &Decoder::new(), &mut sink, |_| {
            calls += 1
        })
        .await
        .unwrap();

    assert!(report.items.is_empty());
    assert_eq!(calls, 0);
    assert!(sink.files().is_empty());
}

#[tokio::test]
async fn invalid_options_are_rejected_and_release_the_guard() {
    let processor = BatchProcessor::new();
    let options = BatchOptions {
        target_width: 0,
        ..BatchOptions::default()
    };
    let err = processor
        .process(&[], &options, &Decoder::new(), &mut MemorySink::new(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, StitchError::Validation(_)));
    assert!(!processor.is_running());
}

#[test]
fn oversized_target_fails_validation() {
    let options = BatchOptions {
        target_width: u32::MAX,
        ..BatchOptions::default()
    };
    assert!(options.validate().is_err());
    let vertical = BatchOptions {
        mode: MergeMode::Vertical,
        ..options
    };
    assert!(vertical.validate().is_ok());
}

#[derive(Debug, Default)]
struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

#[derive(Debug)]
struct GatedSource {
    name: String,
    gate: Arc<Gate>,
    bytes: Vec<u8>,
}

impl ImageSource for GatedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        let mut open = self.gate.open.lock().unwrap();
        while !*open {
            open = self.gate.cv.wait(open).unwrap();
        }
        Ok(self.bytes.clone())
    }
}

#[tokio::test]
async fn second_run_is_rejected_while_one_is_active() {
    let gate = Arc::new(Gate::default());
    let files: Vec<SharedSource> = vec![
        Arc::new(GatedSource {
            name: "img1.png".to_string(),
            gate: Arc::clone(&gate),
            bytes: png_bytes(2, 2, RED),
        }),
        png_source("img2.png", BLUE),
    ];
    let options = small_options("img{n}");
    let decoder = Decoder::new();
    let processor = BatchProcessor::new();
    let mut first_sink = MemorySink::new();

    let first = processor.process(&files, &options, &decoder, &mut first_sink, |_| {});
    tokio::pin!(first);
    tokio::select! {
        biased;
        _ = &mut first => panic!("first run finished while its decode was gated"),
        _ = tokio::task::yield_now() => {}
    }
    assert!(processor.is_running());

    let mut second_sink = MemorySink::new();
    let err = processor
        .process(&files, &options, &decoder, &mut second_sink, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, StitchError::BatchInProgress));
    assert!(second_sink.files().is_empty());

    *gate.open.lock().unwrap() = true;
    gate.cv.notify_all();

    let report = first.await.unwrap();
    assert_eq!(report.succeeded(), 1);
    assert!(!processor.is_running());
}

#[test]
fn options_deserialize_with_defaults() {
    let options: BatchOptions =
        serde_json::from_str(r#"{"pattern":"shot_{n}","mode":"vertical","quality":70}"#).unwrap();
    assert_eq!(options.pattern, "shot_{n}");
    assert_eq!(options.mode, MergeMode::Vertical);
    assert_eq!(options.quality.get(), 70);
    assert_eq!(options.target_width, 800);
    assert_eq!(options.format, OutputFormat::Png);
}

#[test]
fn merge_mode_parses_names_and_shorthands() {
    assert_eq!("Horizontal".parse::<MergeMode>().unwrap(), MergeMode::Horizontal);
    assert_eq!("v".parse::<MergeMode>().unwrap(), MergeMode::Vertical);
    assert!("diagonal".parse::<MergeMode>().is_err());
}

#[test]
fn report_serializes_itemized_results() {
    let report = BatchReport {
        items: vec![
            BatchItemResult {
                name: "img1-2".to_string(),
                outcome: BatchOutcome::Saved {
                    filename: "img1-2-merged.png".to_string(),
                    location: PathBuf::from("out/img1-2-merged.png"),
                },
            },
            BatchItemResult {
                name: "img3-4".to_string(),
                outcome: BatchOutcome::Failed {
                    error: "boom".to_string(),
                },
            },
        ],
    };
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["items"][0]["status"], "saved");
    assert_eq!(json["items"][0]["filename"], "img1-2-merged.png");
    assert_eq!(json["items"][1]["status"], "failed");
    assert_eq!(json["items"][1]["error"], "boom");
}
