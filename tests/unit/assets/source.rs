use std::path::PathBuf;

use super::*;

#[test]
fn image_extensions_are_case_insensitive() {
    assert!(is_image_file_name("a.png"));
    assert!(is_image_file_name("B.JPG"));
    assert!(is_image_file_name("c.tar.webp"));
    assert!(!is_image_file_name("notes.txt"));
    assert!(!is_image_file_name("png"));
}

#[test]
fn file_source_is_named_after_its_last_component() {
    let s = FileSource::new(PathBuf::from("some").join("dir").join("img3.jpg"));
    assert_eq!(s.name(), "img3.jpg");
    assert!(s.path().ends_with("img3.jpg"));
}

#[test]
fn memory_source_returns_its_bytes() {
    let s = MemorySource::new("x.png", vec![1, 2, 3]);
    assert_eq!(s.name(), "x.png");
    assert_eq!(s.read_bytes().unwrap(), vec![1, 2, 3]);
}

#[test]
fn collect_lists_direct_image_files_sorted() {
    let dir = PathBuf::from("target").join("unit_collect_image_files");
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(dir.join("nested")).unwrap();
    for name in ["img2.png", "img1.jpg", "readme.txt"] {
        std::fs::write(dir.join(name), b"x").unwrap();
    }
    std::fs::write(dir.join("nested").join("img0.png"), b"x").unwrap();

    let files = collect_image_files(&dir).unwrap();
    let names: Vec<&str> = files.iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["img1.jpg", "img2.png"]);
}

#[test]
fn collect_rejects_non_directories() {
    let err = collect_image_files("target/definitely-not-here").unwrap_err();
    assert!(matches!(err, StitchError::Validation(_)));
}
