use std::{
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;

use crate::foundation::error::{StitchError, StitchResult};

/// File extensions recognized as raster images when collecting a directory.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "webp", "tif", "tiff", "ico", "tga", "pnm", "pbm", "pgm",
    "ppm", "qoi",
];

/// Something that can hand raw encoded image bytes to the decoder.
pub trait ImageSource: Send + Sync + fmt::Debug {
    /// File name including extension; identifies the source in results and errors.
    fn name(&self) -> &str;

    /// Read the complete encoded byte stream.
    fn read_bytes(&self) -> anyhow::Result<Vec<u8>>;
}

/// Shared handle to a source, as passed to the decoder and batch matcher.
pub type SharedSource = Arc<dyn ImageSource>;

#[derive(Clone, Debug, PartialEq, Eq)]
/// Image file on disk.
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    /// Wrap `path`; the source name is its final component.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }

    /// Location on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert into a [`SharedSource`].
    pub fn shared(self) -> SharedSource {
        Arc::new(self)
    }
}

impl ImageSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        std::fs::read(&self.path).with_context(|| format!("read '{}'", self.path.display()))
    }
}

#[derive(Clone, PartialEq, Eq)]
/// In-memory encoded image, e.g. bytes already received from elsewhere.
pub struct MemorySource {
    name: String,
    bytes: Arc<Vec<u8>>,
}

impl MemorySource {
    /// Wrap `bytes` under `name`.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes: Arc::new(bytes),
        }
    }

    /// Convert into a [`SharedSource`].
    pub fn shared(self) -> SharedSource {
        Arc::new(self)
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageSource for MemorySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(self.bytes.as_ref().clone())
    }
}

/// Whether `name` carries one of the [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// List image files directly contained in `dir`, sorted by file name.
///
/// Subdirectories are not descended into and non-image files are skipped.
pub fn collect_image_files(dir: impl AsRef<Path>) -> StitchResult<Vec<FileSource>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(StitchError::validation(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }

    let entries =
        std::fs::read_dir(dir).with_context(|| format!("list directory '{}'", dir.display()))?;
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("list directory '{}'", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat '{}'", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        let source = FileSource::new(entry.path());
        if is_image_file_name(source.name()) {
            out.push(source);
        }
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
