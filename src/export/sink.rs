use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::StitchResult;

/// Destination for encoded outputs.
pub trait OutputSink {
    /// Store `bytes` under `filename` and report where they went.
    fn persist(&mut self, filename: &str, bytes: &[u8]) -> StitchResult<PathBuf>;
}

#[derive(Clone, Debug)]
/// Writes outputs into a directory, creating it on first use. Existing files are replaced.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl OutputSink for DirectorySink {
    fn persist(&mut self, filename: &str, bytes: &[u8]) -> StitchResult<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory '{}'", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, bytes).with_context(|| format!("write '{}'", path.display()))?;
        Ok(path)
    }
}

#[derive(Clone, Debug, Default)]
/// Keeps outputs in memory, in persist order.
pub struct MemorySink {
    files: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored `(filename, bytes)` pairs.
    pub fn files(&self) -> &[(String, Vec<u8>)] {
        &self.files
    }

    /// Bytes stored under `filename`, if any.
    pub fn get(&self, filename: &str) -> Option<&[u8]> {
        self.files
            .iter()
            .find(|(name, _)| name == filename)
            .map(|(_, bytes)| bytes.as_slice())
    }
}

impl OutputSink for MemorySink {
    fn persist(&mut self, filename: &str, bytes: &[u8]) -> StitchResult<PathBuf> {
        self.files.push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/sink.rs"]
mod tests;
