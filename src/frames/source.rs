use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    foundation::{
        core::FrameIndex,
        error::{ScrubError, ScrubResult},
    },
    frames::naming::FrameNaming,
};

/// An ordered sequence of encoded frame descriptors.
///
/// Implementations must be callable from several loader threads at once.
pub trait FrameSource: Send + Sync {
    /// Number of descriptors in the sequence.
    fn len(&self) -> usize;

    /// Return `true` when the sequence has no descriptors.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short label for logs and errors.
    fn describe(&self, index: usize) -> String;

    /// Fetch the encoded bytes of descriptor `index`.
    fn fetch(&self, index: usize) -> ScrubResult<Vec<u8>>;
}

/// Frames stored as individual files in one directory, named by a [`FrameNaming`] scheme.
#[derive(Clone, Debug)]
pub struct DirFrameSource {
    dir: PathBuf,
    naming: FrameNaming,
    count: usize,
}

impl DirFrameSource {
    /// Describe `count` frames under `dir`.
    pub fn new(dir: impl Into<PathBuf>, naming: FrameNaming, count: usize) -> ScrubResult<Self> {
        naming.validate()?;
        if count == 0 {
            return Err(ScrubError::validation("frame count must be > 0"));
        }
        Ok(Self {
            dir: dir.into(),
            naming,
            count,
        })
    }

    /// Describe every consecutive frame found in `dir`, starting at `frame_0001`.
    pub fn discover(dir: impl Into<PathBuf>, naming: FrameNaming) -> ScrubResult<Self> {
        let dir = dir.into();
        let count = count_consecutive_frames(&dir, &naming)?;
        Self::new(dir, naming, count)
    }

    /// Directory holding the frames.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Naming scheme of the frame files.
    pub fn naming(&self) -> &FrameNaming {
        &self.naming
    }

    /// Full path of descriptor `index`.
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir
            .join(self.naming.file_name(FrameIndex(index as u64)))
    }
}

impl FrameSource for DirFrameSource {
    fn len(&self) -> usize {
        self.count
    }

    fn describe(&self, index: usize) -> String {
        self.naming.asset_name(FrameIndex(index as u64))
    }

    fn fetch(&self, index: usize) -> ScrubResult<Vec<u8>> {
        let path = self.path_for(index);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read frame '{}'", path.display()))?;
        Ok(bytes)
    }
}

/// Frames held in memory as encoded bytes.
#[derive(Clone, Debug, Default)]
pub struct MemoryFrameSource {
    frames: Vec<Vec<u8>>,
}

impl MemoryFrameSource {
    /// Wrap encoded frames in sequence order.
    pub fn new(frames: Vec<Vec<u8>>) -> Self {
        Self { frames }
    }
}

impl FrameSource for MemoryFrameSource {
    fn len(&self) -> usize {
        self.frames.len()
    }

    fn describe(&self, index: usize) -> String {
        format!("memory frame #{index}")
    }

    fn fetch(&self, index: usize) -> ScrubResult<Vec<u8>> {
        self.frames.get(index).cloned().ok_or(ScrubError::IndexOutOfRange {
            index: index as u64,
            count: self.frames.len() as u64,
        })
    }
}

/// Count files `naming.file_name(0)`, `naming.file_name(1)`, ... present in `dir` without gaps.
pub fn count_consecutive_frames(dir: &Path, naming: &FrameNaming) -> ScrubResult<usize> {
    if !dir.is_dir() {
        return Err(ScrubError::validation(format!(
            "frame directory '{}' does not exist",
            dir.display()
        )));
    }
    let mut n = 0usize;
    while dir.join(naming.file_name(FrameIndex(n as u64))).is_file() {
        n += 1;
    }
    Ok(n)
}

#[cfg(test)]
#[path = "../../tests/unit/frames/source.rs"]
mod tests;
