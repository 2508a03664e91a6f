//! Scratch directory for the numbered PNG frames the encoder reads.
//!
//! [`ScratchDir`] is a scope guard: whatever path a conversion takes out of the
//! function that owns it, dropping the guard deletes every frame it wrote and then
//! the directory itself.

use crate::{GifWebmError, Result};
use image::RgbaImage;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const FRAME_PREFIX: &str = "frame_";
pub const FRAME_EXTENSION: &str = "png";
/// Minimum zero-padded width of the frame index.
pub const FRAME_NAME_WIDTH: usize = 3;

pub fn frame_file_name(index: usize) -> String {
    format!(
        "{}{:0width$}.{}",
        FRAME_PREFIX,
        index,
        FRAME_EXTENSION,
        width = FRAME_NAME_WIDTH
    )
}

fn find_leftover_frame(dir: &Path) -> Result<Option<String>> {
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.starts_with(FRAME_PREFIX) {
            return Ok(Some(name));
        }
    }
    Ok(None)
}

#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    written: Vec<PathBuf>,
    cleaned: bool,
}

impl ScratchDir {
    /// Creates `path` (and parents) if missing; an existing directory is reused.
    ///
    /// Fails with [`GifWebmError::InvalidConfig`] when the directory already holds
    /// `frame_*` files, e.g. from an interrupted run: the encoder would pick them up
    /// as part of this clip's sequence.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        fs::create_dir_all(&path)?;
        if let Some(leftover) = find_leftover_frame(&path)? {
            return Err(GifWebmError::InvalidConfig(format!(
                "scratch directory {} already contains {}; remove the stale frames or choose another scratch directory",
                path.display(),
                leftover
            )));
        }
        debug!(dir = %path.display(), "Scratch directory ready");
        Ok(Self {
            path,
            written: Vec::new(),
            cleaned: false,
        })
    }

    /// printf-style sequence pattern the encoder expands, e.g. `temp_frames/frame_%03d.png`.
    pub fn input_pattern(&self) -> PathBuf {
        self.path.join(format!(
            "{}%0{}d.{}",
            FRAME_PREFIX, FRAME_NAME_WIDTH, FRAME_EXTENSION
        ))
    }

    /// Writes one frame as the next numbered PNG.
    pub fn write_frame(&mut self, frame: &RgbaImage) -> Result<&Path> {
        let path = self.path.join(frame_file_name(self.written.len()));
        // Track before writing so a half-written file is still cleaned up.
        self.written.push(path.clone());
        frame
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|source| GifWebmError::FrameWrite {
                path: path.clone(),
                source,
            })?;
        Ok(self.written[self.written.len() - 1].as_path())
    }

    /// Writes every frame, calling `on_frame` after each one. Returns all paths.
    pub fn write_frames<'f, I, F>(&mut self, frames: I, mut on_frame: F) -> Result<&[PathBuf]>
    where
        I: IntoIterator<Item = &'f RgbaImage>,
        F: FnMut(usize),
    {
        for (i, frame) in frames.into_iter().enumerate() {
            self.write_frame(frame)?;
            on_frame(i + 1);
        }
        Ok(&self.written)
    }

    /// Deletes the written frames and removes the directory. Idempotent: files or a
    /// directory that are already gone are fine. A directory still holding files this
    /// guard did not write is left in place with a warning.
    pub fn cleanup(&mut self) {
        if self.cleaned {
            return;
        }
        self.cleaned = true;

        for file in self.written.drain(..) {
            match fs::remove_file(&file) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(file = %file.display(), error = %e, "Failed to remove scratch frame"),
            }
        }

        match fs::remove_dir(&self.path) {
            Ok(()) => debug!(dir = %self.path.display(), "Scratch directory removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                dir = %self.path.display(),
                error = %e,
                "Scratch directory not removed"
            ),
        }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        self.cleanup();
    }
}
