//! Frame-sequence conversion.

use std::fs;
use std::path::{Path, PathBuf};

use crate::command::Cmd;
use crate::video::Video;
use crate::{Error, Result};

/// Image formats for frame extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Portable Network Graphics (lossless).
    #[default]
    Png,
    /// JPEG (lossy, smaller).
    Jpeg,
}

impl ImageFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            _ => Err(format!("unknown image format: {s}")),
        }
    }
}

impl Video {
    /// Explode into numbered frame images (`<stem>-NNN.<ext>`) inside
    /// `dest_dir`, returning the written paths in frame order.
    pub fn to_frames(
        &self,
        dest_dir: impl AsRef<Path>,
        format: ImageFormat,
    ) -> Result<Vec<PathBuf>> {
        let dest_dir = dest_dir.as_ref();
        let stem = self
            .source()
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "source has no usable file stem: {}",
                    self.source().display()
                ))
            })?;

        Cmd::ffmpeg()
            .arg("-i")
            .arg(self.source())
            .arg(dest_dir.join(format!("{stem}-%03d.{}", format.extension())))
            .run()?;

        let prefix = format!("{stem}-");
        let suffix = format!(".{}", format.extension());
        let mut frames = Vec::new();
        for entry in fs::read_dir(dest_dir)? {
            let path = entry?.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with(&prefix) && name.ends_with(&suffix) {
                    frames.push(path);
                }
            }
        }
        frames.sort();
        Ok(frames)
    }

    /// Build a video from a numbered image sequence (e.g. `frame-%03d.png`)
    /// at `fps` frames per second.
    pub fn from_frames(
        pattern: impl AsRef<Path>,
        fps: f64,
        dest: impl AsRef<Path>,
    ) -> Result<Video> {
        let dest = dest.as_ref();
        let pattern = pattern.as_ref();
        super::produce_into(Some(dest), dest, |staged| {
            Cmd::ffmpeg()
                .arg("-r")
                .arg(fps.to_string())
                .arg("-i")
                .arg(pattern)
                .arg(staged)
                .run()
        })
    }
}
