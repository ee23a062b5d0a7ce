//! Joining and overlaying.

use std::fs;
use std::path::Path;

use crate::command::Cmd;
use crate::video::{Source, Video};
use crate::{workspace, Error, Result};

/// Whether concatenation re-encodes or stream-copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concat {
    /// Re-encode while joining; tolerates mismatched codec parameters.
    #[default]
    Reencode,
    /// Stream-copy; inputs must share codec parameters.
    Copy,
}

/// Placement and timing options for [`Video::overlay`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayOpts {
    /// Seconds the overlay stays visible. Defaults to the overlaid input's
    /// own duration; required when it has none (still images).
    pub duration: Option<f64>,
    /// Top-left `(x, y)` pixel position of the overlay.
    pub position: (i64, i64),
}

impl Video {
    /// Join `before` clips, this clip, then `after` clips into one file.
    ///
    /// Inputs go through the concat demuxer via a list file written inside a
    /// scratch directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when `before` and `after` are both
    /// empty, since there is nothing to join.
    pub fn concatenate(
        &self,
        before: &[&Video],
        after: &[&Video],
        mode: Concat,
        dest: Option<&Path>,
    ) -> Result<Video> {
        if before.is_empty() && after.is_empty() {
            return Err(Error::InvalidInput(
                "concatenate needs at least one other video".into(),
            ));
        }

        self.produce(dest, |staged| {
            workspace::with_scratch(None, |scratch| {
                let mut listing = String::new();
                for vid in before
                    .iter()
                    .copied()
                    .chain(std::iter::once(self))
                    .chain(after.iter().copied())
                {
                    listing.push_str(&concat_entry(vid.source())?);
                }
                let list = scratch.join("inputs.txt");
                fs::write(&list, listing)?;

                let mut cmd = Cmd::ffmpeg()
                    .args(["-f", "concat", "-safe", "0", "-i"])
                    .arg(&list);
                if mode == Concat::Copy {
                    cmd = cmd.args(["-c", "copy"]);
                }
                cmd.arg(staged).run()
            })
        })
    }

    /// Split at `at` seconds and insert `other` between the two halves.
    pub fn insert<'a>(
        &self,
        other: impl Into<Source<'a>>,
        at: f64,
        mode: Concat,
        dest: Option<&Path>,
    ) -> Result<Video> {
        let mut storage = None;
        let other = other.into().resolve(&mut storage)?;

        workspace::with_scratch(None, |scratch| {
            let first = scratch.join(super::staged_name("first", self.source()));
            let second = scratch.join(super::staged_name("second", self.source()));
            let (first, second) = self.split(at, &first, &second)?;
            other.concatenate(&[&first], &[&second], mode, dest)
        })
    }

    /// Overlay `overlay` on top of this video, visible from `start` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when the overlaid input reports no
    /// inherent duration and `opts.duration` is unset. The check runs before
    /// ffmpeg is spawned.
    pub fn overlay<'a>(
        &self,
        overlay: impl Into<Source<'a>>,
        start: f64,
        opts: OverlayOpts,
        dest: Option<&Path>,
    ) -> Result<Video> {
        let mut storage = None;
        let overlay = overlay.into().resolve(&mut storage)?;

        let probed = match opts.duration {
            Some(_) => None,
            None => overlay.metadata()?.duration_secs(),
        };
        let duration = resolve_overlay_duration(opts.duration, probed)?;

        let (x, y) = opts.position;
        let filter = format!(
            "overlay={x}:{y}:enable='between(t,{start},{end})'",
            end = start + duration
        );

        self.produce(dest, |staged| {
            Cmd::ffmpeg()
                .arg("-i")
                .arg(self.source())
                .arg("-i")
                .arg(overlay.source())
                .arg("-filter_complex")
                .arg(&filter)
                .arg(staged)
                .run()
        })
    }
}

/// Explicit duration wins; otherwise the overlaid input must supply one.
fn resolve_overlay_duration(explicit: Option<f64>, probed: Option<f64>) -> Result<f64> {
    explicit.or(probed).ok_or_else(|| {
        Error::InvalidInput(
            "overlay duration required when the overlaid input has no inherent duration".into(),
        )
    })
}

/// One `file '...'` line for the concat demuxer, single-quoted with embedded
/// quotes escaped the way the demuxer expects.
fn concat_entry(path: &Path) -> Result<String> {
    let path = path.to_str().ok_or_else(|| {
        Error::InvalidInput(format!("path is not valid UTF-8: {}", path.display()))
    })?;
    Ok(format!("file '{}'\n", path.replace('\'', r"'\''")))
}
