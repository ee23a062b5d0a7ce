//! Cutting, trimming, scaling and re-encoding.
//!
//! Boundary convention: cut points are exclusive at the boundary second. A
//! split at `t` produces `[0, t)` and `[t, end)`; `trim_start(s)` drops
//! `[0, s)`; `trim_end(s)` keeps `[0, duration - s)`.

use std::path::Path;

use crate::command::Cmd;
use crate::video::Video;
use crate::{workspace, Error, Result};

impl Video {
    /// Re-encode into the container and codecs implied by the destination
    /// extension, or the source container when chaining without one.
    pub fn reencode(&self, dest: Option<&Path>) -> Result<Video> {
        self.produce(dest, |staged| {
            Cmd::ffmpeg().arg("-i").arg(self.source()).arg(staged).run()
        })
    }

    /// Split into two parts at `at` seconds.
    ///
    /// Both halves come out of a single ffmpeg invocation, staged in a
    /// scratch directory and moved to `first_dest`/`second_dest` only once
    /// complete.
    pub fn split(
        &self,
        at: f64,
        first_dest: impl AsRef<Path>,
        second_dest: impl AsRef<Path>,
    ) -> Result<(Video, Video)> {
        let first_dest = first_dest.as_ref();
        let second_dest = second_dest.as_ref();

        workspace::with_scratch(None, |scratch| {
            let first = scratch.join(super::staged_name("first", first_dest));
            let second = scratch.join(super::staged_name("second", second_dest));
            Cmd::ffmpeg()
                .arg("-i")
                .arg(self.source())
                .arg("-t")
                .arg(at.to_string())
                .arg(&first)
                .arg("-ss")
                .arg(at.to_string())
                .arg(&second)
                .run()?;
            workspace::persist(&first, first_dest)?;
            workspace::persist(&second, second_dest)
        })?;

        Ok((Video::open(first_dest)?, Video::open(second_dest)?))
    }

    /// Drop the first `secs` seconds.
    pub fn trim_start(&self, secs: f64, dest: Option<&Path>) -> Result<Video> {
        self.produce(dest, |staged| {
            Cmd::ffmpeg()
                .arg("-ss")
                .arg(secs.to_string())
                .arg("-i")
                .arg(self.source())
                .arg(staged)
                .run()
        })
    }

    /// Drop the last `secs` seconds, keeping `[0, duration - secs)`.
    ///
    /// # Errors
    ///
    /// Needs the probed duration; fails with [`Error::InvalidInput`] when the
    /// file reports none or when `secs` exceeds it.
    pub fn trim_end(&self, secs: f64, dest: Option<&Path>) -> Result<Video> {
        let duration = self.duration_secs()?;
        if secs > duration {
            return Err(Error::InvalidInput(format!(
                "cannot trim {secs}s from a {duration}s video"
            )));
        }
        self.produce(dest, |staged| {
            Cmd::ffmpeg()
                .arg("-t")
                .arg((duration - secs).to_string())
                .arg("-i")
                .arg(self.source())
                .arg(staged)
                .run()
        })
    }

    /// Scale to `width`×`height` pixels.
    pub fn scale(&self, width: u32, height: u32, dest: Option<&Path>) -> Result<Video> {
        self.produce(dest, |staged| {
            Cmd::ffmpeg()
                .arg("-i")
                .arg(self.source())
                .args(["-vf", &format!("scale={width}:{height}")])
                .arg(staged)
                .run()
        })
    }
}
