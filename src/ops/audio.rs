//! Audio stream extraction.

use std::path::Path;

use crate::command::Cmd;
use crate::video::Video;
use crate::Result;

impl Video {
    /// Extract the audio stream(s) into `dest` without re-encoding.
    ///
    /// The stream is copied bit-for-bit, so the destination extension must
    /// suit the source audio codec (e.g. `.aac` for AAC input).
    pub fn extract_audio(&self, dest: impl AsRef<Path>) -> Result<()> {
        self.produce(Some(dest.as_ref()), |staged| {
            Cmd::ffmpeg()
                .arg("-i")
                .arg(self.source())
                .args(["-vn", "-acodec", "copy"])
                .arg(staged)
                .run()
        })?;
        Ok(())
    }
}
