//! # avchop
//!
//! Video slicing, joining and compositing built on the `ffmpeg` and
//! `ffprobe` command-line tools.
//!
//! The external binaries do the media work; this crate contributes the
//! plumbing around them:
//!
//! - a validated [`Video`] handle with lazily-cached probe metadata
//! - scoped scratch directories, removed on every exit path
//!   ([`with_scratch`])
//! - auto-managed intermediate files for fluent operation chains
//! - operations for extracting audio, splitting, trimming, scaling,
//!   concatenating, inserting and overlaying clips
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use avchop::{Concat, Video};
//!
//! let talk = Video::open("/media/talk.mp4")?;
//! let intro = Video::open("/media/intro.mp4")?;
//!
//! // Chain without naming intermediates; only the final file is kept.
//! talk.trim_start(3.0, None)?
//!     .scale(1280, 720, None)?
//!     .concatenate(
//!         &[&intro],
//!         &[],
//!         Concat::Reencode,
//!         Some(Path::new("/media/cut.mp4")),
//!     )?;
//! # Ok::<(), avchop::Error>(())
//! ```

mod chain;
mod command;
mod error;
mod ops;
mod video;

pub mod probe;
pub mod tools;
pub mod workspace;

// Re-exports
pub use error::{Error, Result};
pub use ops::{Concat, ImageFormat, OverlayOpts};
pub use probe::{FormatData, ProbeData, StreamData};
pub use tools::{check_tool, check_tools, require_tool, ToolInfo};
pub use video::{Source, Video};
pub use workspace::with_scratch;

/// Probe a media file and return its stream/format metadata.
///
/// This runs ffprobe once; use [`Video::metadata`] instead when you hold a
/// handle, to get per-handle caching.
///
/// # Example
///
/// ```no_run
/// let data = avchop::probe("/media/talk.mp4")?;
/// if let Some(secs) = data.duration_secs() {
///     println!("{secs:.1}s");
/// }
/// # Ok::<(), avchop::Error>(())
/// ```
pub fn probe<P: AsRef<std::path::Path>>(path: P) -> Result<ProbeData> {
    probe::probe(path.as_ref())
}
