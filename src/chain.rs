//! Auto-managed intermediate artifacts for operation chains.
//!
//! A chained operation may have no caller-supplied destination because a
//! later link will consume its result. Such a link writes to a uniquely-named
//! intermediate file whose removal is guaranteed on every exit path: the
//! [`TempPath`] deletes the file when dropped, so a failed chain cleans up
//! every intermediate created so far as its handles unwind. This is the same
//! release-on-all-exits contract as [`crate::workspace`], scoped to one file.

use std::ffi::OsStr;
use std::path::Path;

use tempfile::TempPath;

use crate::{Error, Result};

const DEFAULT_EXT: &str = "mp4";

/// Allocate a uniquely-named intermediate file in the system temp area,
/// carrying the same extension as `like` so ffmpeg can infer the muxer from
/// it.
pub(crate) fn intermediate(like: &Path) -> Result<TempPath> {
    let ext = like
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or(DEFAULT_EXT);
    let file = tempfile::Builder::new()
        .prefix("avchop-")
        .suffix(&format!(".{ext}"))
        .tempfile()
        .map_err(|e| Error::Workspace(format!("failed to create intermediate file: {e}")))?;
    Ok(file.into_temp_path())
}
