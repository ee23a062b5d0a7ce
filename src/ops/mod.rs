//! Operations that derive new media files from existing ones.
//!
//! Every operation reads its input file(s) and writes a new file, never
//! mutating in place. Output is staged: inside a scoped scratch directory
//! and then moved to the caller's destination, or into an auto-managed
//! intermediate when no destination is supplied (fluent chains). Either way
//! a failed operation leaves nothing at a caller-visible path.

mod audio;
mod compose;
mod edit;
mod frames;

pub use compose::{Concat, OverlayOpts};
pub use frames::ImageFormat;

use std::ffi::OsStr;
use std::path::Path;

use crate::video::Video;
use crate::{chain, workspace, Error, Result};

impl Video {
    /// Staging plumbing shared by every operation that produces one new
    /// file: `render` receives the path it must write.
    fn produce(
        &self,
        dest: Option<&Path>,
        render: impl FnOnce(&Path) -> Result<()>,
    ) -> Result<Video> {
        produce_into(dest, self.source(), render)
    }
}

/// See [`Video::produce`]; free form for constructors with no receiver.
/// `like` supplies the container extension for an auto-managed intermediate.
fn produce_into(
    dest: Option<&Path>,
    like: &Path,
    render: impl FnOnce(&Path) -> Result<()>,
) -> Result<Video> {
    match dest {
        None => {
            let staged = chain::intermediate(like)?;
            render(&staged)?;
            Video::from_intermediate(staged)
        }
        Some(dest) => {
            workspace::with_scratch(None, |scratch| {
                let staged = scratch.join(dest_file_name(dest)?);
                render(&staged)?;
                workspace::persist(&staged, dest)
            })?;
            Video::open(dest)
        }
    }
}

fn dest_file_name(dest: &Path) -> Result<&OsStr> {
    dest.file_name()
        .ok_or_else(|| Error::InvalidInput(format!("destination has no file name: {}", dest.display())))
}

/// `<stem>.<ext>` staging name, with the extension taken from `dest` so the
/// muxer is inferred correctly.
fn staged_name(stem: &str, dest: &Path) -> String {
    let ext = dest
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("mp4");
    format!("{stem}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staged_name_takes_destination_extension() {
        assert_eq!(staged_name("first", Path::new("/out/a.mkv")), "first.mkv");
        assert_eq!(staged_name("second", Path::new("/out/b")), "second.mp4");
    }

    #[test]
    fn dest_file_name_rejects_bare_directories() {
        assert!(dest_file_name(Path::new("/")).is_err());
        assert_eq!(
            dest_file_name(Path::new("/out/a.mp4")).unwrap(),
            OsStr::new("a.mp4")
        );
    }
}
