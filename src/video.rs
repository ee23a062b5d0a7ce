//! The [`Video`] media handle.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::OnceCell;
use tempfile::TempPath;

use crate::probe::{self, ProbeData};
use crate::{workspace, Error, Result};

/// Handle to a media file on disk.
///
/// Construction validates that the file exists; metadata is probed lazily on
/// first access and cached for the handle's lifetime. Operations never
/// mutate the underlying file: they read it and write a new one, returning
/// a handle to the result.
///
/// # Example
///
/// ```no_run
/// use avchop::Video;
///
/// let vid = Video::open("/media/talk.mp4")?;
/// if let Some(stream) = vid.metadata()?.primary_video() {
///     println!("{}x{}", stream.width.unwrap_or(0), stream.height.unwrap_or(0));
/// }
/// # Ok::<(), avchop::Error>(())
/// ```
pub struct Video {
    source: PathBuf,
    metadata: OnceCell<ProbeData>,
    // Keeps a chain intermediate alive for exactly as long as this handle;
    // dropping the handle removes the file.
    intermediate: Option<TempPath>,
}

impl Video {
    /// Open a media file.
    ///
    /// The stored path is canonicalized to an absolute form: the concat
    /// demuxer requires absolute entries under `-safe 0`, and callers may
    /// change working directory between chained operations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FileNotFound`] if nothing exists at `path`. No
    /// external process is involved.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::file_not_found(path));
        }
        Ok(Self {
            source: fs::canonicalize(path)?,
            metadata: OnceCell::new(),
            intermediate: None,
        })
    }

    /// Wrap a freshly-written intermediate, tying the file's lifetime to the
    /// returned handle.
    pub(crate) fn from_intermediate(tmp: TempPath) -> Result<Self> {
        let mut video = Self::open(&tmp)?;
        video.intermediate = Some(tmp);
        Ok(video)
    }

    /// Path of the underlying file.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Probed stream/format metadata, fetched at most once per handle and
    /// cached thereafter.
    pub fn metadata(&self) -> Result<&ProbeData> {
        self.metadata.get_or_try_init(|| probe::probe(&self.source))
    }

    /// Duration in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] when neither the container nor any
    /// stream reports a duration.
    pub fn duration_secs(&self) -> Result<f64> {
        self.metadata()?.duration_secs().ok_or_else(|| {
            Error::InvalidInput(format!("no duration reported for {}", self.source.display()))
        })
    }

    /// Move the underlying file to `dest` and return a handle to it.
    ///
    /// For a chain intermediate this disarms the automatic deletion and
    /// relocates the file; for any other handle the file is copied and the
    /// original left in place.
    pub fn save_as(mut self, dest: impl AsRef<Path>) -> Result<Video> {
        let dest = dest.as_ref();
        match self.intermediate.take() {
            Some(tmp) => {
                let kept = tmp.keep().map_err(|e| {
                    Error::Workspace(format!("failed to disarm intermediate: {e}"))
                })?;
                workspace::persist(&kept, dest)?;
            }
            None => {
                fs::copy(&self.source, dest)?;
            }
        }
        Video::open(dest)
    }
}

impl fmt::Debug for Video {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Video")
            .field("source", &self.source)
            .field("probed", &self.metadata.get().is_some())
            .finish()
    }
}

/// Either an existing handle or a bare path, accepted anywhere an operation
/// consumes a second media input. Path variants are validated when the
/// operation normalizes them to a handle.
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// An already-constructed handle.
    Handle(&'a Video),
    /// A path to open on use.
    Path(&'a Path),
}

impl<'a> From<&'a Video> for Source<'a> {
    fn from(video: &'a Video) -> Self {
        Source::Handle(video)
    }
}

impl<'a> From<&'a Path> for Source<'a> {
    fn from(path: &'a Path) -> Self {
        Source::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for Source<'a> {
    fn from(path: &'a PathBuf) -> Self {
        Source::Path(path)
    }
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(path: &'a str) -> Self {
        Source::Path(Path::new(path))
    }
}

impl<'a> Source<'a> {
    /// Normalize to a handle, validating path variants. `storage` anchors a
    /// handle constructed here so the borrow can outlive this call.
    pub(crate) fn resolve<'s>(self, storage: &'s mut Option<Video>) -> Result<&'s Video>
    where
        'a: 's,
    {
        match self {
            Source::Handle(video) => Ok(video),
            Source::Path(path) => Ok(storage.insert(Video::open(path)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain;

    #[test]
    fn open_missing_file_fails_without_probing() {
        let err = Video::open("a_non_existent_file.none").unwrap_err();
        match err {
            Error::FileNotFound { path } => {
                assert_eq!(path, Path::new("a_non_existent_file.none"))
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }
    }

    #[test]
    fn open_stores_absolute_path() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let vid = Video::open(file.path()).unwrap();
        assert!(vid.source().is_absolute());
    }

    #[test]
    fn source_resolves_paths_and_handles() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let vid = Video::open(file.path()).unwrap();

        let mut storage = None;
        let resolved = Source::from(&vid).resolve(&mut storage).unwrap();
        assert_eq!(resolved.source(), vid.source());
        assert!(storage.is_none());

        let mut storage = None;
        let resolved = Source::from(file.path()).resolve(&mut storage).unwrap();
        assert_eq!(resolved.source(), vid.source());

        let mut storage = None;
        let err = Source::from("missing.mp4").resolve(&mut storage).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn intermediate_lives_as_long_as_the_handle() {
        let tmp = chain::intermediate(Path::new("clip.mp4")).unwrap();
        std::fs::write(&tmp, b"rendered").unwrap();
        let path = tmp.to_path_buf();

        let vid = Video::from_intermediate(tmp).unwrap();
        assert!(path.exists());
        drop(vid);
        assert!(!path.exists());
    }

    #[test]
    fn save_as_copies_a_plain_handle() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mp4");
        std::fs::write(&src, b"content").unwrap();

        let dest = dir.path().join("b.mp4");
        let saved = Video::open(&src).unwrap().save_as(&dest).unwrap();

        assert!(src.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"content");
        assert_eq!(saved.source(), dest.canonicalize().unwrap());
    }

    #[test]
    fn save_as_relocates_an_intermediate() {
        let dir = tempfile::tempdir().unwrap();
        let tmp = chain::intermediate(Path::new("clip.mp4")).unwrap();
        std::fs::write(&tmp, b"rendered").unwrap();
        let tmp_path = tmp.to_path_buf();

        let dest = dir.path().join("kept.mp4");
        let saved = Video::from_intermediate(tmp)
            .unwrap()
            .save_as(&dest)
            .unwrap();

        assert!(!tmp_path.exists());
        assert_eq!(std::fs::read(&dest).unwrap(), b"rendered");
        assert!(saved.source().is_absolute());
    }
}
