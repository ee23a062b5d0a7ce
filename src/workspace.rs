//! Scoped temporary workspaces.
//!
//! Multi-step operations need somewhere to put intermediate files. A scratch
//! directory is acquired before the operation body runs and removed
//! recursively once it finishes, on every exit path. A caller that already
//! holds a workspace can pass it through instead, suppressing the managed
//! lifecycle entirely.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use crate::{Error, Result};

/// Run `op` with a scratch directory for intermediate files.
///
/// When `dir` is `None`, a fresh uniquely-named directory is created under
/// the system temp area, `op` is invoked with its path, and the directory and
/// everything inside it are removed once `op` returns, whether it succeeded
/// or failed. `op`'s own outcome is propagated unchanged; a removal failure
/// is logged and never replaces it.
///
/// When `dir` is `Some`, the supplied directory is passed through as-is:
/// nothing is created or removed, and the call can be repeated with the same
/// directory. This lets an operation compose inside a caller that already
/// holds a workspace without nesting temp directories or deleting one that is
/// still needed.
///
/// # Errors
///
/// Returns [`Error::Workspace`] if the scratch directory cannot be created;
/// `op` is not invoked in that case.
///
/// # Example
///
/// ```
/// use avchop::with_scratch;
///
/// let listing = with_scratch(None, |dir| {
///     let path = dir.join("inputs.txt");
///     std::fs::write(&path, "file 'a.mp4'\n")?;
///     Ok(std::fs::read_to_string(&path)?)
/// })?;
/// assert!(listing.contains("a.mp4"));
/// # Ok::<(), avchop::Error>(())
/// ```
pub fn with_scratch<T, F>(dir: Option<&Path>, op: F) -> Result<T>
where
    F: FnOnce(&Path) -> Result<T>,
{
    let scratch = match dir {
        Some(existing) => return op(existing),
        None => TempDir::with_prefix("avchop-")
            .map_err(|e| Error::Workspace(format!("failed to create scratch directory: {e}")))?,
    };

    let result = op(scratch.path());

    // A panic inside `op` unwinds through `scratch` and still removes the
    // directory; this explicit close only exists to report removal errors.
    if let Err(remove_err) = scratch.close() {
        tracing::warn!("failed to remove scratch directory: {remove_err}");
    }

    result
}

/// Move a finished artifact out of the scratch area to its final
/// destination.
///
/// Renames when source and destination share a filesystem, otherwise copies
/// and removes the original.
pub(crate) fn persist(src: &Path, dest: &Path) -> Result<()> {
    if fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    fs::copy(src, dest)?;
    fs::remove_file(src)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::PathBuf;

    #[test]
    fn scratch_exists_during_op_and_is_removed_after() {
        let observed = with_scratch(None, |dir| {
            assert!(dir.is_dir());
            fs::write(dir.join("intermediate.mp4"), b"partial").unwrap();
            Ok(dir.to_path_buf())
        })
        .unwrap();
        assert!(!observed.exists());
    }

    #[test]
    fn failure_propagates_unchanged_and_scratch_is_removed() {
        let mut observed = PathBuf::new();
        let err = with_scratch::<(), _>(None, |dir| {
            observed = dir.to_path_buf();
            fs::write(dir.join("partial.mp4"), b"junk").unwrap();
            Err(Error::InvalidInput("boom".into()))
        })
        .unwrap_err();

        assert!(matches!(err, Error::InvalidInput(msg) if msg == "boom"));
        assert!(!observed.exists());
    }

    #[test]
    fn supplied_dir_is_passed_through_and_never_removed() {
        let dir = tempfile::tempdir().unwrap();

        // Repeating with the same directory must not error either.
        for _ in 0..2 {
            with_scratch(Some(dir.path()), |d| {
                assert_eq!(d, dir.path());
                Ok(())
            })
            .unwrap();
            assert!(dir.path().is_dir());
        }

        let _ = with_scratch::<(), _>(Some(dir.path()), |_| {
            Err(Error::InvalidInput("boom".into()))
        });
        assert!(dir.path().is_dir());
    }

    #[test]
    fn concurrent_scratch_dirs_are_distinct() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    with_scratch(None, |dir| {
                        assert!(dir.is_dir());
                        Ok(dir.to_path_buf())
                    })
                    .unwrap()
                })
            })
            .collect();

        let paths: HashSet<PathBuf> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(paths.len(), 8);
    }

    #[test]
    fn persist_moves_across_directories() {
        let src_dir = tempfile::tempdir().unwrap();
        let dest_dir = tempfile::tempdir().unwrap();
        let src = src_dir.path().join("out.mp4");
        let dest = dest_dir.path().join("final.mp4");
        fs::write(&src, b"artifact").unwrap();

        persist(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"artifact");
    }
}
