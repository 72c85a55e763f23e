//! All-or-nothing file output.

use crate::error::{CoexprError, Result};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Buffered writer over a not-yet-persisted temporary file.
pub type StagedWriter = BufWriter<NamedTempFile>;

/// A fully written temporary file waiting to be moved into place.
///
/// The temporary file lives next to its destination so the final rename
/// stays on one filesystem. Dropping a `StagedFile` without committing
/// deletes it.
#[derive(Debug)]
pub struct StagedFile {
    temp: NamedTempFile,
    path: PathBuf,
}

impl StagedFile {
    /// Write a temporary file for `path` with `write`.
    pub fn stage<P, F>(path: P, write: F) -> Result<Self>
    where
        P: AsRef<Path>,
        F: FnOnce(&mut StagedWriter) -> Result<()>,
    {
        let path = path.as_ref().to_path_buf();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let mut writer = BufWriter::new(NamedTempFile::new_in(&dir)?);
        write(&mut writer)?;
        writer.flush()?;
        let temp = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(Self { temp, path })
    }

    /// Destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomically replace the destination with the staged content.
    pub fn commit(self) -> Result<PathBuf> {
        self.temp
            .persist(&self.path)
            .map_err(|e| CoexprError::Io(e.error))?;
        Ok(self.path)
    }
}

/// Write `path` through a temporary file that is renamed into place only
/// after `write` succeeds.
pub fn write_atomic<P, F>(path: P, write: F) -> Result<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut StagedWriter) -> Result<()>,
{
    StagedFile::stage(path, write)?.commit()?;
    Ok(())
}

/// Commit every staged file, in order.
///
/// Nothing is renamed until all files were staged; a failed rename can
/// still leave earlier files of the batch in place.
pub fn commit_all(staged: Vec<StagedFile>) -> Result<Vec<PathBuf>> {
    staged.into_iter().map(StagedFile::commit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_atomic() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        write_atomic(&path, |w| {
            writeln!(w, "hello")?;
            Ok(())
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_failed_write_leaves_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        let result = write_atomic(&path, |w| {
            writeln!(w, "partial")?;
            Err(CoexprError::EmptyResult("stop".to_string()))
        });
        assert!(result.is_err());
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_staged_files_appear_on_commit() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");

        let staged = vec![
            StagedFile::stage(&a, |w| Ok(write!(w, "a")?)).unwrap(),
            StagedFile::stage(&b, |w| Ok(write!(w, "b")?)).unwrap(),
        ];
        assert!(!a.exists());
        assert!(!b.exists());

        let written = commit_all(staged).unwrap();
        assert_eq!(written, vec![a.clone(), b.clone()]);
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "b");
    }

    #[test]
    fn test_replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "old").unwrap();
        write_atomic(&path, |w| Ok(write!(w, "new")?)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }
}
