use crate::error::Result;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// Prevents partial writes from corrupting metadata or hook files.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Copy `src` to `dest` only when `src` exists and `dest` does not.
/// Returns true if copied. Never overwrites.
pub fn copy_if_missing(src: &Path, dest: &Path) -> Result<bool> {
    if !src.exists() || dest.exists() {
        return Ok(false);
    }
    std::fs::copy(src, dest)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_file_and_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/meta.json");
        atomic_write(&path, b"{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn atomic_write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("f");
        atomic_write(&path, b"one").unwrap();
        atomic_write(&path, b"two").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "two");
    }

    #[test]
    fn copy_if_missing_copies_once() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join(".env.example");
        let dest = dir.path().join(".env");
        std::fs::write(&src, "KEY=example").unwrap();

        assert!(copy_if_missing(&src, &dest).unwrap());
        std::fs::write(&dest, "KEY=edited").unwrap();
        assert!(!copy_if_missing(&src, &dest).unwrap());
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "KEY=edited");
    }

    #[test]
    fn copy_if_missing_without_source_is_noop() {
        let dir = TempDir::new().unwrap();
        let copied = copy_if_missing(&dir.path().join("nope"), &dir.path().join(".env")).unwrap();
        assert!(!copied);
    }
}
