//! Bare-mirror cache: one local bare repository per repo slug, reused as a
//! fast clone source across sandbox creations.

use std::path::Path;

use crate::error::{Result, SbxError};
use crate::{git, io};

/// Directory name under the cache root holding all mirrors.
pub const MIRROR_NAMESPACE: &str = "sbx-mirrors";

/// Guarantee a fresh, correctly-addressed bare mirror at `bare_dir`.
///
/// - Absent: full `git clone --bare` from `remote_url` (network).
/// - Present: repoint `origin` if the URL drifted (add it if missing),
///   then `fetch --prune` — an incremental update only.
///
/// Idempotent. The mirror is never deleted by this tool.
pub fn ensure_bare_mirror(bare_dir: &Path, remote_url: &str) -> Result<()> {
    if bare_dir.exists() && !bare_dir.is_dir() {
        return Err(SbxError::NotADirectory(bare_dir.to_path_buf()));
    }

    if !bare_dir.exists() {
        if let Some(parent) = bare_dir.parent() {
            io::ensure_dir(parent)?;
        }
        tracing::info!(url = %remote_url, dir = %bare_dir.display(), "creating bare mirror");
        git::clone_bare(remote_url, bare_dir)?;
        return Ok(());
    }

    match git::bare_remote_url(bare_dir, "origin") {
        Some(existing) if existing == remote_url => {}
        Some(_) => {
            tracing::warn!(url = %remote_url, "mirror origin URL drifted, repointing");
            git::bare_remote_set_url(bare_dir, "origin", remote_url)?;
        }
        None => git::bare_remote_add(bare_dir, "origin", remote_url)?,
    }

    git::bare_fetch_prune(bare_dir, "origin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source_repo() -> TempDir {
        crate::testutil::temp_repo()
    }

    fn url_of(dir: &Path) -> String {
        dir.to_string_lossy().into_owned()
    }

    #[test]
    fn creates_mirror_on_first_call() {
        let src = source_repo();
        let cache = TempDir::new().unwrap();
        let bare = cache.path().join("project.git");

        ensure_bare_mirror(&bare, &url_of(src.path())).unwrap();
        assert!(bare.join("HEAD").exists(), "bare repo layout expected");
        assert_eq!(
            git::bare_remote_url(&bare, "origin").as_deref(),
            Some(url_of(src.path()).as_str())
        );
    }

    #[test]
    fn second_call_is_incremental_and_idempotent() {
        let src = source_repo();
        let cache = TempDir::new().unwrap();
        let bare = cache.path().join("project.git");
        let url = url_of(src.path());

        ensure_bare_mirror(&bare, &url).unwrap();
        ensure_bare_mirror(&bare, &url).unwrap();
        assert_eq!(git::bare_remote_url(&bare, "origin").as_deref(), Some(url.as_str()));
    }

    #[test]
    fn repoints_drifted_origin() {
        let src = source_repo();
        let other = source_repo();
        let cache = TempDir::new().unwrap();
        let bare = cache.path().join("project.git");

        ensure_bare_mirror(&bare, &url_of(src.path())).unwrap();
        ensure_bare_mirror(&bare, &url_of(other.path())).unwrap();
        assert_eq!(
            git::bare_remote_url(&bare, "origin").as_deref(),
            Some(url_of(other.path()).as_str())
        );
    }

    #[test]
    fn path_occupied_by_file_is_config_error() {
        let src = source_repo();
        let cache = TempDir::new().unwrap();
        let bare = cache.path().join("project.git");
        std::fs::write(&bare, "not a directory").unwrap();

        let err = ensure_bare_mirror(&bare, &url_of(src.path())).unwrap_err();
        assert!(matches!(err, SbxError::NotADirectory(_)));
    }
}
