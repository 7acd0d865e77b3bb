//! Per-sandbox provenance snapshot.
//!
//! Written exactly once at the end of a successful create. Never refreshed:
//! if the user or the launched tool later switches branches, the recorded
//! `branch` diverges from the live one. `status` and `list` report both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::io;

/// Metadata filename inside the sandbox root.
pub const META_FILE: &str = ".codex_sandbox.json";

/// Immutable creation-time snapshot. Field order is the serialized key
/// order; keep it alphabetical so the file is stable across writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SandboxMetadata {
    pub base_branch: String,
    pub branch: String,
    pub created_at: DateTime<Utc>,
    pub remote_url: String,
    pub repo_slug: String,
    pub task: String,
}

/// Serialize the snapshot as formatted JSON to `dir/.codex_sandbox.json`.
pub fn write_meta(dir: &Path, meta: &SandboxMetadata) -> Result<()> {
    let mut json = serde_json::to_string_pretty(meta)?;
    json.push('\n');
    io::atomic_write(&dir.join(META_FILE), json.as_bytes())
}

/// List the snapshot in `.git/info/exclude` so it never shows up as an
/// untracked file — a freshly created sandbox must report clean, and the
/// snapshot must never be committed. Idempotent; preserves existing entries.
pub fn exclude_from_status(dir: &Path) -> Result<()> {
    let exclude = dir.join(".git").join("info").join("exclude");
    let existing = match std::fs::read_to_string(&exclude) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e.into()),
    };
    if existing.lines().any(|l| l.trim() == META_FILE) {
        return Ok(());
    }
    let mut out = existing;
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(META_FILE);
    out.push('\n');
    io::atomic_write(&exclude, out.as_bytes())
}

/// Best-effort read: missing or unparseable files are treated as absent so
/// listing and status degrade gracefully on foreign or partially-written
/// directories.
pub fn read_meta(dir: &Path) -> Option<SandboxMetadata> {
    let content = std::fs::read_to_string(dir.join(META_FILE)).ok()?;
    serde_json::from_str(&content).ok()
}
