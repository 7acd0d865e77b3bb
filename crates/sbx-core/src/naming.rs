//! Deterministic, filesystem-safe names for sandboxes and branches.
//!
//! Everything here is pure: no I/O, no ambient state. The same inputs always
//! produce the same directory and branch names.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Fallback when sanitization empties the input.
pub const FALLBACK_TOKEN: &str = "task";

static UNSAFE_RUN_RE: OnceLock<Regex> = OnceLock::new();

fn unsafe_run_re() -> &'static Regex {
    UNSAFE_RUN_RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").unwrap())
}

/// Collapse a free-form string into the safe token alphabet
/// `[A-Za-z0-9._-]+`.
///
/// Runs of unsafe characters become a single hyphen; leading/trailing
/// `-`, `.`, `_` are trimmed. Idempotent: `sanitize(sanitize(x)) ==
/// sanitize(x)`. Distinct inputs may collapse to the same token; callers
/// accept that rather than deduplicate.
pub fn sanitize_token(s: &str) -> String {
    let trimmed = s.trim();
    let collapsed = unsafe_run_re().replace_all(trimmed, "-");
    let token = collapsed.trim_matches(|c| matches!(c, '-' | '.' | '_'));
    if token.is_empty() {
        FALLBACK_TOKEN.to_string()
    } else {
        token.to_string()
    }
}

/// Derive a repo slug from a git remote URL.
///
/// Supports `git@host:org/repo.git` (SCP-style) and `https://host/org/repo`.
pub fn slug_from_url(url: &str) -> String {
    let mut u = url.trim();
    u = u.strip_suffix('/').unwrap_or(u);
    if u.contains(':') && !u.starts_with("http") {
        u = &u[u.find(':').unwrap() + 1..];
    }
    let last = u.rsplit('/').next().unwrap_or(u);
    let slug = last.strip_suffix(".git").unwrap_or(last);
    sanitize_token(slug)
}

/// `{base}/{slug}-{sanitize(task)}` — the sandbox's directory.
pub fn sandbox_dir(base: &Path, repo_slug: &str, task: &str) -> PathBuf {
    base.join(format!("{repo_slug}-{}", sanitize_token(task)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_collapses_unsafe_runs() {
        assert_eq!(sanitize_token("fix bug #1"), "fix-bug-1");
        assert_eq!(sanitize_token("  spaced out  "), "spaced-out");
        assert_eq!(sanitize_token("a//b\\c"), "a-b-c");
    }

    #[test]
    fn sanitize_trims_edge_punctuation() {
        assert_eq!(sanitize_token("-leading"), "leading");
        assert_eq!(sanitize_token("trailing._-"), "trailing");
        assert_eq!(sanitize_token("..dots.."), "dots");
    }

    #[test]
    fn sanitize_empty_falls_back() {
        assert_eq!(sanitize_token(""), FALLBACK_TOKEN);
        assert_eq!(sanitize_token("   "), FALLBACK_TOKEN);
        assert_eq!(sanitize_token("###"), FALLBACK_TOKEN);
    }

    #[test]
    fn sanitize_is_idempotent() {
        for s in ["fix bug #1", "already-safe", "..x..", "", "名前 space"] {
            let once = sanitize_token(s);
            assert_eq!(sanitize_token(&once), once, "input: {s:?}");
        }
    }

    #[test]
    fn sanitize_output_stays_in_alphabet() {
        let re = Regex::new(r"^[A-Za-z0-9._-]+$").unwrap();
        for s in ["fix bug #1", "", "!!!", "ok", " a b ", "ünïcødé"] {
            assert!(re.is_match(&sanitize_token(s)), "input: {s:?}");
        }
    }

    #[test]
    fn slug_from_scp_style_url() {
        assert_eq!(slug_from_url("git@github.com:org/repo.git"), "repo");
    }

    #[test]
    fn slug_from_https_url() {
        assert_eq!(slug_from_url("https://github.com/org/repo/"), "repo");
        assert_eq!(slug_from_url("https://github.com/org/repo.git"), "repo");
    }

    #[test]
    fn slug_from_local_path() {
        assert_eq!(slug_from_url("/srv/git/project.git"), "project");
    }

    #[test]
    fn sandbox_dir_combines_slug_and_sanitized_task() {
        let base = Path::new("/tmp/wip");
        assert_eq!(
            sandbox_dir(base, "repo", "fix bug #1"),
            PathBuf::from("/tmp/wip/repo-fix-bug-1")
        );
    }
}
