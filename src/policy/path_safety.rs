//! Rejection of write roots that are too broad to sandbox.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

use super::defaults::UNSAFE_WRITE_ROOTS;

/// Make `path` absolute (relative to the current directory) and collapse
/// `.`/`..` components lexically. Symlinks are not followed.
pub fn normalize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.clean();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path).clean(),
        Err(_) => path.clean(),
    }
}

/// Whether `path` may be used as an inferred write root.
///
/// Only exact matches against the unsafe-root set are rejected:
/// `/home` is unsafe, `/home/alice/project` is fine.
pub fn is_safe_write_path(path: impl AsRef<Path>) -> bool {
    let normalized = normalize_path(path.as_ref());
    if UNSAFE_WRITE_ROOTS
        .iter()
        .any(|root| normalized == Path::new(root))
    {
        tracing::warn!(path = %normalized.display(), "Rejecting unsafe write path");
        return false;
    }
    true
}
