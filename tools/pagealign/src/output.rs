//! Atomic output writing.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::{Builder, NamedTempFile};

/// The file a write to `path` should land in: the link target when `path`
/// is a symlink, `path` itself otherwise.
fn resolve_target(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

/// Uniquely named staging file next to `target`.
fn staging_file(target: &Path) -> Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    builder.prefix(".pagealign-").suffix(".tmp");
    // Same mode a plain create would get; umask still applies.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
        .tempfile_in(dir)
        .with_context(|| format!("creating staging file in {}", dir.display()))
}

/// Write `data` to `path` atomically (write to a staging file, then rename).
///
/// Either the complete image ends up at `path` or `path` is left as it was.
/// An existing file keeps its permissions, and a symlink keeps pointing at
/// the file it names.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let target = resolve_target(path);
    let mut staged = staging_file(&target)?;

    staged
        .write_all(data)
        .and_then(|()| staged.as_file().sync_all())
        .with_context(|| format!("writing {}", staged.path().display()))?;

    if let Ok(meta) = fs::metadata(&target) {
        staged
            .as_file()
            .set_permissions(meta.permissions())
            .with_context(|| format!("copying permissions of {}", target.display()))?;
    }

    // On failure the staging file is removed when `PersistError` drops it.
    staged
        .persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("replacing {}", target.display()))?;

    Ok(())
}
