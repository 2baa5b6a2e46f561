use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// First free `<stem>_<n><ext>` in `dir`, or `file_name` itself if free.
pub fn unique_target(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default();
    let ext = path.extension().map(|e| format!(".{}", e.to_string_lossy())).unwrap_or_default();

    let mut counter = 1;
    loop {
        let candidate = dir.join(format!("{}_{}{}", stem, counter, ext));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move `src` into `dest_dir` as `file_name`, creating the folder if needed.
/// An existing target is replaced with `force`, otherwise the name gets a
/// numeric suffix. Returns the final path.
pub fn move_file(src: &Path, dest_dir: &Path, file_name: &str, force: bool) -> Result<PathBuf> {
    if !src.exists() {
        anyhow::bail!("Source file does not exist: {}", src.display());
    }
    if !dest_dir.exists() {
        tracing::info!("Creating directory: {:?}", dest_dir);
        std::fs::create_dir_all(dest_dir)
            .with_context(|| format!("Failed to create {}", dest_dir.display()))?;
    }

    let target = if force {
        dest_dir.join(file_name)
    } else {
        unique_target(dest_dir, file_name)
    };

    if std::fs::rename(src, &target).is_err() {
        // rename fails across filesystems
        std::fs::copy(src, &target)
            .with_context(|| format!("Failed to copy {} to {}", src.display(), target.display()))?;
        std::fs::remove_file(src)
            .with_context(|| format!("Failed to remove {}", src.display()))?;
    }

    tracing::info!("Moved {:?} -> {:?}", src.file_name(), target);
    Ok(target)
}
