use crate::error::{ProvisionError, Result};
use log::debug;
use std::fs;
use std::io;
use std::path::Path;

/// Ensure a directory exists, creating it and any missing parents
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|source| ProvisionError::CreateDir {
        path: path.to_path_buf(),
        source,
    })?;
    println!("Created directory: {}", path.display());
    Ok(())
}

/// Move `from` to `to` with a single rename
pub fn relocate(from: &Path, to: &Path) -> Result<()> {
    debug!("renaming {} -> {}", from.display(), to.display());

    fs::rename(from, to).map_err(|source| ProvisionError::Relocate {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Recursively delete `path`. A path that is already gone counts as cleaned.
pub fn clean_up(path: &Path) -> Result<()> {
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} already absent", path.display());
            Ok(())
        }
        Err(source) => Err(ProvisionError::Cleanup {
            path: path.to_path_buf(),
            source,
        }),
    }
}
