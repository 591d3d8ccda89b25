//! Gzip-compressed tar extraction.
//!
//! Only directory and regular-file entries are materialized. Link and device
//! entries abort the unpack, and every entry name is resolved lexically so
//! nothing can be written outside the destination root.

use crate::error::{ProvisionError, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use tar::EntryType;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Counts of what an unpack produced
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnpackSummary {
    pub directories: usize,
    pub files: usize,
    pub skipped: usize,
}

/// Open `archive_path` and unpack it into `destination`
pub fn unpack_file(destination: &Path, archive_path: &Path) -> Result<UnpackSummary> {
    let file = File::open(archive_path).map_err(|e| ProvisionError::io(archive_path, e))?;
    unpack(destination, file)
}

/// Unpack a gzip-compressed tar stream into `destination`.
///
/// Stops at the first failing entry. Whatever was written before the failure
/// stays on disk.
pub fn unpack<R: Read>(destination: &Path, mut reader: R) -> Result<UnpackSummary> {
    let mut head = Vec::with_capacity(GZIP_MAGIC.len());
    reader
        .by_ref()
        .take(GZIP_MAGIC.len() as u64)
        .read_to_end(&mut head)
        .map_err(ProvisionError::EntryRead)?;
    if head != GZIP_MAGIC {
        return Err(ProvisionError::InvalidCompression {
            reason: "missing gzip magic bytes".to_string(),
        });
    }

    let decoder = GzDecoder::new(io::Cursor::new(head).chain(reader));
    if decoder.header().is_none() {
        return Err(ProvisionError::InvalidCompression {
            reason: "malformed gzip header".to_string(),
        });
    }

    let mut archive = tar::Archive::new(decoder);
    // Zero-filled header blocks are skipped instead of ending the archive
    archive.set_ignore_zeros(true);

    let mut summary = UnpackSummary::default();

    for entry in archive.entries().map_err(ProvisionError::EntryRead)? {
        let mut entry = entry.map_err(ProvisionError::EntryRead)?;
        let name = entry
            .path()
            .map_err(ProvisionError::EntryRead)?
            .into_owned();
        let entry_type = entry.header().entry_type();

        match entry_type {
            EntryType::Directory | EntryType::Regular | EntryType::Continuous => {}
            EntryType::XGlobalHeader | EntryType::XHeader => {
                summary.skipped += 1;
                continue;
            }
            other => {
                return Err(ProvisionError::UnsupportedEntry {
                    path: name.display().to_string(),
                    kind: format!("{:?}", other),
                });
            }
        }

        let Some(relative) = contained_path(&name)? else {
            debug!("skipping entry with empty name");
            summary.skipped += 1;
            continue;
        };
        let target = destination.join(relative);

        if entry_type.is_dir() {
            fs::create_dir_all(&target).map_err(|source| ProvisionError::CreateDir {
                path: target.clone(),
                source,
            })?;
            debug!("dir  {}", target.display());
            summary.directories += 1;
        } else {
            let mode = entry.header().mode().map_err(ProvisionError::EntryRead)?;
            write_file(&target, &mut entry, mode)?;
            debug!("file {} ({:o})", target.display(), mode);
            summary.files += 1;
        }
    }

    Ok(summary)
}

/// Resolve an entry name to a path relative to the destination root.
///
/// Returns `None` for names with no components (`""`, `"./"`).
fn contained_path(name: &Path) -> Result<Option<PathBuf>> {
    let mut relative = PathBuf::new();

    for component in name.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(ProvisionError::PathEscape {
                    path: name.display().to_string(),
                });
            }
        }
    }

    if relative.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(relative))
    }
}

fn write_file<R: Read>(target: &Path, payload: &mut R, mode: u32) -> Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|source| ProvisionError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode & 0o7777);
    }

    let mut file = options
        .open(target)
        .map_err(|e| ProvisionError::io(target, e))?;
    io::copy(payload, &mut file).map_err(|e| ProvisionError::io(target, e))?;

    // The open mode is filtered through the umask
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(target, fs::Permissions::from_mode(mode & 0o7777))
            .map_err(|e| ProvisionError::io(target, e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}
