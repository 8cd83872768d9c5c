//! Database backup
//!
//! Copies the whole database root. A target ending in `.tar` becomes an
//! uncompressed tar archive; any other target becomes a directory copy.
//! Entries are visited in name order so archives are deterministic.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tar::Builder;

use super::errors::{TransferError, TransferResult};
use super::target::ensure_outside_root;
use crate::observability::{log_event_with_fields, Event};
use crate::storage::DocumentStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackupFormat {
    Directory,
    Tar,
}

impl BackupFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tar") => BackupFormat::Tar,
            _ => BackupFormat::Directory,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackupFormat::Directory => "directory",
            BackupFormat::Tar => "tar",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackupSummary {
    pub path: PathBuf,
    pub format: BackupFormat,
    /// Regular files copied
    pub files: usize,
}

/// `backup_<YYYYmmdd_HHMMSS>` in the working directory
pub fn default_backup_path() -> PathBuf {
    PathBuf::from(format!("backup_{}", Local::now().format("%Y%m%d_%H%M%S")))
}

/// Backs up the database root to `target`.
///
/// # Errors
///
/// - `TargetExists` if anything already exists at `target`
/// - `InvalidTarget` if `target` lies inside the database root
pub fn backup(store: &DocumentStore, target: &Path) -> TransferResult<BackupSummary> {
    if target.exists() {
        return Err(TransferError::TargetExists(target.to_path_buf()));
    }

    let root = store.registry().root();
    ensure_outside_root(root, target, "backup target must be outside the database root")?;
    let entries = collect_entries(root)?;

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            TransferError::io(format!("Failed to create {}", parent.display()), e)
        })?;
    }

    let format = BackupFormat::for_path(target);
    let files = match format {
        BackupFormat::Tar => write_archive(&entries, target)?,
        BackupFormat::Directory => copy_tree(&entries, target)?,
    };

    let count = files.to_string();
    let path = target.display().to_string();
    log_event_with_fields(
        Event::BackupComplete,
        &[
            ("files", count.as_str()),
            ("format", format.as_str()),
            ("path", path.as_str()),
        ],
    );

    Ok(BackupSummary {
        path: target.to_path_buf(),
        format,
        files,
    })
}

fn write_archive(entries: &[(String, PathBuf)], output_path: &Path) -> TransferResult<usize> {
    let file = File::create(output_path).map_err(|e| {
        TransferError::io(
            format!("Failed to create archive file: {}", output_path.display()),
            e,
        )
    })?;

    let mut builder = Builder::new(BufWriter::new(file));
    let mut files = 0;

    for (archive_path, fs_path) in entries {
        if fs_path.is_dir() {
            builder.append_dir(archive_path, fs_path).map_err(|e| {
                TransferError::io(format!("Failed to add directory to archive: {}", archive_path), e)
            })?;
        } else {
            let mut file = File::open(fs_path).map_err(|e| {
                TransferError::io(format!("Failed to open {}", fs_path.display()), e)
            })?;
            builder.append_file(archive_path, &mut file).map_err(|e| {
                TransferError::io(format!("Failed to add file to archive: {}", archive_path), e)
            })?;
            files += 1;
        }
    }

    let mut writer = builder
        .into_inner()
        .map_err(|e| TransferError::io("Failed to finish archive", e))?;
    writer
        .flush()
        .map_err(|e| TransferError::io("Failed to flush archive buffer", e))?;
    writer.get_ref().sync_all().map_err(|e| {
        TransferError::io(
            format!("Failed to fsync archive: {}", output_path.display()),
            e,
        )
    })?;

    Ok(files)
}

fn copy_tree(entries: &[(String, PathBuf)], target: &Path) -> TransferResult<usize> {
    fs::create_dir_all(target)
        .map_err(|e| TransferError::io(format!("Failed to create {}", target.display()), e))?;

    let mut files = 0;
    for (relative, fs_path) in entries {
        let dest = target.join(relative);
        if fs_path.is_dir() {
            fs::create_dir_all(&dest).map_err(|e| {
                TransferError::io(format!("Failed to create {}", dest.display()), e)
            })?;
        } else {
            fs::copy(fs_path, &dest).map_err(|e| {
                TransferError::io(format!("Failed to copy {}", fs_path.display()), e)
            })?;
            files += 1;
        }
    }
    Ok(files)
}

/// All entries below `dir` as `(relative path, absolute path)`, parents first
fn collect_entries(dir: &Path) -> TransferResult<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    collect_entries_recursive(dir, "", &mut entries)?;
    Ok(entries)
}

fn collect_entries_recursive(
    current_dir: &Path,
    prefix: &str,
    entries: &mut Vec<(String, PathBuf)>,
) -> TransferResult<()> {
    let mut dir_entries: Vec<_> = fs::read_dir(current_dir)
        .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
        .map_err(|e| TransferError::io(format!("Failed to list {}", current_dir.display()), e))?;

    dir_entries.sort_by_key(|entry| entry.file_name());

    for entry in dir_entries {
        let fs_path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();
        let relative = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        let is_dir = fs_path.is_dir();
        entries.push((relative.clone(), fs_path.clone()));
        if is_dir {
            collect_entries_recursive(&fs_path, &relative, entries)?;
        }
    }
    Ok(())
}
