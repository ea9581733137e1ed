//! File helpers shared by the patch passes.
//!
//! A pass never edits the template in place. The patched text is written to a
//! temporary file next to the template and renamed over it, so a failed pass
//! leaves the original untouched and the temporary file is removed on drop.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::{JarstrapError, Result};

/// Suffix appended to the template path for the retained backup copy.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Options for writing a patched template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchOptions {
    /// Copy the original template to `<template>.bak` before replacing it.
    pub keep_backup: bool,
}

/// `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Read a template into memory.
pub fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| JarstrapError::TemplateNotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace the contents of `path` with `contents` via temp file + rename.
///
/// The original file's permissions are carried over to the new file.
pub fn replace_atomically(path: &Path, contents: &[u8], options: &PatchOptions) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    if options.keep_backup {
        let backup = backup_path(path);
        fs::copy(path, &backup)?;
        tracing::debug!("kept backup at {}", backup.display());
    }

    tmp.persist(path).map_err(|e| JarstrapError::Io(e.error))?;
    Ok(())
}
