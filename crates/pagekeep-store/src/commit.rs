// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Commit stage — name a processed image and move it into the store.
//
// A document becomes visible to listings only once it sits in the store under
// its final name. Cross-device moves go through a hidden `.partial` file that
// listings ignore.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use pagekeep_core::error::{PagekeepError, Result};
use pagekeep_core::{AppConfig, StoredDocumentRecord};
use tracing::{debug, info, instrument, warn};

use crate::naming::{build_filename, next_timestamp_millis, sanitize_title};

/// Moves processed images into the store directory under their final names.
#[derive(Debug, Clone)]
pub struct CommitStage {
    store_dir: PathBuf,
    /// Used when the source file has no extension of its own.
    default_extension: String,
}

impl CommitStage {
    pub fn new(store_dir: impl Into<PathBuf>) -> Self {
        Self {
            store_dir: store_dir.into(),
            default_extension: AppConfig::default().file_extension,
        }
    }

    /// Stage committing into `<data_dir>/<config.store_dir_name>`.
    pub fn from_config(config: &AppConfig, data_dir: &Path) -> Self {
        Self::new(data_dir.join(&config.store_dir_name))
            .with_extension(config.file_extension.clone())
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.default_extension = extension.into();
        self
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Move `source` into the store as a document titled `title`.
    ///
    /// A blank title fails with [`PagekeepError::InvalidTitle`] before the
    /// source is touched. Any failure to move fails with
    /// [`PagekeepError::CommitFailed`] and leaves no listable file behind.
    #[instrument(skip(self), fields(source = %source.display()))]
    pub fn commit(&self, source: &Path, title: &str) -> Result<StoredDocumentRecord> {
        let title = sanitize_title(title)?;

        let meta = fs::metadata(source).map_err(|e| {
            PagekeepError::CommitFailed(format!("source {} unavailable: {e}", source.display()))
        })?;
        if !meta.is_file() {
            return Err(PagekeepError::CommitFailed(format!(
                "source {} is not a file",
                source.display()
            )));
        }

        fs::create_dir_all(&self.store_dir).map_err(|e| {
            PagekeepError::CommitFailed(format!(
                "cannot create store {}: {e}",
                self.store_dir.display()
            ))
        })?;

        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_ascii_lowercase)
            .unwrap_or_else(|| self.default_extension.clone());

        let (id, millis, target) = loop {
            let millis = next_timestamp_millis();
            let id = build_filename(&title, millis, &extension);
            let target = self.store_dir.join(&id);
            if !target.exists() {
                break (id, millis, target);
            }
            debug!(%id, "Name already taken, advancing timestamp");
        };

        move_into_store(source, &target).map_err(|e| {
            PagekeepError::CommitFailed(format!(
                "cannot move {} to {}: {e}",
                source.display(),
                target.display()
            ))
        })?;

        let created_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            PagekeepError::CommitFailed(format!("timestamp {millis} out of range"))
        })?;
        if let Err(e) = stamp_modified(&target, created_at) {
            warn!(error = %e, "Could not set modification time on committed document");
        }

        info!(%id, %title, "Document committed");
        Ok(StoredDocumentRecord {
            id,
            title,
            created_at,
            location: target,
        })
    }
}

/// Rename `source` to `target`, copying through a hidden partial file when
/// the two live on different filesystems.
fn move_into_store(source: &Path, target: &Path) -> io::Result<()> {
    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!("Rename crosses devices, copying instead");
            copy_into_store(source, target)
        }
        Err(e) => Err(e),
    }
}

fn copy_into_store(source: &Path, target: &Path) -> io::Result<()> {
    let partial = partial_path(target);

    let copied = (|| -> io::Result<()> {
        let mut input = fs::File::open(source)?;
        let mut output = fs::File::create(&partial)?;
        io::copy(&mut input, &mut output)?;
        output.sync_all()?;
        fs::rename(&partial, target)
    })();
    if let Err(e) = copied {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }

    if let Err(e) = fs::remove_file(source) {
        warn!(error = %e, source = %source.display(), "Committed copy, but could not remove source");
    }
    Ok(())
}

/// `<dir>/.<name>.partial`
fn partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.partial"))
}

fn stamp_modified(path: &Path, at: DateTime<Utc>) -> io::Result<()> {
    let file = fs::File::options().write(true).open(path)?;
    file.set_modified(SystemTime::from(at))
}
