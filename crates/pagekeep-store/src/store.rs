// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document store — list, search, look up, and delete committed documents.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use pagekeep_core::error::{PagekeepError, Result};
use pagekeep_core::{AppConfig, StoredDocumentRecord};
use tracing::{debug, info, instrument, warn};

use crate::naming::parse_filename;

/// Read side of the store directory.
///
/// Holds no cache and no lock. Every call looks at the directory as it is
/// now, so documents committed or removed elsewhere show up on the next call.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at `<data_dir>/<config.store_dir_name>`.
    pub fn from_config(config: &AppConfig, data_dir: &Path) -> Self {
        Self::new(data_dir.join(&config.store_dir_name))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// All documents, newest first. Equal timestamps order by id.
    ///
    /// A store directory that does not exist yet is simply empty.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn list(&self) -> Result<Vec<StoredDocumentRecord>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Store directory does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            let Ok(name) = entry.file_name().into_string() else {
                debug!(path = %entry.path().display(), "Skipping non-UTF-8 filename");
                continue;
            };
            if let Some(record) = read_record(&name, &entry.path()) {
                records.push(record);
            }
        }

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        debug!(count = records.len(), "Store listed");
        Ok(records)
    }

    /// Documents whose title contains `query`, ignoring case, newest first.
    ///
    /// A blank query matches everything.
    #[instrument(skip(self))]
    pub fn search(&self, query: &str) -> Result<Vec<StoredDocumentRecord>> {
        let needle = query.trim().to_lowercase();
        let records = self.list()?;
        if needle.is_empty() {
            return Ok(records);
        }
        Ok(records
            .into_iter()
            .filter(|r| r.title.to_lowercase().contains(&needle))
            .collect())
    }

    /// Look up one document by id. Unknown or malformed ids give `None`.
    pub fn get(&self, id: &str) -> Result<Option<StoredDocumentRecord>> {
        if validate_id(id).is_err() {
            return Ok(None);
        }
        Ok(read_record(id, &self.dir.join(id)))
    }

    /// First step of deletion. Nothing is removed until the returned
    /// [`PendingDelete`] is confirmed and handed to [`DocumentStore::delete`].
    pub fn prepare_delete(&self, id: &str) -> Result<PendingDelete> {
        validate_id(id)?;
        Ok(PendingDelete { id: id.to_string() })
    }

    /// Remove a confirmed document.
    ///
    /// A document that is already gone fails with
    /// [`PagekeepError::DeleteFailed`], which callers treat as silent. Any
    /// other filesystem failure is returned as [`PagekeepError::Io`] and the
    /// document stays listed.
    #[instrument(skip_all, fields(id = %confirmed.id))]
    pub fn delete(&self, confirmed: ConfirmedDelete) -> Result<()> {
        let path = self.dir.join(&confirmed.id);
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Document deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Document already removed");
                Err(PagekeepError::DeleteFailed(format!(
                    "{} no longer exists",
                    confirmed.id
                )))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Document could not be removed");
                Err(e.into())
            }
        }
    }
}

/// A deletion the user has asked for but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "nothing is deleted until the request is confirmed"]
pub struct PendingDelete {
    id: String,
}

impl PendingDelete {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The user confirmed; the deletion may now be executed.
    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// A confirmed deletion. Only obtainable from [`PendingDelete::confirm`].
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: String,
}

impl ConfirmedDelete {
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Ids are bare filenames inside the store that follow the naming scheme.
fn validate_id(id: &str) -> Result<()> {
    let mut components = Path::new(id).components();
    let single_normal = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == id
    );
    if !single_normal
        || id.contains(['/', '\\'])
        || id.starts_with('.')
        || parse_filename(id).is_none()
    {
        return Err(PagekeepError::DeleteFailed(format!(
            "{id:?} is not a document id"
        )));
    }
    Ok(())
}

/// Build a record for the store entry `name` at `path`, or `None` if the
/// entry is not a listable document.
fn read_record(name: &str, path: &Path) -> Option<StoredDocumentRecord> {
    if name.starts_with('.') {
        debug!(entry = name, "Skipping hidden entry");
        return None;
    }
    let Some((title, _millis)) = parse_filename(name) else {
        debug!(entry = name, "Skipping file outside the naming scheme");
        return None;
    };
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) => {
            debug!(entry = name, error = %e, "Skipping entry with unreadable metadata");
            return None;
        }
    };
    if !meta.is_file() {
        debug!(entry = name, "Skipping non-file entry");
        return None;
    }
    let modified = match meta.modified() {
        Ok(modified) => modified,
        Err(e) => {
            debug!(entry = name, error = %e, "Skipping entry without a modification time");
            return None;
        }
    };

    Some(StoredDocumentRecord {
        id: name.to_string(),
        title: title.to_string(),
        created_at: DateTime::<Utc>::from(modified),
        location: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::CommitStage;
    use pagekeep_core::human_errors::{Severity, humanize_error};

    struct Fixture {
        _dir: tempfile::TempDir,
        incoming: PathBuf,
        stage: CommitStage,
        store: DocumentStore,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let incoming = dir.path().join("incoming");
        fs::create_dir_all(&incoming).unwrap();
        let scans = dir.path().join("scans");
        Fixture {
            incoming,
            stage: CommitStage::new(&scans),
            store: DocumentStore::new(&scans),
            _dir: dir,
        }
    }

    impl Fixture {
        fn commit(&self, title: &str) -> StoredDocumentRecord {
            let source = self.incoming.join(format!("{title}.jpg"));
            fs::write(&source, b"jpeg bytes").unwrap();
            self.stage.commit(&source, title).unwrap()
        }
    }

    #[test]
    fn missing_directory_lists_empty() {
        let f = fixture();
        assert!(f.store.list().unwrap().is_empty());
        assert!(f.store.search("anything").unwrap().is_empty());
    }

    #[test]
    fn committed_document_is_listed() {
        let f = fixture();
        let before = Utc::now();
        let record = f.commit("Invoice");
        let after = Utc::now();

        let listed = f.store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], record);
        assert_eq!(listed[0].title, "Invoice");
        // The commit clock may run a few ms ahead when other commits share a millisecond.
        assert!(listed[0].created_at >= before - chrono::Duration::milliseconds(1));
        assert!(listed[0].created_at <= after + chrono::Duration::seconds(1));
    }

    #[test]
    fn search_matches_case_insensitively_newest_first() {
        let f = fixture();
        f.commit("Invoice");
        f.commit("Receipt");
        f.commit("INVENTORY");

        let titles: Vec<String> = f
            .store
            .search("inv")
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["INVENTORY", "Invoice"]);

        assert_eq!(f.store.search("  ").unwrap().len(), 3);
        assert!(f.store.search("tax").unwrap().is_empty());
    }

    #[test]
    fn list_skips_foreign_entries() {
        let f = fixture();
        let kept = f.commit("Manual");
        let dir = f.store.dir();
        fs::write(dir.join("notes.txt"), b"x").unwrap();
        fs::write(dir.join("Scan_abc.jpg"), b"x").unwrap();
        fs::write(dir.join(".Invoice_1.jpg.partial"), b"x").unwrap();
        fs::write(dir.join(".Hidden_5.jpg"), b"x").unwrap();
        fs::create_dir(dir.join("Folder_123.jpg")).unwrap();

        let listed = f.store.list().unwrap();
        assert_eq!(listed, vec![kept]);
    }

    #[test]
    fn equal_timestamps_order_by_id() {
        let f = fixture();
        let dir = f.store.dir();
        fs::create_dir_all(dir).unwrap();
        let at = std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_760_000_000);
        for name in ["b_100.jpg", "a_100.jpg", "c_50.jpg"] {
            let path = dir.join(name);
            fs::write(&path, b"x").unwrap();
            fs::File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(at)
                .unwrap();
        }

        let ids: Vec<String> = f.store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a_100.jpg", "b_100.jpg", "c_50.jpg"]);
    }

    #[test]
    fn get_finds_one_record() {
        let f = fixture();
        let record = f.commit("Lease");
        assert_eq!(f.store.get(&record.id).unwrap(), Some(record));
        assert_eq!(f.store.get("Lease_1.jpg").unwrap(), None);
        assert_eq!(f.store.get("../escape_1.jpg").unwrap(), None);
    }

    #[test]
    fn delete_requires_confirmation_and_removes() {
        let f = fixture();
        let record = f.commit("Invoice");

        let pending = f.store.prepare_delete(&record.id).unwrap();
        assert_eq!(pending.id(), record.id);
        assert_eq!(f.store.list().unwrap().len(), 1);

        f.store.delete(pending.confirm()).unwrap();
        assert!(f.store.list().unwrap().iter().all(|r| r.id != record.id));
        assert!(!record.location.exists());
    }

    #[test]
    fn second_delete_is_silent_failure() {
        let f = fixture();
        let record = f.commit("Invoice");

        let first = f.store.prepare_delete(&record.id).unwrap().confirm();
        let second = f.store.prepare_delete(&record.id).unwrap().confirm();
        f.store.delete(first).unwrap();

        let err = f.store.delete(second).unwrap_err();
        assert!(matches!(err, PagekeepError::DeleteFailed(_)));
        assert_eq!(humanize_error(&err).severity, Severity::Silent);
        assert!(f.store.list().unwrap().is_empty());
    }

    #[test]
    fn ids_with_path_components_are_rejected() {
        let f = fixture();
        for id in ["../outside.jpg", "sub/Invoice_1.jpg", "/etc/passwd", "", ".", ".."] {
            assert!(f.store.prepare_delete(id).is_err(), "{id:?}");
        }
    }

    #[test]
    fn entries_outside_naming_scheme_cannot_be_deleted() {
        let f = fixture();
        f.commit("Manual");
        let notes = f.store.dir().join("notes.txt");
        fs::write(&notes, b"keep me").unwrap();

        let err = f.store.prepare_delete("notes.txt").unwrap_err();
        assert!(matches!(err, PagekeepError::DeleteFailed(_)));
        assert!(notes.exists());
    }

    #[test]
    fn undeletable_entry_reports_visible_error() {
        let f = fixture();
        f.commit("Manual");
        let blocked = f.store.dir().join("Invoice_1.jpg");
        fs::create_dir(&blocked).unwrap();

        let request = f.store.prepare_delete("Invoice_1.jpg").unwrap().confirm();
        let err = f.store.delete(request).unwrap_err();
        assert!(matches!(err, PagekeepError::Io(_)), "{err:?}");
        assert_ne!(humanize_error(&err).severity, Severity::Silent);
        assert!(blocked.exists());
    }
}
