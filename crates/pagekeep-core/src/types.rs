// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for stored documents.

use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Durable identity of one document in the store.
///
/// Records are produced by the commit stage and by directory listings; they
/// are never edited in place. Renaming a document means committing a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredDocumentRecord {
    /// Store-unique identifier (the backing filename).
    pub id: String,
    /// User-supplied display name.
    pub title: String,
    /// Taken from the backing file's modification time.
    pub created_at: DateTime<Utc>,
    /// Path of the backing file.
    pub location: PathBuf,
}

impl StoredDocumentRecord {
    /// Presentation projection with a calendar date instead of a timestamp.
    pub fn to_view(&self) -> RecordView {
        RecordView {
            id: self.id.clone(),
            title: self.title.clone(),
            date: self
                .created_at
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
            location: self.location.clone(),
        }
    }
}

/// What presentation layers receive for each stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordView {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD` in local time.
    pub date: String,
    pub location: PathBuf,
}
