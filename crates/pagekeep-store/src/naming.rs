// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Store filenames — `{sanitized-title}_{unixMillis}.{ext}`.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use pagekeep_core::error::{PagekeepError, Result};

/// Characters that never appear in a stored filename.
const RESERVED: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Longest title part in bytes. Leaves room for `_{millis}.{ext}` under the
/// usual 255-byte filename limit.
pub const MAX_TITLE_BYTES: usize = 200;

/// Turn a user-supplied title into the filename-safe title part.
///
/// Trims surrounding whitespace and replaces reserved and control characters
/// with `-`. A leading `.` is replaced too, since dot-files are never listed.
/// Long titles are cut at a character boundary to [`MAX_TITLE_BYTES`].
/// Titles that are empty after trimming are rejected.
pub fn sanitize_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(PagekeepError::InvalidTitle(title.to_string()));
    }

    let mut sanitized: String = trimmed
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || c.is_control() {
                '-'
            } else {
                c
            }
        })
        .collect();
    if sanitized.starts_with('.') {
        sanitized.replace_range(..1, "-");
    }
    if sanitized.len() > MAX_TITLE_BYTES {
        let mut end = MAX_TITLE_BYTES;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized.truncate(end);
        sanitized.truncate(sanitized.trim_end().len());
    }
    Ok(sanitized)
}

pub fn build_filename(sanitized_title: &str, millis: i64, extension: &str) -> String {
    format!("{sanitized_title}_{millis}.{extension}")
}

/// Split a stored filename into its title and millisecond timestamp.
///
/// Returns `None` for anything that does not follow the naming scheme.
pub fn parse_filename(name: &str) -> Option<(&str, i64)> {
    let (stem, extension) = name.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    let (title, millis) = stem.rsplit_once('_')?;
    if title.is_empty() || millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((title, millis.parse().ok()?))
}

static LAST_MILLIS: AtomicI64 = AtomicI64::new(0);

/// Wall-clock milliseconds, strictly increasing across the whole process.
///
/// Two calls in the same millisecond get consecutive values, so commits with
/// identical titles still receive distinct names.
pub fn next_timestamp_millis() -> i64 {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_MILLIS
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(previous + 1)
}
