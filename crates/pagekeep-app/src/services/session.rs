// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture session — which processing request the UI is waiting for.
//
// Every capture gets a ticket. Starting a new capture or retaking supersedes
// the current ticket, and a result arriving for a superseded ticket is
// dropped. The last request wins.

use std::path::Path;

use pagekeep_document::ProcessedScan;
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct CaptureSession {
    last_issued: u64,
    current: Option<u64>,
    ready: Option<(u64, ProcessedScan)>,
}

impl CaptureSession {
    /// Start a new processing request. Returns its ticket and any result the
    /// new request replaces.
    pub fn begin(&mut self) -> (u64, Option<ProcessedScan>) {
        self.last_issued += 1;
        self.current = Some(self.last_issued);
        let replaced = self.ready.take().map(|(_, scan)| scan);
        (self.last_issued, replaced)
    }

    /// Deliver the result for `ticket`.
    ///
    /// A superseded ticket gets its result handed back for disposal.
    pub fn complete(&mut self, ticket: u64, scan: ProcessedScan) -> Result<(), ProcessedScan> {
        if self.current != Some(ticket) {
            debug!(ticket, current = ?self.current, "Dropping result for superseded capture");
            return Err(scan);
        }
        self.ready = Some((ticket, scan));
        Ok(())
    }

    /// The finished result for `ticket`, if it is still current.
    pub fn ready(&self, ticket: u64) -> Option<&ProcessedScan> {
        match &self.ready {
            Some((t, scan)) if *t == ticket => Some(scan),
            _ => None,
        }
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current == Some(ticket)
    }

    /// Abandon whatever is in flight or waiting for confirmation.
    pub fn retake(&mut self) -> Option<ProcessedScan> {
        self.current = None;
        self.ready.take().map(|(_, scan)| scan)
    }

    /// The result for `ticket` was committed; forget it.
    pub fn finish(&mut self, ticket: u64) -> Option<ProcessedScan> {
        if !self.is_current(ticket) {
            return None;
        }
        self.current = None;
        self.ready.take().map(|(_, scan)| scan)
    }
}

/// Remove the transient files behind `scan`. Files outside `transient_dir`
/// are never touched.
pub fn discard(scan: &ProcessedScan, transient_dir: &Path) {
    let mut paths = vec![scan.location.as_path()];
    if scan.raw_location != scan.location {
        paths.push(scan.raw_location.as_path());
    }
    for path in paths {
        remove_transient(path, transient_dir);
    }
}

/// Remove every file left in `transient_dir`. Only safe before any capture
/// of this run has started.
pub fn sweep_transient(transient_dir: &Path) {
    let entries = match std::fs::read_dir(transient_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %transient_dir.display(), error = %e, "Could not sweep transient directory");
            return;
        }
    };
    for entry in entries.flatten() {
        if entry.file_type().is_ok_and(|t| t.is_file()) {
            remove_transient(&entry.path(), transient_dir);
        }
    }
}

/// Remove `path` if it lives in `transient_dir`.
pub fn remove_transient(path: &Path, transient_dir: &Path) {
    if !path.starts_with(transient_dir) {
        return;
    }
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Transient file removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Could not remove transient file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scan(name: &str) -> ProcessedScan {
        ProcessedScan {
            raw_location: PathBuf::from(format!("/tmp/raw-{name}.jpg")),
            location: PathBuf::from(format!("/tmp/{name}.jpg")),
            dimensions: None,
            crop: None,
            fallback: None,
        }
    }

    #[test]
    fn tickets_increase() {
        let mut session = CaptureSession::default();
        let (a, _) = session.begin();
        let (b, _) = session.begin();
        assert!(b > a);
        assert!(session.is_current(b));
        assert!(!session.is_current(a));
    }

    #[test]
    fn last_request_wins() {
        let mut session = CaptureSession::default();
        let (first, _) = session.begin();
        let (second, _) = session.begin();

        assert!(session.complete(second, scan("second")).is_ok());
        let stale = session.complete(first, scan("first")).unwrap_err();
        assert_eq!(stale.location, PathBuf::from("/tmp/first.jpg"));
        assert_eq!(
            session.ready(second).map(|s| s.location.clone()),
            Some(PathBuf::from("/tmp/second.jpg"))
        );
        assert!(session.ready(first).is_none());
    }

    #[test]
    fn retake_supersedes_in_flight_request() {
        let mut session = CaptureSession::default();
        let (ticket, _) = session.begin();
        assert!(session.retake().is_none());
        assert!(session.complete(ticket, scan("late")).is_err());
        assert!(session.ready(ticket).is_none());
    }

    #[test]
    fn new_capture_hands_back_unconfirmed_result() {
        let mut session = CaptureSession::default();
        let (ticket, _) = session.begin();
        session.complete(ticket, scan("unconfirmed")).unwrap();

        let (_, replaced) = session.begin();
        assert_eq!(
            replaced.map(|s| s.location),
            Some(PathBuf::from("/tmp/unconfirmed.jpg"))
        );
    }

    #[test]
    fn finish_clears_only_current_ticket() {
        let mut session = CaptureSession::default();
        let (ticket, _) = session.begin();
        session.complete(ticket, scan("done")).unwrap();

        assert!(session.finish(ticket + 1).is_none());
        assert!(session.finish(ticket).is_some());
        assert!(session.ready(ticket).is_none());
    }

    #[test]
    fn discard_only_touches_transient_files() {
        let dir = tempfile::tempdir().unwrap();
        let transient = dir.path().join("transient");
        std::fs::create_dir_all(&transient).unwrap();
        let raw = dir.path().join("kept.jpg");
        let normalized = transient.join("normalized.jpg");
        std::fs::write(&raw, b"raw").unwrap();
        std::fs::write(&normalized, b"normalized").unwrap();

        let scan = ProcessedScan {
            raw_location: raw.clone(),
            location: normalized.clone(),
            dimensions: None,
            crop: None,
            fallback: None,
        };
        discard(&scan, &transient);
        assert!(raw.exists());
        assert!(!normalized.exists());

        // Already gone is fine.
        discard(&scan, &transient);
    }
}
