// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the camera, scan pipeline, commit stage, and
// document store, and provides async-friendly methods for the Dioxus UI.
//
// Scan processing runs on the blocking pool. Store changes are announced on a
// watch channel so the documents page reloads on events instead of polling.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use pagekeep_bridge::NativeCamera;
use pagekeep_core::error::{PagekeepError, Result};
use pagekeep_core::{AppConfig, RecordView, StoredDocumentRecord};
use pagekeep_document::{ProcessedScan, ScanPipeline};
use pagekeep_store::{CommitStage, ConfirmedDelete, DocumentStore, PendingDelete};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use super::camera;
use super::data_dir;
use super::session::{self, CaptureSession};

/// Everything derived from the config. Rebuilt when settings are saved.
#[derive(Clone)]
struct Backends {
    pipeline: Arc<ScanPipeline>,
    commit: CommitStage,
    store: DocumentStore,
}

impl Backends {
    fn build(config: &AppConfig, data_dir: &Path, transient_dir: &Path) -> Result<Self> {
        Ok(Self {
            pipeline: Arc::new(ScanPipeline::from_config(config, transient_dir)?),
            commit: CommitStage::from_config(config, data_dir),
            store: DocumentStore::from_config(config, data_dir),
        })
    }
}

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// All fields are cheaply cloneable (Arc-wrapped) so that the struct can be
/// passed into closures and async blocks without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    data_dir: PathBuf,
    transient_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
    camera: Arc<dyn NativeCamera>,
    backends: Arc<RwLock<Backends>>,
    session: Arc<Mutex<CaptureSession>>,
    refresh: Arc<watch::Sender<u64>>,
}

impl AppServices {
    /// Initialise all services.  Call once at app startup.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let config = load_config(&dir).unwrap_or_default();
        let transient_dir = dir.join(TRANSIENT_DIR);
        let camera = camera::default_camera(&transient_dir);
        Self::new(dir, config, camera)
    }

    /// Services rooted at `data_dir`, capturing through `camera`.
    pub fn new(data_dir: PathBuf, config: AppConfig, camera: Arc<dyn NativeCamera>) -> Result<Self> {
        let transient_dir = data_dir.join(TRANSIENT_DIR);
        std::fs::create_dir_all(&transient_dir)?;
        session::sweep_transient(&transient_dir);

        let backends = match Backends::build(&config, &data_dir, &transient_dir) {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "stored config rejected, using defaults");
                Backends::build(&AppConfig::default(), &data_dir, &transient_dir)?
            }
        };
        let (refresh, _) = watch::channel(0u64);

        info!("app services initialised");
        Ok(Self {
            data_dir,
            transient_dir,
            config: Arc::new(Mutex::new(config)),
            camera,
            backends: Arc::new(RwLock::new(backends)),
            session: Arc::new(Mutex::new(CaptureSession::default())),
            refresh: Arc::new(refresh),
        })
    }

    fn backends(&self) -> Backends {
        self.backends
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn session(&self) -> std::sync::MutexGuard<'_, CaptureSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify_store_changed(&self) {
        self.refresh.send_modify(|generation| *generation += 1);
    }

    // -- Capture -------------------------------------------------------------

    /// Ask the camera for a photo. `Ok(None)` means the user cancelled.
    pub fn capture(&self) -> Result<Option<PathBuf>> {
        self.camera.capture_image()
    }

    /// Run `raw` through the scan pipeline on the blocking pool.
    ///
    /// Returns `Ok(None)` if another capture or a retake superseded this one
    /// while it was processing; its output has already been discarded. The
    /// result is handed to the session on the blocking pool, so dropping the
    /// returned future never leaks transient files.
    #[instrument(skip(self), fields(raw = %raw.display()))]
    pub async fn process_capture(&self, raw: PathBuf) -> Result<Option<(u64, ProcessedScan)>> {
        let (ticket, replaced) = self.session().begin();
        if let Some(old) = replaced {
            session::discard(&old, &self.transient_dir);
        }

        let pipeline = Arc::clone(&self.backends().pipeline);
        let capture_session = Arc::clone(&self.session);
        let transient_dir = self.transient_dir.clone();
        let delivered = tokio::task::spawn_blocking(move || -> Result<Option<ProcessedScan>> {
            let scan = pipeline.process(&raw)?;
            let completed = capture_session
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .complete(ticket, scan.clone());
            match completed {
                Ok(()) => Ok(Some(scan)),
                Err(stale) => {
                    session::discard(&stale, &transient_dir);
                    Ok(None)
                }
            }
        })
        .await
        .map_err(|e| PagekeepError::ProcessingFailed(format!("scan task failed: {e}")))??;

        Ok(delivered.map(|scan| {
            info!(ticket, fallback = scan.is_fallback(), "capture ready for confirmation");
            (ticket, scan)
        }))
    }

    /// The processed capture waiting under `ticket`, if it is still current.
    pub fn pending_scan(&self, ticket: u64) -> Option<ProcessedScan> {
        self.session().ready(ticket).cloned()
    }

    /// Throw away the current capture so the user can take another.
    pub fn retake(&self) {
        if let Some(scan) = self.session().retake() {
            session::discard(&scan, &self.transient_dir);
        }
        info!("capture discarded for retake");
    }

    // -- Commit --------------------------------------------------------------

    /// Store the capture under `ticket` as a document titled `title`.
    ///
    /// On failure the capture stays pending so the user can fix the title
    /// and try again.
    #[instrument(skip(self))]
    pub fn commit_scan(&self, ticket: u64, title: &str) -> Result<StoredDocumentRecord> {
        let scan = self.pending_scan(ticket).ok_or_else(|| {
            PagekeepError::CommitFailed("this capture is no longer available".into())
        })?;

        let record = self.backends().commit.commit(&scan.location, title)?;

        self.session().finish(ticket);
        if scan.raw_location != scan.location {
            session::remove_transient(&scan.raw_location, &self.transient_dir);
        }
        self.notify_store_changed();
        Ok(record)
    }

    // -- Document store ------------------------------------------------------

    /// Documents matching `query` (all of them for a blank query), newest first.
    pub fn documents(&self, query: &str) -> Result<Vec<RecordView>> {
        let records = self.backends().store.search(query)?;
        Ok(records.iter().map(StoredDocumentRecord::to_view).collect())
    }

    pub fn document(&self, id: &str) -> Result<Option<RecordView>> {
        Ok(self.backends().store.get(id)?.map(|r| r.to_view()))
    }

    /// First step of deleting `id`; see [`AppServices::delete`].
    pub fn request_delete(&self, id: &str) -> Result<PendingDelete> {
        self.backends().store.prepare_delete(id)
    }

    /// Delete a confirmed document. The store changed (or was already
    /// missing the document) either way, so listeners are notified.
    pub fn delete(&self, confirmed: ConfirmedDelete) -> Result<()> {
        let result = self.backends().store.delete(confirmed);
        self.notify_store_changed();
        result
    }

    /// Receiver that ticks after every commit and delete.
    pub fn subscribe_refresh(&self) -> watch::Receiver<u64> {
        self.refresh.subscribe()
    }

    // -- Config Persistence --------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Validate, apply, and persist the config.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        let backends = Backends::build(config, &self.data_dir, &self.transient_dir)?;
        persist_config(&self.data_dir, config)?;

        *self.backends.write().unwrap_or_else(PoisonError::into_inner) = backends;
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        self.notify_store_changed();
        info!("config saved");
        Ok(())
    }

    /// Where committed documents live.
    pub fn store_dir(&self) -> PathBuf {
        self.backends().store.dir().to_path_buf()
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";
const TRANSIENT_DIR: &str = "transient";

fn load_config(data_dir: &Path) -> Option<AppConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let data = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            None
        }
    }
}

fn persist_config(data_dir: &Path, config: &AppConfig) -> Result<()> {
    let path = data_dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use image::{Rgb, RgbImage};
    use pagekeep_core::human_errors::{Severity, humanize_error};

    /// Camera that "captures" a prepared image by copying it.
    struct FixtureCamera {
        source: PathBuf,
        transient_dir: PathBuf,
    }

    impl NativeCamera for FixtureCamera {
        fn capture_image(&self) -> Result<Option<PathBuf>> {
            camera::copy_into_transient(&self.source, &self.transient_dir).map(Some)
        }
    }

    fn services(dir: &Path) -> AppServices {
        let source = dir.join("page.png");
        RgbImage::from_pixel(400, 300, Rgb([250, 250, 250]))
            .save(&source)
            .unwrap();
        let data_dir = dir.join("data");
        let camera = Arc::new(FixtureCamera {
            source,
            transient_dir: data_dir.join(TRANSIENT_DIR),
        });
        AppServices::new(data_dir, AppConfig::default(), camera).unwrap()
    }

    async fn capture_and_process(svc: &AppServices) -> (u64, ProcessedScan) {
        let raw = svc.capture().unwrap().unwrap();
        svc.process_capture(raw).await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn capture_name_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let svc = services(dir.path());
        let mut refresh = svc.subscribe_refresh();

        let (ticket, scan) = capture_and_process(&svc).await;
        assert!(!scan.is_fallback());

        let record = svc.commit_scan(ticket, "Invoice").unwrap();
        assert!(refresh.has_changed().unwrap());

        let docs = svc.documents("").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, record.id);
        assert_eq!(docs[0].title, "Invoice");
        assert!(svc.pending_scan(ticket).is_none());
        // Raw capture and normalized output are both gone from the transient dir.
        assert_eq!(
            std::fs::read_dir(dir.path().join("data").join(TRANSIENT_DIR))
                .unwrap()
                .count(),
            0
        );
    }

    #[tokio::test]
    async fn abandoned_processing_is_cleaned_up_by_next_capture() {
        let dir = tempfile::tempdir().unwrap();
        let svc = services(dir.path());

        // The page navigates away: the future is dropped mid-flight.
        let raw = svc.capture().unwrap().unwrap();
        let _ = tokio::time::timeout(Duration::ZERO, svc.process_capture(raw)).await;

        let mut orphan = None;
        for _ in 0..500 {
            orphan = svc.pending_scan(1);
            if orphan.is_some() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let orphan = orphan.expect("blocking job delivers its result");
        assert!(orphan.location.exists());

        let (ticket, scan) = capture_and_process(&svc).await;
        assert_eq!(ticket, 2);
        assert!(!orphan.location.exists());
        assert!(!orphan.raw_location.exists());

        let left: Vec<PathBuf> = std::fs::read_dir(dir.path().join("data").join(TRANSIENT_DIR))
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(left.len(), 2);
        assert!(left.contains(&scan.location));
        assert!(left.contains(&scan.raw_location));
    }

    #[test]
    fn leftover_transient_files_are_swept_at_startup() {
        let dir = tempfile::tempdir().unwrap();
        let transient = dir.path().join("data").join(TRANSIENT_DIR);
        std::fs::create_dir_all(&transient).unwrap();
        let stray = transient.join("capture-old.jpg");
        std::fs::write(&stray, b"left behind").unwrap();

        let _svc = services(dir.path());
        assert!(!stray.exists());
    }

    #[tokio::test]
    async fn blank_title_keeps_capture_pending() {
        let dir = tempfile::tempdir().unwrap();
        let svc = services(dir.path());
        let (ticket, _) = capture_and_process(&svc).await;

        let err = svc.commit_scan(ticket, "  ").unwrap_err();
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
        assert!(svc.pending_scan(ticket).is_some());
        assert!(svc.commit_scan(ticket, "Receipt").is_ok());
    }

    #[tokio::test]
    async fn retake_discards_pending_capture() {
        let dir = tempfile::tempdir().unwrap();
        let svc = services(dir.path());
        let (ticket, scan) = capture_and_process(&svc).await;

        svc.retake();
        assert!(svc.pending_scan(ticket).is_none());
        assert!(!scan.location.exists());
        assert!(svc.commit_scan(ticket, "Invoice").is_err());
    }

    #[tokio::test]
    async fn delete_notifies_and_tolerates_repeat() {
        let dir = tempfile::tempdir().unwrap();
        let svc = services(dir.path());
        let (ticket, _) = capture_and_process(&svc).await;
        let record = svc.commit_scan(ticket, "Lease").unwrap();
        let mut refresh = svc.subscribe_refresh();

        let first = svc.request_delete(&record.id).unwrap();
        let second = first.clone();
        svc.delete(first.confirm()).unwrap();
        assert!(refresh.has_changed().unwrap());
        assert!(svc.documents("").unwrap().is_empty());

        let err = svc.delete(second.confirm()).unwrap_err();
        assert!(!humanize_error(&err).is_visible());
    }

    #[test]
    fn invalid_config_is_rejected_before_saving() {
        let dir = tempfile::tempdir().unwrap();
        let svc = services(dir.path());
        let bad = AppConfig {
            detection_margin: 0.9,
            ..AppConfig::default()
        };
        assert!(svc.save_config(&bad).is_err());
        assert!(!dir.path().join("data").join(CONFIG_FILE).exists());
        assert_eq!(svc.config().detection_margin, 0.1);

        let huge_padding = AppConfig {
            crop_padding: 50_000,
            ..AppConfig::default()
        };
        assert!(svc.save_config(&huge_padding).is_err());
        assert_eq!(svc.config().crop_padding, 10);
    }

    #[test]
    fn saved_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let svc = services(dir.path());
        let config = AppConfig {
            store_dir_name: "archive".into(),
            crop_padding: 4,
            ..AppConfig::default()
        };
        svc.save_config(&config).unwrap();

        let loaded = load_config(&dir.path().join("data")).unwrap();
        assert_eq!(loaded.store_dir_name, "archive");
        assert_eq!(loaded.crop_padding, 4);
        assert!(svc.store_dir().ends_with("archive"));
    }
}
