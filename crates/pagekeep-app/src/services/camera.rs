// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture source for this build.
//
// On desktop, "taking a photo" means picking an image file. The pick is copied
// into the transient directory so the rest of the flow owns its input and can
// clean it up. On mobile, the platform bridge provides the camera.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pagekeep_bridge::NativeCamera;
use pagekeep_core::error::Result;
use tracing::info;
use uuid::Uuid;

/// Camera the service layer should use on this platform.
pub fn default_camera(transient_dir: &Path) -> Arc<dyn NativeCamera> {
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        Arc::new(FilePickerCamera::new(transient_dir))
    }
    #[cfg(any(target_os = "ios", target_os = "android"))]
    {
        let _ = transient_dir;
        pagekeep_bridge::platform_bridge()
    }
}

/// Desktop stand-in for a camera: a native file dialog.
#[cfg_attr(any(target_os = "ios", target_os = "android"), allow(dead_code))]
pub struct FilePickerCamera {
    transient_dir: PathBuf,
}

#[cfg_attr(any(target_os = "ios", target_os = "android"), allow(dead_code))]
impl FilePickerCamera {
    pub fn new(transient_dir: impl Into<PathBuf>) -> Self {
        Self {
            transient_dir: transient_dir.into(),
        }
    }
}

#[cfg(not(any(target_os = "ios", target_os = "android")))]
impl NativeCamera for FilePickerCamera {
    fn capture_image(&self) -> Result<Option<PathBuf>> {
        let Some(picked) = rfd::FileDialog::new()
            .add_filter("Images", &["jpg", "jpeg", "png", "tiff", "tif", "bmp", "webp"])
            .pick_file()
        else {
            info!("capture cancelled");
            return Ok(None);
        };
        copy_into_transient(&picked, &self.transient_dir).map(Some)
    }
}

/// Copy `picked` into `transient_dir` under a fresh name, keeping its extension.
pub fn copy_into_transient(picked: &Path, transient_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(transient_dir)?;
    let extension = picked
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("jpg")
        .to_ascii_lowercase();
    let dest = transient_dir.join(format!("capture-{}.{extension}", Uuid::new_v4()));
    let bytes = std::fs::copy(picked, &dest)?;
    info!(from = %picked.display(), to = %dest.display(), bytes, "image captured");
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_is_copied_into_transient_dir() {
        let dir = tempfile::tempdir().unwrap();
        let picked = dir.path().join("IMG_0042.JPG");
        std::fs::write(&picked, b"jpeg").unwrap();
        let transient = dir.path().join("transient");

        let raw = copy_into_transient(&picked, &transient).unwrap();
        assert!(raw.starts_with(&transient));
        assert_eq!(raw.extension().unwrap(), "jpg");
        assert_eq!(std::fs::read(&raw).unwrap(), b"jpeg");
        assert!(picked.exists());
    }

    #[test]
    fn missing_pick_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(copy_into_transient(&dir.path().join("gone.png"), dir.path()).is_err());
    }
}
