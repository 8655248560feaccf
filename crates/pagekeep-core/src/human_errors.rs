// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Severity drives how (and whether) the UI shows the message.

use crate::error::PagekeepError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Something went wrong but trying again may work.
    Transient,
    /// The user must change something (e.g. type a name) before continuing.
    ActionRequired,
    /// Cannot be fixed by retrying on this device.
    Permanent,
    /// Nothing for the user to see; log it and move on.
    Silent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether the operation is worth retrying as-is.
    pub retriable: bool,
    /// Severity level (drives presentation).
    pub severity: Severity,
}

impl HumanError {
    /// Whether the UI should display this error at all.
    pub fn is_visible(&self) -> bool {
        self.severity != Severity::Silent
    }
}

/// Convert a `PagekeepError` into a `HumanError` suitable for display.
pub fn humanize_error(err: &PagekeepError) -> HumanError {
    match err {
        // -- Scan pipeline --
        PagekeepError::DetectionFailed(_) => HumanError {
            message: "We couldn't find the page edges.".into(),
            suggestion: "The whole photo will be kept instead. Retake it with the page filling the frame if you want a tighter crop.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PagekeepError::InvalidScale { .. } | PagekeepError::ProcessingFailed(_) => HumanError {
            message: "We couldn't straighten this photo.".into(),
            suggestion: "The original photo will be used. You can retake it at any time.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PagekeepError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The photo may be damaged or in an unusual format. Please retake it.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        // -- Document store --
        PagekeepError::InvalidTitle(_) => HumanError {
            message: "Please give your scan a name.".into(),
            suggestion: "Type at least one letter or number, then tap Save.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PagekeepError::CommitFailed(_) => HumanError {
            message: "We couldn't save this scan.".into(),
            suggestion: "The photo may have been discarded by a retake. Take the photo again, then save.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        // A missing file on delete means the document is already gone.
        PagekeepError::DeleteFailed(_) => HumanError {
            message: "This document was already removed.".into(),
            suggestion: String::new(),
            retriable: false,
            severity: Severity::Silent,
        },

        PagekeepError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Refresh the list and try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to use that file.".into(),
                    suggestion: "Check the storage permissions for this app.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        PagekeepError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Platform --
        PagekeepError::CaptureUnavailable(_) => HumanError {
            message: "The camera isn't available.".into(),
            suggestion: "Check that the app is allowed to use the camera, or choose an existing photo instead.".into(),
            retriable: true,
            severity: Severity::ActionRequired,
        },

        PagekeepError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app. Some features may not be available on all devices.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
