// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagekeep — Core geometry, record types, and error definitions shared across
// all crates.

pub mod config;
pub mod error;
pub mod geometry;
pub mod human_errors;
pub mod types;

pub use config::{AppConfig, NormalizerKind};
pub use error::PagekeepError;
pub use geometry::*;
pub use types::*;
