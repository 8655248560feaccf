// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pagekeep-store — The local document store.
//
// One flat directory of image files named `{title}_{unixMillis}.{ext}`. The
// filename carries everything a record needs, so there is no index to keep in
// sync: every listing is a fresh directory scan.

pub mod commit;
pub mod naming;
pub mod store;

pub use commit::CommitStage;
pub use store::{ConfirmedDelete, DocumentStore, PendingDelete};
