// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coordinate mapping — move a quadrilateral found on the working copy into
// the original frame's pixel space.

use pagekeep_core::error::{PagekeepError, Result};
use pagekeep_core::{Dimensions, Point, Quadrilateral, ScaleFactors};
use tracing::{debug, warn};

/// Scale every corner of `quad` by `scale` and clamp it into
/// `[0, bounds.width] x [0, bounds.height]`.
///
/// Clamping is per coordinate and deterministic. A corner pushed past the
/// frame by rounding in the working copy lands exactly on the edge. If
/// clamping flattens the quadrilateral (the scale did not belong to this
/// frame pair), the mapping fails with [`PagekeepError::InvalidScale`].
pub fn map_to_original(
    quad: &Quadrilateral,
    scale: ScaleFactors,
    bounds: Dimensions,
) -> Result<Quadrilateral> {
    let (sx, sy) = (scale.scale_x(), scale.scale_y());
    let (max_x, max_y) = (bounds.width as f64, bounds.height as f64);

    let mapped = quad.corners().map(|p| {
        Point::new(
            (p.x * sx).clamp(0.0, max_x),
            (p.y * sy).clamp(0.0, max_y),
        )
    });

    match Quadrilateral::new(mapped) {
        Some(q) => {
            debug!(scale_x = sx, scale_y = sy, corners = ?q.corners(), "Quadrilateral mapped to original");
            Ok(q)
        }
        None => {
            warn!(scale_x = sx, scale_y = sy, ?bounds, "Mapped quadrilateral collapsed after clamping");
            Err(PagekeepError::InvalidScale {
                scale_x: sx,
                scale_y: sy,
            })
        }
    }
}
