// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Geometry value types — points, quadrilaterals, scale factors, and crop
// rectangles. Every quadrilateral is tied to the coordinate space of the image
// it was computed on; moving it to another image goes through `ScaleFactors`.

use serde::{Deserialize, Serialize};

use crate::error::{PagekeepError, Result};

/// Twice-area below which a polygon is treated as degenerate.
const AREA_EPSILON: f64 = 1e-9;

/// A point in some image's pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Four document corners ordered top-left, top-right, bottom-right,
/// bottom-left.
///
/// Construction rejects anything that is not a simple polygon with strictly
/// positive area in that winding (clockwise on screen, where y grows
/// downward), so holders of a `Quadrilateral` never see a degenerate shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quadrilateral {
    corners: [Point; 4],
}

impl Quadrilateral {
    /// Validate and wrap four corners. Returns `None` for non-finite,
    /// self-intersecting, zero-area, or counter-wound input.
    pub fn new(corners: [Point; 4]) -> Option<Self> {
        if !corners.iter().all(Point::is_finite) {
            return None;
        }
        if signed_double_area(&corners) <= AREA_EPSILON {
            return None;
        }
        // Only the two pairs of opposite edges can cross in a quadrilateral.
        let edge = |i: usize| (corners[i], corners[(i + 1) % 4]);
        let (a0, a1) = edge(0);
        let (c0, c1) = edge(2);
        let (b0, b1) = edge(1);
        let (d0, d1) = edge(3);
        if segments_intersect(a0, a1, c0, c1) || segments_intersect(b0, b1, d0, d1) {
            return None;
        }
        Some(Self { corners })
    }

    /// Build an axis-aligned rectangle quadrilateral.
    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Option<Self> {
        Self::new([
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn top_left(&self) -> Point {
        self.corners[0]
    }

    pub fn top_right(&self) -> Point {
        self.corners[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.corners[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.corners[3]
    }

    /// Enclosed area (shoelace formula).
    pub fn area(&self) -> f64 {
        signed_double_area(&self.corners) / 2.0
    }

    /// Smallest axis-aligned box containing all four corners.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        };
        for p in &self.corners {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        bbox
    }
}

/// Real-valued axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Ratio between an original frame and its downsampled working copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleFactors {
    scale_x: f64,
    scale_y: f64,
}

impl ScaleFactors {
    /// Both factors must be finite and strictly positive.
    pub fn new(scale_x: f64, scale_y: f64) -> Result<Self> {
        let valid = |s: f64| s.is_finite() && s > 0.0;
        if valid(scale_x) && valid(scale_y) {
            Ok(Self { scale_x, scale_y })
        } else {
            Err(PagekeepError::InvalidScale { scale_x, scale_y })
        }
    }

    /// Identity scale.
    pub fn unit() -> Self {
        Self {
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Factors that map `working` coordinates onto `original` coordinates.
    pub fn between(original: Dimensions, working: Dimensions) -> Result<Self> {
        Self::new(
            original.width as f64 / working.width as f64,
            original.height as f64 / working.height as f64,
        )
    }

    pub fn scale_x(&self) -> f64 {
        self.scale_x
    }

    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// Factors that undo this mapping.
    pub fn inverse(&self) -> Self {
        Self {
            scale_x: 1.0 / self.scale_x,
            scale_y: 1.0 / self.scale_y,
        }
    }
}

/// Integer pixel rectangle applied as a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// The rectangle covering a whole image.
    pub fn full(dims: Dimensions) -> Self {
        Self {
            x: 0,
            y: 0,
            width: dims.width,
            height: dims.height,
        }
    }
}

/// Twice the signed area; positive for TL, TR, BR, BL order in y-down space.
fn signed_double_area(corners: &[Point; 4]) -> f64 {
    let mut acc = 0.0;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        acc += a.x * b.y - b.x * a.y;
    }
    acc
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed-segment intersection test, touching endpoints included.
fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}
