// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Primitive shape lowering
//!
//! Each lowerer maps its defining points through the active matrix first and
//! then joins them, so results are in the same space as flattened paths.

use std::f64::consts::TAU;

use crate::transform::AffineMatrix;
use crate::types::{Point, Segment};

/// Number of sides used to approximate circles and ellipses
pub const CIRCLE_SEGMENTS: usize = 16;

/// Join transformed points into segments, optionally closing the loop
fn chain(points: &[Point], matrix: &AffineMatrix, closed: bool) -> Vec<Segment> {
    let mapped: Vec<Point> = points.iter().map(|p| matrix.apply(*p)).collect();
    let mut segments: Vec<Segment> = mapped
        .windows(2)
        .map(|w| Segment::new(w[0], w[1]))
        .collect();

    if closed {
        if let (Some(&first), Some(&last)) = (mapped.first(), mapped.last()) {
            segments.push(Segment::new(last, first));
        }
    }
    segments
}

/// Pair a flat coordinate list into points; an odd trailing value is dropped
fn pair_coordinates(coords: &[f64]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

pub fn line(x1: f64, y1: f64, x2: f64, y2: f64, matrix: &AffineMatrix) -> Vec<Segment> {
    vec![Segment::new(
        matrix.apply(Point::new(x1, y1)),
        matrix.apply(Point::new(x2, y2)),
    )]
}

/// Four sides in order top, right, bottom, left. Empty unless both sides are positive.
pub fn rect(x: f64, y: f64, width: f64, height: f64, matrix: &AffineMatrix) -> Vec<Segment> {
    if width <= 0.0 || height <= 0.0 {
        return Vec::new();
    }
    let corners = [
        Point::new(x, y),
        Point::new(x + width, y),
        Point::new(x + width, y + height),
        Point::new(x, y + height),
    ];
    chain(&corners, matrix, true)
}

/// Closed loop through `(x, y)` pairs; needs at least three points
pub fn polygon(coords: &[f64], matrix: &AffineMatrix) -> Vec<Segment> {
    let points = pair_coordinates(coords);
    if points.len() < 3 {
        return Vec::new();
    }
    chain(&points, matrix, true)
}

/// Open chain through `(x, y)` pairs; needs at least two points
pub fn polyline(coords: &[f64], matrix: &AffineMatrix) -> Vec<Segment> {
    let points = pair_coordinates(coords);
    if points.len() < 2 {
        return Vec::new();
    }
    chain(&points, matrix, false)
}

pub fn circle(cx: f64, cy: f64, r: f64, matrix: &AffineMatrix) -> Vec<Segment> {
    if r <= 0.0 {
        return Vec::new();
    }
    ellipse(cx, cy, r, r, matrix)
}

/// Regular 16-gon inscribed in the ellipse, starting at angle zero
pub fn ellipse(cx: f64, cy: f64, rx: f64, ry: f64, matrix: &AffineMatrix) -> Vec<Segment> {
    if rx <= 0.0 || ry <= 0.0 {
        return Vec::new();
    }
    let points: Vec<Point> = (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f64 / CIRCLE_SEGMENTS as f64;
            Point::new(cx + rx * angle.cos(), cy + ry * angle.sin())
        })
        .collect();
    chain(&points, matrix, true)
}
