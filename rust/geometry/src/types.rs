// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core geometry value types: points, segments and reconstructed polygons

use nalgebra::Point2;
use serde::{Deserialize, Serialize, Serializer};

use crate::transform::AffineMatrix;

/// A 2D point in drawing user space
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn from_nalgebra(p: &Point2<f64>) -> Self {
        Self { x: p.x, y: p.y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Map this point through an affine matrix
    pub fn transformed(&self, matrix: &AffineMatrix) -> Self {
        matrix.apply(*self)
    }
}

/// Straight line segment between two points.
///
/// Serialized as a two-element array `[start, end]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "[Point; 2]", into = "[Point; 2]")]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    pub fn transformed(&self, matrix: &AffineMatrix) -> Self {
        Self {
            start: self.start.transformed(matrix),
            end: self.end.transformed(matrix),
        }
    }
}

impl From<[Point; 2]> for Segment {
    fn from([start, end]: [Point; 2]) -> Self {
        Self { start, end }
    }
}

impl From<Segment> for [Point; 2] {
    fn from(segment: Segment) -> Self {
        [segment.start, segment.end]
    }
}

/// Closed polygon reconstructed from segments
///
/// Orientation is the only hole signal: negative signed area marks a hole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Polygon {
    /// Loop vertices, the closing edge from last to first is implicit
    pub points: Vec<Point>,
    /// Absolute area in square drawing units
    pub area: f64,
    /// Shoelace area, positive for boundaries and negative for holes
    pub signed_area: f64,
    #[serde(serialize_with = "round_two_places")]
    pub perimeter: f64,
    pub is_hole: bool,
    pub point_count: usize,
}

impl Polygon {
    /// Build a polygon and derive its measurements from the point loop
    pub fn from_points(points: Vec<Point>) -> Self {
        let signed = signed_area(&points);
        Self {
            area: signed.abs(),
            signed_area: signed,
            perimeter: perimeter(&points),
            is_hole: signed < 0.0,
            point_count: points.len(),
            points,
        }
    }

    /// Same loop traversed in the opposite direction
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self::from_points(points)
    }
}

/// Signed polygon area using the shoelace formula
pub fn signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }

    area / 2.0
}

/// Closed-loop perimeter, including the edge from the last point back to the first
pub fn perimeter(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].distance_to(&points[(i + 1) % n]))
        .sum()
}

fn round_two_places<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}
