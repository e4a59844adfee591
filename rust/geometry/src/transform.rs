// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D affine transforms and the transform-list syntax
//!
//! A matrix `(a, b, c, d, e, f)` maps `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
//! Composition follows the drawing convention: `parent.compose(&child)` applies
//! `child` first, then `parent`.

use nalgebra::Matrix3;
use nom::{
    bytes::complete::take_while,
    character::complete::{alpha1, char, multispace0},
    combinator::all_consuming,
    multi::many0,
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use serde::{Deserialize, Serialize};

use crate::parser::number;
use crate::types::Point;

/// Six-coefficient 2D affine matrix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMatrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translate(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation about the origin, angle in degrees
    pub fn rotate(degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Rotation about `(cx, cy)`: translate there, rotate, translate back
    pub fn rotate_about(degrees: f64, cx: f64, cy: f64) -> Self {
        Self::translate(cx, cy)
            .compose(&Self::rotate(degrees))
            .compose(&Self::translate(-cx, -cy))
    }

    pub fn skew_x(degrees: f64) -> Self {
        Self::new(1.0, 0.0, degrees.to_radians().tan(), 1.0, 0.0, 0.0)
    }

    pub fn skew_y(degrees: f64) -> Self {
        Self::new(1.0, degrees.to_radians().tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// Homogeneous 3x3 form
    pub fn to_matrix3(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.a, self.c, self.e, //
            self.b, self.d, self.f, //
            0.0, 0.0, 1.0,
        )
    }

    /// Affine part of a homogeneous 3x3 matrix (the bottom row is ignored)
    pub fn from_matrix3(m: &Matrix3<f64>) -> Self {
        Self::new(
            m[(0, 0)],
            m[(1, 0)],
            m[(0, 1)],
            m[(1, 1)],
            m[(0, 2)],
            m[(1, 2)],
        )
    }

    /// Matrix product `self · next`: points go through `next`, then `self`
    pub fn compose(&self, next: &AffineMatrix) -> AffineMatrix {
        Self::from_matrix3(&(self.to_matrix3() * next.to_matrix3()))
    }

    pub fn apply(&self, point: Point) -> Point {
        Point::from_nalgebra(&self.to_matrix3().transform_point(&point.to_nalgebra()))
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Compose an accumulated matrix with the next one
pub fn compose(accumulated: &AffineMatrix, next: &AffineMatrix) -> AffineMatrix {
    accumulated.compose(next)
}

/// Map a point through a matrix
pub fn apply_transform(point: Point, matrix: &AffineMatrix) -> Point {
    matrix.apply(point)
}

/// Whitespace and commas between calls and arguments
fn separator(input: &str) -> IResult<&str, &str> {
    take_while(|c: char| c.is_whitespace() || c == ',')(input)
}

/// Parse one call: `name ( n, n n ... )`
fn function_call(input: &str) -> IResult<&str, (&str, Vec<f64>)> {
    pair(
        preceded(separator, alpha1),
        preceded(
            multispace0,
            delimited(
                char('('),
                many0(preceded(separator, number)),
                preceded(separator, char(')')),
            ),
        ),
    )(input)
}

fn transform_list(input: &str) -> IResult<&str, Vec<(&str, Vec<f64>)>> {
    all_consuming(terminated(many0(function_call), separator))(input)
}

/// Matrix for a single call; unknown names and arities contribute identity
fn function_matrix(name: &str, args: &[f64]) -> AffineMatrix {
    match (name, args) {
        ("matrix", &[a, b, c, d, e, f]) => AffineMatrix::new(a, b, c, d, e, f),
        ("translate", &[tx]) => AffineMatrix::translate(tx, 0.0),
        ("translate", &[tx, ty, ..]) => AffineMatrix::translate(tx, ty),
        ("scale", &[s]) => AffineMatrix::scale(s, s),
        ("scale", &[sx, sy, ..]) => AffineMatrix::scale(sx, sy),
        ("rotate", &[angle]) => AffineMatrix::rotate(angle),
        ("rotate", &[angle, cx, cy]) => AffineMatrix::rotate_about(angle, cx, cy),
        ("skewX", &[angle]) => AffineMatrix::skew_x(angle),
        ("skewY", &[angle]) => AffineMatrix::skew_y(angle),
        _ => {
            tracing::debug!(
                function = name,
                arg_count = args.len(),
                "ignoring unsupported transform function"
            );
            AffineMatrix::IDENTITY
        }
    }
}

/// Parse a transform list such as `translate(10 20) rotate(45)`.
///
/// Calls compose left to right. Absent, empty or malformed text yields the
/// identity matrix instead of an error.
pub fn parse_transform(text: &str) -> AffineMatrix {
    match transform_list(text) {
        Ok((_, calls)) => calls
            .iter()
            .fold(AffineMatrix::IDENTITY, |acc, (name, args)| {
                acc.compose(&function_matrix(name, args))
            }),
        Err(_) => {
            tracing::debug!(transform = text, "unparseable transform treated as identity");
            AffineMatrix::IDENTITY
        }
    }
}
