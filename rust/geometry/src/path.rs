// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path data interpreter
//!
//! Turns a path description (`M0,0 L10,0 C... Z`) into straight segments in
//! the path's local coordinate system. Curves are flattened into a fixed
//! number of chords:
//!
//! - `C`/`c`: sampled at t = 0.25, 0.5, 0.75, 1
//! - `S`/`s`: as `C` with the first control point taken as the current point
//!   (the reflection of the previous control point is not tracked)
//! - `Q`/`q`: sampled at t = 1/3, 2/3, 1
//! - `A`/`a`: a single chord to the arc end point
//!
//! Malformed data ends the path early; everything emitted before the fault is
//! kept.

use crate::parser::{tokenize, Token};
use crate::types::{Point, Segment};

/// Closing tolerance per axis for `Z`
const CLOSE_EPSILON: f64 = 0.01;

const CUBIC_SAMPLES: [f64; 4] = [0.25, 0.5, 0.75, 1.0];
const QUADRATIC_SAMPLES: [f64; 3] = [1.0 / 3.0, 2.0 / 3.0, 1.0];

/// Maximum operand count of any command (arc)
const MAX_OPERANDS: usize = 7;

/// Supported path commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    MoveTo,
    LineTo,
    Horizontal,
    Vertical,
    Cubic,
    SmoothCubic,
    Quadratic,
    Arc,
    Close,
}

impl Command {
    /// Command and relative flag for a letter
    fn from_letter(letter: char) -> Option<(Command, bool)> {
        let command = match letter.to_ascii_uppercase() {
            'M' => Command::MoveTo,
            'L' => Command::LineTo,
            'H' => Command::Horizontal,
            'V' => Command::Vertical,
            'C' => Command::Cubic,
            'S' => Command::SmoothCubic,
            'Q' => Command::Quadratic,
            'A' => Command::Arc,
            'Z' => Command::Close,
            _ => return None,
        };
        Some((command, letter.is_ascii_lowercase()))
    }

    fn arity(self) -> usize {
        match self {
            Command::Close => 0,
            Command::Horizontal | Command::Vertical => 1,
            Command::MoveTo | Command::LineTo => 2,
            Command::SmoothCubic | Command::Quadratic => 4,
            Command::Cubic => 6,
            Command::Arc => 7,
        }
    }
}

/// Interpreter state carried from one command to the next
#[derive(Debug, Clone, Copy)]
struct PathState {
    current: Point,
    subpath_start: Point,
    /// False until the first command establishes a pen position
    has_current: bool,
    /// Last explicit command letter, repeated for elided commands
    command: Option<char>,
}

impl Default for PathState {
    fn default() -> Self {
        Self {
            current: Point::new(0.0, 0.0),
            subpath_start: Point::new(0.0, 0.0),
            has_current: false,
            command: None,
        }
    }
}

impl PathState {
    fn resolve(&self, relative: bool, x: f64, y: f64) -> Point {
        if relative {
            Point::new(self.current.x + x, self.current.y + y)
        } else {
            Point::new(x, y)
        }
    }

    /// Move the pen, emitting the polyline through `points` if a pen position exists
    fn draw_through(self, points: &[Point], segments: &mut Vec<Segment>) -> Self {
        let mut last = self.current;
        for &p in points {
            if self.has_current {
                segments.push(Segment::new(last, p));
            }
            last = p;
        }
        Self {
            current: last,
            has_current: true,
            ..self
        }
    }

    fn close(self, segments: &mut Vec<Segment>) -> Self {
        let start = self.subpath_start;
        if self.has_current
            && ((self.current.x - start.x).abs() > CLOSE_EPSILON
                || (self.current.y - start.y).abs() > CLOSE_EPSILON)
        {
            segments.push(Segment::new(self.current, start));
        }
        Self {
            current: start,
            has_current: true,
            command: None,
            ..self
        }
    }

    fn execute(
        self,
        command: Command,
        relative: bool,
        args: &[f64; MAX_OPERANDS],
        segments: &mut Vec<Segment>,
    ) -> Self {
        match command {
            Command::MoveTo => {
                let p = self.resolve(relative, args[0], args[1]);
                Self {
                    current: p,
                    subpath_start: p,
                    has_current: true,
                    // Coordinate pairs after a move are implicit line-tos
                    command: Some(if relative { 'l' } else { 'L' }),
                }
            }
            Command::LineTo => {
                let p = self.resolve(relative, args[0], args[1]);
                self.draw_through(&[p], segments)
            }
            Command::Horizontal => {
                let x = if relative { self.current.x + args[0] } else { args[0] };
                self.draw_through(&[Point::new(x, self.current.y)], segments)
            }
            Command::Vertical => {
                let y = if relative { self.current.y + args[0] } else { args[0] };
                self.draw_through(&[Point::new(self.current.x, y)], segments)
            }
            Command::Cubic => {
                let c1 = self.resolve(relative, args[0], args[1]);
                let c2 = self.resolve(relative, args[2], args[3]);
                let end = self.resolve(relative, args[4], args[5]);
                let chords = flatten_cubic(self.current, c1, c2, end);
                self.draw_through(&chords, segments)
            }
            Command::SmoothCubic => {
                let c2 = self.resolve(relative, args[0], args[1]);
                let end = self.resolve(relative, args[2], args[3]);
                let chords = flatten_cubic(self.current, self.current, c2, end);
                self.draw_through(&chords, segments)
            }
            Command::Quadratic => {
                let c = self.resolve(relative, args[0], args[1]);
                let end = self.resolve(relative, args[2], args[3]);
                let chords = flatten_quadratic(self.current, c, end);
                self.draw_through(&chords, segments)
            }
            Command::Arc => {
                // Radii, rotation and flags are consumed but not used
                let end = self.resolve(relative, args[5], args[6]);
                self.draw_through(&[end], segments)
            }
            Command::Close => self.close(segments),
        }
    }
}

fn cubic_point(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let w0 = mt * mt * mt;
    let w1 = 3.0 * mt * mt * t;
    let w2 = 3.0 * mt * t * t;
    let w3 = t * t * t;
    Point::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x + w3 * p3.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y + w3 * p3.y,
    )
}

fn quadratic_point(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    let w0 = mt * mt;
    let w1 = 2.0 * mt * t;
    let w2 = t * t;
    Point::new(
        w0 * p0.x + w1 * p1.x + w2 * p2.x,
        w0 * p0.y + w1 * p1.y + w2 * p2.y,
    )
}

fn flatten_cubic(p0: Point, p1: Point, p2: Point, p3: Point) -> [Point; 4] {
    CUBIC_SAMPLES.map(|t| cubic_point(p0, p1, p2, p3, t))
}

fn flatten_quadratic(p0: Point, p1: Point, p2: Point) -> [Point; 3] {
    QUADRATIC_SAMPLES.map(|t| quadratic_point(p0, p1, p2, t))
}

/// Read `count` numeric operands starting at `pos`
fn take_operands(tokens: &[Token], pos: usize, count: usize) -> Option<[f64; MAX_OPERANDS]> {
    let mut args = [0.0; MAX_OPERANDS];
    for (slot, token) in args.iter_mut().zip(tokens.get(pos..pos + count)?) {
        match token {
            Token::Number(n) => *slot = *n,
            Token::Command(_) => return None,
        }
    }
    Some(args)
}

/// Interpret path data into straight segments.
///
/// Never fails: truncated operands, unknown command letters and operands with
/// no active command stop the scan and return the segments produced so far.
pub fn parse_path(data: &str) -> Vec<Segment> {
    let tokens = tokenize(data);
    let mut segments = Vec::new();
    let mut state = PathState::default();
    let mut pos = 0;

    while pos < tokens.len() {
        if let Token::Command(letter) = tokens[pos] {
            state.command = Some(letter);
            pos += 1;
        }

        let Some(letter) = state.command else {
            tracing::debug!(position = pos, "path operand without an active command");
            break;
        };
        let Some((command, relative)) = Command::from_letter(letter) else {
            tracing::debug!(command = %letter, position = pos, "unsupported path command");
            break;
        };

        let arity = command.arity();
        let Some(args) = take_operands(&tokens, pos, arity) else {
            tracing::debug!(command = %letter, position = pos, "path data truncated");
            break;
        };
        pos += arity;

        state = state.execute(command, relative, &args, &mut segments);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn test_closed_square() {
        let segments = parse_path("M0,0 L10,0 L10,10 L0,10 Z");
        assert_eq!(
            segments,
            vec![
                seg(0.0, 0.0, 10.0, 0.0),
                seg(10.0, 0.0, 10.0, 10.0),
                seg(10.0, 10.0, 0.0, 10.0),
                seg(0.0, 10.0, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_implicit_line_after_move() {
        let segments = parse_path("M0 0 10 0 10 10");
        assert_eq!(
            segments,
            vec![seg(0.0, 0.0, 10.0, 0.0), seg(10.0, 0.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn test_relative_commands() {
        let segments = parse_path("m10 10 l5 0 0 5 z");
        assert_eq!(
            segments,
            vec![
                seg(10.0, 10.0, 15.0, 10.0),
                seg(15.0, 10.0, 15.0, 15.0),
                seg(15.0, 15.0, 10.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_horizontal_vertical() {
        let segments = parse_path("M0 0 H10 V10 h-10 z");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[1], seg(10.0, 0.0, 10.0, 10.0));
        assert_eq!(segments[2], seg(10.0, 10.0, 0.0, 10.0));
    }

    #[test]
    fn test_close_at_start_is_noop() {
        let segments = parse_path("M0 0 L10 0 L10 10 L0.005 0 Z");
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_truncated_mid_coordinate() {
        assert!(parse_path("M0,0 L10").is_empty());
        assert_eq!(parse_path("M0,0 L10,0 L5"), vec![seg(0.0, 0.0, 10.0, 0.0)]);
    }

    #[test]
    fn test_letter_in_operand_position_truncates() {
        assert_eq!(parse_path("M0 0 L10 0 L5 Z"), vec![seg(0.0, 0.0, 10.0, 0.0)]);
    }

    #[test]
    fn test_unknown_command_truncates() {
        let segments = parse_path("M0 0 L10 0 T20 0 L30 0");
        assert_eq!(segments, vec![seg(0.0, 0.0, 10.0, 0.0)]);
    }

    #[test]
    fn test_operand_after_close_truncates() {
        let segments = parse_path("M0 0 L10 0 L10 10 Z 5 5");
        assert_eq!(segments.len(), 3);
    }

    #[test]
    fn test_relative_after_close_uses_subpath_start() {
        let segments = parse_path("M10 10 l10 0 l0 10 z l5 0");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[3], seg(10.0, 10.0, 15.0, 10.0));
    }

    #[test]
    fn test_multiple_subpaths() {
        let segments = parse_path("M0 0 L10 0 L10 10 Z M20 20 L30 20 L30 30 Z");
        assert_eq!(segments.len(), 6);
        assert_eq!(segments[5], seg(30.0, 30.0, 20.0, 20.0));
    }

    #[test]
    fn test_cubic_flattening() {
        let segments = parse_path("M0 0 C0 10 10 10 10 0");
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].start, Point::new(0.0, 0.0));
        assert_eq!(segments[3].end, Point::new(10.0, 0.0));
        // t = 0.5 lies on the curve apex
        assert_relative_eq!(segments[1].end.x, 5.0);
        assert_relative_eq!(segments[1].end.y, 7.5);
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_relative_cubic() {
        let absolute = parse_path("M5 5 C5 15 15 15 15 5");
        let relative = parse_path("M5 5 c0 10 10 10 10 0");
        assert_eq!(absolute.len(), relative.len());
        for (a, r) in absolute.iter().zip(&relative) {
            assert_relative_eq!(a.end.x, r.end.x, epsilon = 1e-12);
            assert_relative_eq!(a.end.y, r.end.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_smooth_cubic_uses_current_point() {
        let smooth = parse_path("M0 0 S10 10 20 0");
        let explicit = parse_path("M0 0 C0 0 10 10 20 0");
        assert_eq!(smooth, explicit);
        assert_eq!(smooth.len(), 4);
    }

    #[test]
    fn test_quadratic_flattening() {
        let segments = parse_path("M0 0 Q5 10 10 0");
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].end, Point::new(10.0, 0.0));
    }

    #[test]
    fn test_arc_is_single_chord() {
        assert_eq!(
            parse_path("M0 0 A5 5 0 0 1 10 0"),
            vec![seg(0.0, 0.0, 10.0, 0.0)]
        );
        assert_eq!(
            parse_path("M2 2 a5 5 0 1 0 10 0"),
            vec![seg(2.0, 2.0, 12.0, 2.0)]
        );
    }

    #[test]
    fn test_arc_consumes_all_operands() {
        assert_eq!(
            parse_path("M0 0 A5 5 0 0 1 10 0 L10 10"),
            vec![seg(0.0, 0.0, 10.0, 0.0), seg(10.0, 0.0, 10.0, 10.0)]
        );
    }

    #[test]
    fn test_no_segments_before_pen_position() {
        assert_eq!(parse_path("L10 0 L10 10"), vec![seg(10.0, 0.0, 10.0, 10.0)]);
    }

    #[test]
    fn test_empty_and_garbage() {
        assert!(parse_path("").is_empty());
        assert!(parse_path("12 34").is_empty());
        assert!(parse_path("M").is_empty());
    }

    #[test]
    fn test_overflowing_coordinate_truncates() {
        assert!(parse_path("M0 0 L1e400 0 L0 10 Z").is_empty());
        assert_eq!(
            parse_path("M0 0 L10 0 L1e400 0"),
            vec![seg(0.0, 0.0, 10.0, 0.0)]
        );
    }
}
