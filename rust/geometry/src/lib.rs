// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Formwork outline geometry
//!
//! Turns drawing primitives into closed polygons:
//! 1. Parse and compose 2D affine transforms
//! 2. Flatten path data into straight segments
//! 3. Lower primitive shapes (rect, circle, ...) into segments
//! 4. Rebuild closed, oriented polygons from the loose segments
//!
//! # Usage
//!
//! ```rust,ignore
//! use formwork_geometry::{parse_path, reconstruct};
//!
//! let segments = parse_path("M0,0 L10,0 L10,10 L0,10 Z");
//! let polygons = reconstruct(&segments, 0.5);
//! assert_eq!(polygons.len(), 1);
//! ```

pub mod error;
pub mod graph;
pub mod parser;
pub mod path;
pub mod reconstruct;
pub mod shapes;
pub mod spatial;
pub mod transform;
pub mod types;

pub use error::{Error, Result};
pub use graph::SegmentGraph;
pub use parser::{numbers, parse_number};
pub use path::parse_path;
pub use reconstruct::{reconstruct, reconstruct_with, ReconstructOptions};
pub use transform::{apply_transform, compose, parse_transform, AffineMatrix};
pub use types::{perimeter, signed_area, Point, Polygon, Segment};
