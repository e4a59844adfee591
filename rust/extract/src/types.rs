// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extraction results and the JSON report shape

use formwork_geometry::{Polygon, Segment};
use serde::{Deserialize, Serialize};

/// Report format version
pub const REPORT_VERSION: &str = "2.0";

/// Polygons and raw segments recovered from one drawing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Boundary polygons, largest first
    pub polygons: Vec<Polygon>,
    /// Hole polygons, largest first
    pub holes: Vec<Polygon>,
    /// Every segment fed to reconstruction, in drawing order
    pub segments: Vec<Segment>,
    pub metadata: ExtractionMetadata,
}

impl Extraction {
    /// Boundary area minus hole area
    pub fn net_area(&self) -> f64 {
        let boundary: f64 = self.polygons.iter().map(|p| p.area).sum();
        let holes: f64 = self.holes.iter().map(|p| p.area).sum();
        boundary - holes
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionMetadata {
    pub width: f64,
    pub height: f64,
    /// Declared viewBox as `"min_x min_y width height"`, shortest exact form
    /// per value (`"100 50 400 300"`, not `"100.0 50.0 400.0 300.0"`)
    pub view_box: String,
    pub segment_count: usize,
    pub polygon_count: usize,
    pub hole_count: usize,
    pub net_area: f64,
    pub version: String,
}

/// Failure payload for a drawing that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub error: String,
    /// Source chain of the error, one cause per line
    pub trace: String,
    pub version: String,
}

impl ExtractionFailure {
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut trace = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            trace.push(cause.to_string());
            source = cause.source();
        }

        Self {
            error: err.to_string(),
            trace: trace.join("\n"),
            version: REPORT_VERSION.to_string(),
        }
    }
}

/// Either outcome of an extraction run, serialized without a tag
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionReport {
    Success(Extraction),
    Failure(ExtractionFailure),
}

impl ExtractionReport {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionReport::Success(_))
    }
}
