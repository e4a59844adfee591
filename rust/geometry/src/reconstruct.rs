// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Polygon reconstruction from loose segments
//!
//! Segments are merged into a [`SegmentGraph`], every simple cycle becomes a
//! candidate polygon, and candidates are filtered by point count and area
//! before a coarse area-based dedupe. The result is ordered by descending area.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::graph::SegmentGraph;
use crate::types::{Polygon, Segment};

/// Default endpoint merge distance in drawing units
pub const DEFAULT_TOLERANCE: f64 = 0.5;
/// Default minimum polygon area in square drawing units
pub const DEFAULT_MIN_AREA: f64 = 100.0;
/// Default cap on nodes in a cycle search path
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Tuning for [`reconstruct_with`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructOptions {
    pub tolerance: f64,
    pub min_area: f64,
    /// Cycles with fewer points are skipped; values below 3 act as 3
    pub min_points: usize,
    pub max_depth: usize,
}

impl Default for ReconstructOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_area: DEFAULT_MIN_AREA,
            min_points: 3,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ReconstructOptions {
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }
}

/// Reconstruct polygons with the given tolerance and default filters
pub fn reconstruct(segments: &[Segment], tolerance: f64) -> Vec<Polygon> {
    reconstruct_with(segments, &ReconstructOptions::default().with_tolerance(tolerance))
}

/// Reconstruct closed polygons from segments.
///
/// Polygons whose absolute area rounds to the same tenth are treated as
/// duplicates and only the first is kept, which also discards distinct
/// shapes that happen to share an area.
pub fn reconstruct_with(segments: &[Segment], options: &ReconstructOptions) -> Vec<Polygon> {
    let graph = SegmentGraph::from_segments(segments, options.tolerance);
    let cycles = graph.find_cycles(options.max_depth);
    let min_points = options.min_points.max(3);

    let mut seen_areas: FxHashSet<i64> = FxHashSet::default();
    let mut polygons = Vec::new();

    for cycle in &cycles {
        if cycle.len() < min_points {
            continue;
        }

        let polygon = Polygon::from_points(graph.cycle_points(cycle));
        if polygon.area <= 0.0 || polygon.area < options.min_area {
            continue;
        }

        let key = (polygon.area * 10.0).round() as i64;
        if seen_areas.insert(key) {
            polygons.push(polygon);
        }
    }

    polygons.sort_by(|a, b| b.area.total_cmp(&a.area));

    tracing::debug!(
        segments = segments.len(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        cycles = cycles.len(),
        polygons = polygons.len(),
        "reconstructed polygons"
    );

    polygons
}
