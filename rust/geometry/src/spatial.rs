// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Spatial index for tolerance-based node lookup.
//!
//! A uniform grid of square cells with side equal to the tolerance, so every
//! point closer than the tolerance lies in the 3x3 neighborhood of the query
//! cell. Lookups return the earliest inserted match, which is exactly what a
//! linear first-seen scan over all nodes would return.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::types::Point;

/// Grid-based spatial hash over node ids
#[derive(Debug)]
pub struct SpatialIndex {
    cell_size: f64,
    grid: FxHashMap<(i64, i64), SmallVec<[usize; 4]>>,
}

impl SpatialIndex {
    /// Creates a new spatial index with the given cell size.
    ///
    /// Non-positive sizes fall back to unit cells.
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            grid: FxHashMap::default(),
        }
    }

    /// Inserts a node id at the given position. Ids must be inserted in
    /// increasing order.
    pub fn insert(&mut self, id: usize, p: Point) {
        let cell = self.cell_coords(p);
        self.grid.entry(cell).or_default().push(id);
    }

    /// Finds the earliest node strictly closer than `tolerance` to `p`.
    ///
    /// `positions[id]` must hold the position each id was inserted with, and
    /// `tolerance` must not exceed the cell size.
    pub fn find_near(&self, positions: &[Point], p: Point, tolerance: f64) -> Option<usize> {
        if tolerance <= 0.0 {
            return None;
        }

        let (cx, cy) = self.cell_coords(p);
        let tol_sq = tolerance * tolerance;
        let mut best: Option<usize> = None;

        for dx in -1..=1 {
            for dy in -1..=1 {
                let cell = (cx.saturating_add(dx), cy.saturating_add(dy));
                let Some(ids) = self.grid.get(&cell) else {
                    continue;
                };
                // Ids within a cell are ascending, so the first hit is that cell's earliest
                let hit = ids.iter().copied().find(|&id| {
                    let q = positions[id];
                    (q.x - p.x).powi(2) + (q.y - p.y).powi(2) < tol_sq
                });
                if let Some(id) = hit {
                    best = Some(best.map_or(id, |b| b.min(id)));
                }
            }
        }

        best
    }

    /// Far-out coordinates saturate at the i64 bounds and share the edge cells.
    fn cell_coords(&self, p: Point) -> (i64, i64) {
        (
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spatial_index_find_near() {
        let positions = vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let mut index = SpatialIndex::new(0.5);
        for (id, p) in positions.iter().enumerate() {
            index.insert(id, *p);
        }

        assert_eq!(index.find_near(&positions, Point::new(0.0, 0.0), 0.5), Some(0));
        assert_eq!(index.find_near(&positions, Point::new(0.3, -0.3), 0.5), Some(0));
        assert_eq!(index.find_near(&positions, Point::new(9.8, 10.1), 0.5), Some(1));
        assert_eq!(index.find_near(&positions, Point::new(5.0, 5.0), 0.5), None);
    }

    #[test]
    fn earliest_match_wins_across_cells() {
        let positions = vec![Point::new(0.9, 0.0), Point::new(0.0, 0.0)];
        let mut index = SpatialIndex::new(0.5);
        index.insert(0, positions[0]);
        index.insert(1, positions[1]);

        // Both lie 0.45 away; id 0 was inserted first
        assert_eq!(index.find_near(&positions, Point::new(0.45, 0.0), 0.5), Some(0));
    }

    #[test]
    fn distance_equal_to_tolerance_is_not_near() {
        let positions = vec![Point::new(0.0, 0.0)];
        let mut index = SpatialIndex::new(0.5);
        index.insert(0, positions[0]);

        assert_eq!(index.find_near(&positions, Point::new(0.5, 0.0), 0.5), None);
    }

    #[test]
    fn non_positive_tolerance_never_matches() {
        let positions = vec![Point::new(1.0, 1.0)];
        let mut index = SpatialIndex::new(0.0);
        index.insert(0, positions[0]);

        assert_eq!(index.find_near(&positions, Point::new(1.0, 1.0), 0.0), None);
    }

    #[test]
    fn saturated_cells_still_match_exactly() {
        // 1e19 / 0.5 and 100 / 1e-18 both exceed the i64 cell range
        let far = vec![Point::new(1e19, -1e19), Point::new(1e19, 1e19)];
        let mut index = SpatialIndex::new(0.5);
        for (id, p) in far.iter().enumerate() {
            index.insert(id, *p);
        }
        assert_eq!(index.find_near(&far, Point::new(1e19, 1e19), 0.5), Some(1));
        assert_eq!(index.find_near(&far, Point::new(-1e19, 1e19), 0.5), None);

        let fine = vec![Point::new(100.0, 100.0), Point::new(100.0, 0.0)];
        let mut index = SpatialIndex::new(1e-18);
        for (id, p) in fine.iter().enumerate() {
            index.insert(id, *p);
        }
        assert_eq!(index.find_near(&fine, Point::new(100.0, 0.0), 1e-18), Some(1));
        assert_eq!(index.find_near(&fine, Point::new(100.0, 50.0), 1e-18), None);
    }

    #[test]
    fn infinite_coordinates_do_not_overflow() {
        let positions = vec![Point::new(f64::INFINITY, 0.0)];
        let mut index = SpatialIndex::new(0.5);
        index.insert(0, positions[0]);
        // inf - inf is NaN, which never compares below the tolerance
        assert_eq!(index.find_near(&positions, Point::new(f64::INFINITY, 0.0), 0.5), None);
        assert_eq!(index.find_near(&positions, Point::new(f64::NEG_INFINITY, 0.0), 0.5), None);
    }
}
