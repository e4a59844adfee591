// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment identity graph and simple-cycle enumeration.
//!
//! - **Nodes** = canonical points; every input endpoint closer than the
//!   tolerance to an existing node maps onto it. A node keeps the position of
//!   the first point that created it and is never merged or moved later.
//! - **Edges** = input segments, undirected. A segment whose endpoints map to
//!   the same node is dropped.
//!
//! Cycles are found by depth-first search from every node. Each search tracks
//! the nodes and edges on the active path, so an edge cannot be walked back
//! and no node repeats; a cycle is recorded whenever a neighbor of the path's
//! tail is the start node and the path holds at least three nodes.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::spatial::SpatialIndex;
use crate::types::{Point, Segment};

/// Undirected graph over canonical segment endpoints
#[derive(Debug)]
pub struct SegmentGraph {
    tolerance: f64,
    /// Canonical position per node id
    nodes: Vec<Point>,
    /// Neighbor set per node id, in first-insertion order
    adjacency: Vec<SmallVec<[usize; 4]>>,
    edge_count: usize,
    index: SpatialIndex,
}

impl SegmentGraph {
    /// Creates an empty graph with the given node tolerance.
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            nodes: Vec::new(),
            adjacency: Vec::new(),
            edge_count: 0,
            index: SpatialIndex::new(tolerance),
        }
    }

    /// Builds a graph by inserting every segment in order.
    pub fn from_segments(segments: &[Segment], tolerance: f64) -> Self {
        let mut graph = Self::new(tolerance);
        for segment in segments {
            graph.add_segment(segment);
        }
        graph
    }

    // =========================================================================
    // Graph mutation
    // =========================================================================

    /// Returns the node within tolerance of `p`, creating one at `p` if none exists.
    pub fn node_for(&mut self, p: Point) -> usize {
        if let Some(existing) = self.index.find_near(&self.nodes, p, self.tolerance) {
            return existing;
        }

        let id = self.nodes.len();
        self.nodes.push(p);
        self.adjacency.push(SmallVec::new());
        self.index.insert(id, p);
        id
    }

    /// Inserts a segment as an undirected edge.
    ///
    /// Returns `false` when both endpoints collapse to one node. Repeated
    /// segments between the same two nodes do not add a second neighbor entry.
    pub fn add_segment(&mut self, segment: &Segment) -> bool {
        let a = self.node_for(segment.start);
        let b = self.node_for(segment.end);
        if a == b {
            return false;
        }

        if !self.adjacency[a].contains(&b) {
            self.adjacency[a].push(b);
            self.adjacency[b].push(a);
            self.edge_count += 1;
        }
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Canonical position of a node
    pub fn node(&self, id: usize) -> Option<Point> {
        self.nodes.get(id).copied()
    }

    pub fn neighbors(&self, id: usize) -> &[usize] {
        match self.adjacency.get(id) {
            Some(neighbors) => neighbors.as_slice(),
            None => &[],
        }
    }

    pub fn degree(&self, id: usize) -> usize {
        self.neighbors(id).len()
    }

    /// Positions for a cycle of node ids
    pub fn cycle_points(&self, cycle: &[usize]) -> Vec<Point> {
        cycle.iter().map(|&id| self.nodes[id]).collect()
    }

    // =========================================================================
    // Cycle enumeration
    // =========================================================================

    /// Enumerates simple cycles as node-id loops.
    ///
    /// Searches start from every node in creation order. A branch whose path
    /// holds more than `max_depth` nodes is abandoned. The same loop is
    /// reported once per start node and direction that reaches it; callers
    /// deduplicate.
    pub fn find_cycles(&self, max_depth: usize) -> Vec<Vec<usize>> {
        let mut search = CycleSearch {
            graph: self,
            max_depth,
            start: 0,
            path: Vec::new(),
            on_path: vec![false; self.nodes.len()],
            used_edges: FxHashSet::default(),
            cycles: Vec::new(),
        };

        for start in 0..self.nodes.len() {
            // A node with fewer than two neighbors cannot lie on a cycle
            if self.degree(start) < 2 {
                continue;
            }
            search.start = start;
            search.path.push(start);
            search.on_path[start] = true;
            search.visit(start);
            search.on_path[start] = false;
            search.path.clear();
        }

        search.cycles
    }
}

/// Depth-first search state for one start node at a time
struct CycleSearch<'a> {
    graph: &'a SegmentGraph,
    max_depth: usize,
    start: usize,
    path: Vec<usize>,
    on_path: Vec<bool>,
    used_edges: FxHashSet<(usize, usize)>,
    cycles: Vec<Vec<usize>>,
}

impl CycleSearch<'_> {
    fn visit(&mut self, current: usize) {
        if self.path.len() > self.max_depth {
            return;
        }

        let graph = self.graph;
        for &neighbor in graph.neighbors(current) {
            let edge = (current.min(neighbor), current.max(neighbor));
            if self.used_edges.contains(&edge) {
                continue;
            }

            if neighbor == self.start && self.path.len() >= 3 {
                self.cycles.push(self.path.clone());
            } else if !self.on_path[neighbor] {
                self.used_edges.insert(edge);
                self.path.push(neighbor);
                self.on_path[neighbor] = true;

                self.visit(neighbor);

                self.on_path[neighbor] = false;
                self.path.pop();
                self.used_edges.remove(&edge);
            }
        }
    }
}
