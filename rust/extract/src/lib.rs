// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall and slab outline extraction from SVG drawings
//!
//! This crate provides the pipeline from drawing text to polygons:
//! 1. Parse the document and locate the drawing root
//! 2. Walk the element tree, skipping annotation layers, and collect
//!    segments in viewBox-relative coordinates
//! 3. Reconstruct closed polygons and split them into boundaries and holes
//!
//! # Usage
//!
//! ```rust,ignore
//! use formwork_extract::{extract_report, ExtractionConfig};
//!
//! let report = extract_report(&svg_text, &ExtractionConfig::from_env());
//! println!("{}", serde_json::to_string(&report)?);
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod policy;
pub mod types;
pub mod walker;

use std::path::Path;

use formwork_geometry::reconstruct_with;

pub use config::ExtractionConfig;
pub use document::{Drawing, DrawingInfo, Element, ShapeKind};
pub use error::{Error, Result};
pub use policy::{IgnorePolicy, KeepAll, LayerFilter, LayerFilterConfig};
pub use types::{
    Extraction, ExtractionFailure, ExtractionMetadata, ExtractionReport, REPORT_VERSION,
};
pub use walker::collect_segments;

/// Extract boundary and hole polygons from drawing text.
pub fn extract_geometry(svg: &str, config: &ExtractionConfig) -> Result<Extraction> {
    let drawing = Drawing::parse(svg)?;
    let origin = drawing.info.origin_matrix();

    let segments = if config.apply_filter {
        let filter = LayerFilter::new(config.filter.clone());
        collect_segments(&drawing.root, &origin, &filter)?
    } else {
        collect_segments(&drawing.root, &origin, &KeepAll)?
    };

    let (holes, polygons): (Vec<_>, Vec<_>) = reconstruct_with(&segments, &config.reconstruct)
        .into_iter()
        .partition(|p| p.is_hole);

    let mut extraction = Extraction {
        metadata: ExtractionMetadata {
            width: drawing.info.width,
            height: drawing.info.height,
            view_box: drawing.info.view_box_string(),
            segment_count: segments.len(),
            polygon_count: polygons.len(),
            hole_count: holes.len(),
            net_area: 0.0,
            version: REPORT_VERSION.to_string(),
        },
        polygons,
        holes,
        segments,
    };
    extraction.metadata.net_area = extraction.net_area();

    tracing::debug!(
        segments = extraction.metadata.segment_count,
        polygons = extraction.metadata.polygon_count,
        holes = extraction.metadata.hole_count,
        "extraction complete"
    );

    Ok(extraction)
}

/// Like [`extract_geometry`], folding any failure into the report.
pub fn extract_report(svg: &str, config: &ExtractionConfig) -> ExtractionReport {
    match extract_geometry(svg, config) {
        Ok(extraction) => ExtractionReport::Success(extraction),
        Err(err) => {
            tracing::debug!(error = %err, "extraction failed");
            ExtractionReport::Failure(ExtractionFailure::from_error(&err))
        }
    }
}

/// Read and extract a drawing file.
pub fn extract_file(path: impl AsRef<Path>, config: &ExtractionConfig) -> Result<Extraction> {
    let text = std::fs::read_to_string(path)?;
    extract_geometry(&text, config)
}
