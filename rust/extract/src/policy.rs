// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ignore policies deciding which elements contribute geometry.
//!
//! Construction drawings mix structural outlines with annotation: dimension
//! chains, grid axes, labels and hidden (dashed) edges. [`LayerFilter`]
//! recognises those by tag, stroke style and id/class keywords.
//!
//! A policy is asked about every element on its own. Skipping a group does
//! not skip its children; each child is asked in turn.

use serde::{Deserialize, Serialize};

use crate::document::Element;

/// Per-element skip decision
pub trait IgnorePolicy {
    fn should_ignore(&self, element: &Element) -> bool;
}

impl<F> IgnorePolicy for F
where
    F: Fn(&Element) -> bool,
{
    fn should_ignore(&self, element: &Element) -> bool {
        self(element)
    }
}

/// Policy that never skips anything
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAll;

impl IgnorePolicy for KeepAll {
    fn should_ignore(&self, _element: &Element) -> bool {
        false
    }
}

/// Configuration for annotation filtering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerFilterConfig {
    /// Tags never treated as geometry (compared case-insensitively)
    pub skip_tags: Vec<String>,

    /// Skip elements with a dash pattern. Dashed strokes are usually axes or
    /// hidden edges. Default: true
    pub skip_dashed: bool,

    /// Strokes thinner than this are dimension or hatch lines. Default: 0.2
    pub min_stroke_width: f64,

    /// Case-insensitive substrings of `id` and `class` marking annotation layers
    pub keywords: Vec<String>,
}

impl Default for LayerFilterConfig {
    fn default() -> Self {
        Self {
            skip_tags: owned(&[
                "defs", "metadata", "style", "script", "clippath", "mask", "text", "tspan",
                "title", "desc", "symbol", "use",
            ]),
            skip_dashed: true,
            min_stroke_width: 0.2,
            keywords: owned(&[
                "dimension",
                "dim",
                "axis",
                "axes",
                "osi",
                "wymiar",
                "text",
                "label",
                "annotation",
                "grid",
                "marker",
            ]),
        }
    }
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Annotation filter driven by [`LayerFilterConfig`]
#[derive(Debug, Clone, Default)]
pub struct LayerFilter {
    config: LayerFilterConfig,
}

impl LayerFilter {
    pub fn new(mut config: LayerFilterConfig) -> Self {
        // Match against lowercased element text
        for keyword in &mut config.keywords {
            *keyword = keyword.to_lowercase();
        }
        Self { config }
    }

    fn is_skipped_tag(&self, tag: &str) -> bool {
        self.config
            .skip_tags
            .iter()
            .any(|skip| skip.eq_ignore_ascii_case(tag))
    }

    fn is_dashed(&self, element: &Element) -> bool {
        match element.attribute("stroke-dasharray") {
            Some(dash) => {
                let dash = dash.trim();
                !dash.is_empty() && dash != "none"
            }
            None => false,
        }
    }

    fn is_hairline(&self, element: &Element) -> bool {
        let Some(width) = element.attribute("stroke-width") else {
            return false;
        };
        let value = width.replace("px", "").replace("pt", "");
        // An unreadable width never hides an element
        match formwork_geometry::parse_number(&value) {
            Ok(w) => w < self.config.min_stroke_width,
            Err(_) => false,
        }
    }

    fn matches_keyword(&self, element: &Element) -> bool {
        let id = element.attribute("id").unwrap_or("");
        let class = element.attribute("class").unwrap_or("");
        let combined = format!("{} {}", id, class).to_lowercase();
        self.config
            .keywords
            .iter()
            .any(|keyword| combined.contains(keyword.as_str()))
    }
}

impl IgnorePolicy for LayerFilter {
    fn should_ignore(&self, element: &Element) -> bool {
        if self.is_skipped_tag(&element.tag) {
            return true;
        }
        if self.config.skip_dashed && self.is_dashed(element) {
            return true;
        }
        self.is_hairline(element) || self.matches_keyword(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> LayerFilter {
        LayerFilter::new(LayerFilterConfig::default())
    }

    #[test]
    fn test_skip_tags_case_insensitive() {
        assert!(filter().should_ignore(&Element::new("clipPath")));
        assert!(filter().should_ignore(&Element::new("text")));
        assert!(!filter().should_ignore(&Element::new("path")));
    }

    #[test]
    fn test_dashed_strokes() {
        let dashed = Element::new("line").with_attribute("stroke-dasharray", "4 2");
        let solid = Element::new("line").with_attribute("stroke-dasharray", "none");
        assert!(filter().should_ignore(&dashed));
        assert!(!filter().should_ignore(&solid));

        let lenient = LayerFilter::new(LayerFilterConfig {
            skip_dashed: false,
            ..LayerFilterConfig::default()
        });
        assert!(!lenient.should_ignore(&dashed));
    }

    #[test]
    fn test_hairline_strokes() {
        let thin = Element::new("path").with_attribute("stroke-width", "0.1px");
        let thick = Element::new("path").with_attribute("stroke-width", "0.5pt");
        let odd = Element::new("path").with_attribute("stroke-width", "thin");
        assert!(filter().should_ignore(&thin));
        assert!(!filter().should_ignore(&thick));
        assert!(!filter().should_ignore(&odd));
    }

    #[test]
    fn test_keywords_in_id_or_class() {
        let dims = Element::new("g").with_attribute("id", "Layer_DIMENSIONS");
        let axes = Element::new("g").with_attribute("class", "osie-konstrukcyjne");
        let walls = Element::new("g").with_attribute("id", "walls");
        assert!(filter().should_ignore(&dims));
        assert!(filter().should_ignore(&axes));
        assert!(!filter().should_ignore(&walls));
    }

    #[test]
    fn test_closure_policy() {
        let only_paths = |el: &Element| el.tag != "path";
        assert!(only_paths.should_ignore(&Element::new("rect")));
        assert!(!KeepAll.should_ignore(&Element::new("text")));
    }

    #[test]
    fn test_config_partial_json() {
        let config: LayerFilterConfig =
            serde_json::from_str(r#"{"keywords": ["Hatch"], "min_stroke_width": 0.05}"#).unwrap();
        assert!(config.skip_dashed);
        assert_eq!(config.min_stroke_width, 0.05);

        let hatch = Element::new("g").with_attribute("class", "hatch-fill");
        assert!(LayerFilter::new(config).should_ignore(&hatch));
    }
}
