// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Drawing document model
//!
//! The XML tree is copied into owned [`Element`]s holding only what the
//! walker and ignore policies look at: local tag name, attributes and
//! element children. Non-rendering containers are left out entirely.

use formwork_geometry::{parse_number, AffineMatrix};

use crate::error::{Error, Result};

/// Declared size used when `width` or `height` is missing or blank
pub const DEFAULT_EXTENT: f64 = 1000.0;

/// Containers whose content is never drawn in place
const NON_RENDERING_TAGS: &[&str] = &[
    "defs", "symbol", "clippath", "mask", "marker", "pattern", "metadata",
];

/// Supported drawing primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Path,
    Line,
    Rect,
    Polygon,
    Polyline,
    Circle,
    Ellipse,
    /// Containers and anything without geometry of its own
    Other,
}

impl ShapeKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "path" => ShapeKind::Path,
            "line" => ShapeKind::Line,
            "rect" => ShapeKind::Rect,
            "polygon" => ShapeKind::Polygon,
            "polyline" => ShapeKind::Polyline,
            "circle" => ShapeKind::Circle,
            "ellipse" => ShapeKind::Ellipse,
            _ => ShapeKind::Other,
        }
    }
}

/// A drawing element with its attributes and element children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Local tag name, namespace prefix removed
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn kind(&self) -> ShapeKind {
        ShapeKind::from_tag(&self.tag)
    }

    /// Numeric attribute value. Absent or blank is 0, anything else must parse.
    pub fn number(&self, name: &str) -> Result<f64> {
        match self.attribute(name) {
            None => Ok(0.0),
            Some(value) if value.trim().is_empty() => Ok(0.0),
            Some(value) => parse_number(value)
                .map_err(|_| Error::invalid_attribute(&self.tag, name, value)),
        }
    }

    /// Copy an XML element and its rendering descendants
    pub fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            tag: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            children: node
                .children()
                .filter(|child| child.is_element() && is_rendering(*child))
                .map(Element::from_node)
                .collect(),
        }
    }
}

fn is_rendering(node: roxmltree::Node<'_, '_>) -> bool {
    let tag = node.tag_name().name();
    !NON_RENDERING_TAGS
        .iter()
        .any(|skip| tag.eq_ignore_ascii_case(skip))
}

/// Declared drawing size and coordinate window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingInfo {
    pub width: f64,
    pub height: f64,
    /// `[min_x, min_y, width, height]`
    pub view_box: [f64; 4],
}

impl DrawingInfo {
    pub fn from_root(root: &Element) -> Result<Self> {
        let width = extent(root, "width")?;
        let height = extent(root, "height")?;

        let view_box = match root.attribute("viewBox") {
            Some(text) => {
                let parts: Vec<&str> = text
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter(|part| !part.is_empty())
                    .collect();
                if parts.len() >= 4 {
                    let mut values = [0.0; 4];
                    for (slot, part) in values.iter_mut().zip(&parts) {
                        *slot = parse_number(part)
                            .map_err(|_| Error::invalid_attribute(&root.tag, "viewBox", text))?;
                    }
                    values
                } else {
                    [0.0, 0.0, width, height]
                }
            }
            None => [0.0, 0.0, width, height],
        };

        Ok(Self {
            width,
            height,
            view_box,
        })
    }

    /// Root transform that moves the viewBox origin to `(0, 0)`
    pub fn origin_matrix(&self) -> AffineMatrix {
        AffineMatrix::translate(-self.view_box[0], -self.view_box[1])
    }

    /// viewBox as `"min_x min_y width height"`, space separated.
    ///
    /// Each value uses the shortest form that reads back exactly, so whole
    /// numbers carry no fraction: `"100 50 400 300"`, `"0 0 297.5 210"`.
    pub fn view_box_string(&self) -> String {
        let [x, y, w, h] = self.view_box;
        format!("{} {} {} {}", x, y, w, h)
    }
}

/// Declared `width`/`height` with a trailing unit suffix (`mm`, `px`, `%`) removed
fn extent(root: &Element, name: &str) -> Result<f64> {
    let Some(raw) = root.attribute(name) else {
        return Ok(DEFAULT_EXTENT);
    };
    let stripped = raw
        .trim()
        .trim_end_matches(|c: char| c.is_ascii_alphabetic() || c == '%');
    if stripped.trim().is_empty() {
        return Ok(DEFAULT_EXTENT);
    }
    parse_number(stripped).map_err(|_| Error::invalid_attribute(&root.tag, name, raw))
}

/// A parsed drawing: its size information and rendering element tree
#[derive(Debug, Clone)]
pub struct Drawing {
    pub info: DrawingInfo,
    pub root: Element,
}

impl Drawing {
    /// Parse document text and locate the first `svg` element.
    pub fn parse(text: &str) -> Result<Self> {
        let mut options = roxmltree::ParsingOptions::default();
        options.allow_dtd = true;
        let doc = roxmltree::Document::parse_with_options(text, options)?;

        let root_node = doc
            .descendants()
            .find(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case("svg"))
            .ok_or(Error::MissingRoot)?;

        let root = Element::from_node(root_node);
        let info = DrawingInfo::from_root(&root)?;
        Ok(Self { info, root })
    }
}
