// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element tree walk collecting segments in drawing space

use formwork_geometry::{
    compose, numbers, parse_path, parse_transform, shapes, AffineMatrix, Segment,
};

use crate::document::{Element, ShapeKind};
use crate::error::Result;
use crate::policy::IgnorePolicy;

/// Collect the segments of `root` and all its descendants.
///
/// Every element composes its own `transform` onto the matrix it inherits,
/// whether or not the policy skips it, and children see only their
/// ancestors' transforms. Fails on the first unparseable numeric attribute.
pub fn collect_segments<P>(
    root: &Element,
    initial: &AffineMatrix,
    policy: &P,
) -> Result<Vec<Segment>>
where
    P: IgnorePolicy + ?Sized,
{
    let mut segments = Vec::new();
    walk(root, initial, policy, &mut segments)?;
    Ok(segments)
}

fn walk<P>(
    element: &Element,
    inherited: &AffineMatrix,
    policy: &P,
    out: &mut Vec<Segment>,
) -> Result<()>
where
    P: IgnorePolicy + ?Sized,
{
    let matrix = match element.attribute("transform") {
        Some(text) => compose(inherited, &parse_transform(text)),
        None => *inherited,
    };

    if policy.should_ignore(element) {
        tracing::trace!(tag = %element.tag, "element ignored by policy");
    } else {
        let before = out.len();
        lower(element, &matrix, out)?;
        if out.len() > before {
            tracing::trace!(tag = %element.tag, segments = out.len() - before, "element lowered");
        }
    }

    for child in &element.children {
        walk(child, &matrix, policy, out)?;
    }
    Ok(())
}

/// Append the segments of a single element
fn lower(element: &Element, matrix: &AffineMatrix, out: &mut Vec<Segment>) -> Result<()> {
    let n = |name: &str| element.number(name);

    match element.kind() {
        ShapeKind::Path => {
            if let Some(data) = element.attribute("d") {
                out.extend(parse_path(data).iter().map(|s| s.transformed(matrix)));
            }
        }
        ShapeKind::Line => {
            out.extend(shapes::line(n("x1")?, n("y1")?, n("x2")?, n("y2")?, matrix));
        }
        ShapeKind::Rect => {
            out.extend(shapes::rect(n("x")?, n("y")?, n("width")?, n("height")?, matrix));
        }
        ShapeKind::Polygon => {
            let coords = numbers(element.attribute("points").unwrap_or(""));
            out.extend(shapes::polygon(&coords, matrix));
        }
        ShapeKind::Polyline => {
            let coords = numbers(element.attribute("points").unwrap_or(""));
            out.extend(shapes::polyline(&coords, matrix));
        }
        ShapeKind::Circle => {
            out.extend(shapes::circle(n("cx")?, n("cy")?, n("r")?, matrix));
        }
        ShapeKind::Ellipse => {
            out.extend(shapes::ellipse(n("cx")?, n("cy")?, n("rx")?, n("ry")?, matrix));
        }
        ShapeKind::Other => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::policy::{KeepAll, LayerFilter};
    use formwork_geometry::Point;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Element {
        Element::new("rect")
            .with_attribute("x", x.to_string())
            .with_attribute("y", y.to_string())
            .with_attribute("width", w.to_string())
            .with_attribute("height", h.to_string())
    }

    #[test]
    fn test_nested_transforms_accumulate() {
        let tree = Element::new("svg").with_child(
            Element::new("g")
                .with_attribute("transform", "translate(100 0)")
                .with_child(
                    Element::new("g")
                        .with_attribute("transform", "scale(2)")
                        .with_child(rect(1.0, 1.0, 1.0, 1.0)),
                ),
        );
        let segments = collect_segments(&tree, &AffineMatrix::IDENTITY, &KeepAll).unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].start, Point::new(102.0, 2.0));
    }

    #[test]
    fn test_sibling_transform_does_not_leak() {
        let tree = Element::new("g")
            .with_child(rect(0.0, 0.0, 1.0, 1.0).with_attribute("transform", "translate(50 50)"))
            .with_child(rect(0.0, 0.0, 1.0, 1.0));
        let segments = collect_segments(&tree, &AffineMatrix::IDENTITY, &KeepAll).unwrap();
        assert_eq!(segments[0].start, Point::new(50.0, 50.0));
        assert_eq!(segments[4].start, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_initial_matrix_applies() {
        let tree = Element::new("line")
            .with_attribute("x1", "10")
            .with_attribute("y1", "10")
            .with_attribute("x2", "20");
        let origin = AffineMatrix::translate(-10.0, -10.0);
        let segments = collect_segments(&tree, &origin, &KeepAll).unwrap();
        assert_eq!(segments[0].start, Point::new(0.0, 0.0));
        assert_eq!(segments[0].end, Point::new(10.0, -10.0));
    }

    #[test]
    fn test_ignore_is_per_element() {
        // A skipped group still passes its transform down
        let tree = Element::new("g")
            .with_attribute("id", "dimensions")
            .with_attribute("transform", "translate(5 0)")
            .with_child(rect(0.0, 0.0, 10.0, 10.0))
            .with_child(
                Element::new("line")
                    .with_attribute("x2", "10")
                    .with_attribute("stroke-dasharray", "2,2"),
            );
        let segments =
            collect_segments(&tree, &AffineMatrix::IDENTITY, &LayerFilter::default()).unwrap();
        assert_eq!(segments.len(), 4);
        assert_eq!(segments[0].start, Point::new(5.0, 0.0));
    }

    #[test]
    fn test_closure_policy() {
        let tree = Element::new("g")
            .with_child(rect(0.0, 0.0, 10.0, 10.0))
            .with_child(Element::new("circle").with_attribute("r", "5"));
        let skip_rects = |el: &Element| el.kind() == ShapeKind::Rect;
        let segments = collect_segments(&tree, &AffineMatrix::IDENTITY, &skip_rects).unwrap();
        assert_eq!(segments.len(), 16);
    }

    #[test]
    fn test_all_primitives_dispatch() {
        let tree = Element::new("svg")
            .with_child(Element::new("path").with_attribute("d", "M0 0 L10 0 L10 10 Z"))
            .with_child(Element::new("polygon").with_attribute("points", "0,0 5,0 5,5"))
            .with_child(Element::new("polyline").with_attribute("points", "0,0 5,0 5,5"))
            .with_child(
                Element::new("ellipse")
                    .with_attribute("rx", "4")
                    .with_attribute("ry", "2"),
            )
            .with_child(Element::new("text").with_attribute("x", "1"));
        let segments = collect_segments(&tree, &AffineMatrix::IDENTITY, &KeepAll).unwrap();
        assert_eq!(segments.len(), 3 + 3 + 2 + 16);
    }

    #[test]
    fn test_path_truncation_keeps_prefix() {
        let tree = Element::new("path").with_attribute("d", "M0,0 L10,0 L10");
        let segments = collect_segments(&tree, &AffineMatrix::IDENTITY, &KeepAll).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_invalid_number_fails() {
        let tree = Element::new("g").with_child(Element::new("circle").with_attribute("r", "big"));
        let err = collect_segments(&tree, &AffineMatrix::IDENTITY, &KeepAll).unwrap_err();
        assert!(matches!(err, Error::InvalidAttribute { .. }));
    }
}
