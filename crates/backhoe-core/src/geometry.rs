//! Clipping of projected shapes to axis-aligned boxes.
//!
//! Shapes are `geo` types in `f64`: `x`/`y` are longitude/latitude before
//! projection and pixels after.

use geo::{BooleanOps, BoundingRect, Intersects};

pub use geo::{Coord, LineString, MultiLineString, MultiPolygon, Polygon, Rect};

/// `inner` lies in `outer`, edges included.
fn within(inner: &Rect, outer: &Rect) -> bool {
    let (a, b) = (inner.min(), inner.max());
    let (lo, hi) = (outer.min(), outer.max());
    a.x >= lo.x && a.y >= lo.y && b.x <= hi.x && b.y <= hi.y
}

/// The parts of `polygon` inside `rect`.
///
/// Polygons wholly inside come back unchanged, disjoint ones as nothing.
/// Only the rest goes through the boolean intersection.
#[must_use]
pub fn clip_polygon(polygon: &Polygon, rect: &Rect) -> MultiPolygon {
    let Some(bounds) = polygon.bounding_rect() else {
        return MultiPolygon::new(Vec::new());
    };
    if within(&bounds, rect) {
        return MultiPolygon::new(vec![polygon.clone()]);
    }
    if !bounds.intersects(rect) {
        return MultiPolygon::new(Vec::new());
    }
    polygon.intersection(&rect.to_polygon())
}

/// The pieces of `line` inside `rect`. A line that leaves and re-enters
/// comes back split.
#[must_use]
pub fn clip_line(line: &LineString, rect: &Rect) -> Vec<LineString> {
    let Some(bounds) = line.bounding_rect() else {
        return Vec::new();
    };
    if within(&bounds, rect) {
        return vec![line.clone()];
    }
    if !bounds.intersects(rect) {
        return Vec::new();
    }
    rect.to_polygon()
        .clip(&MultiLineString::new(vec![line.clone()]), false)
        .0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use geo::Area;

    use super::*;

    fn square(min: f64, max: f64) -> Polygon {
        Polygon::new(
            LineString::from(vec![[min, min], [max, min], [max, max], [min, max], [min, min]]),
            Vec::new(),
        )
    }

    fn unit_box() -> Rect {
        Rect::new([0.0, 0.0], [10.0, 10.0])
    }

    fn inside(c: Coord, rect: &Rect) -> bool {
        let eps = 1e-9;
        c.x >= rect.min().x - eps
            && c.x <= rect.max().x + eps
            && c.y >= rect.min().y - eps
            && c.y <= rect.max().y + eps
    }

    #[test]
    fn polygon_inside_is_unchanged() {
        let polygon = square(2.0, 4.0);
        let clipped = clip_polygon(&polygon, &unit_box());
        assert_eq!(clipped.0, vec![polygon]);
    }

    #[test]
    fn polygon_outside_is_dropped() {
        assert!(clip_polygon(&square(20.0, 30.0), &unit_box()).0.is_empty());
    }

    #[test]
    fn overlapping_polygon_is_cut_to_rect() {
        let clipped = clip_polygon(&square(5.0, 15.0), &unit_box());
        assert!((clipped.unsigned_area() - 25.0).abs() < 1e-6);
        let bounds = clipped.bounding_rect().unwrap();
        assert!(within(&bounds, &unit_box()));
    }

    #[test]
    fn hole_survives_clipping() {
        let polygon = Polygon::new(
            LineString::from(vec![[-5.0, -5.0], [8.0, -5.0], [8.0, 8.0], [-5.0, 8.0]]),
            vec![LineString::from(vec![[2.0, 2.0], [4.0, 2.0], [4.0, 4.0], [2.0, 4.0]])],
        );
        let clipped = clip_polygon(&polygon, &unit_box());
        assert!((clipped.unsigned_area() - (64.0 - 4.0)).abs() < 1e-6);
    }

    #[test]
    fn line_leaving_and_reentering_is_split() {
        let line = LineString::from(vec![[-5.0, 5.0], [15.0, 5.0], [15.0, 8.0], [-5.0, 8.0]]);
        let pieces = clip_line(&line, &unit_box());
        assert_eq!(pieces.len(), 2);
        for piece in &pieces {
            assert!(piece.coords().all(|&c| inside(c, &unit_box())));
        }
    }

    #[test]
    fn line_outside_is_dropped() {
        let line = LineString::from(vec![[20.0, 20.0], [30.0, 30.0]]);
        assert!(clip_line(&line, &unit_box()).is_empty());
        assert!(clip_line(&LineString::new(Vec::new()), &unit_box()).is_empty());
    }
}
