//! Geometry to SVG path conversion.

use geo::{Coord, CoordsIter, LineString, MultiPolygon, Rect};

/// Linear map from source coordinates to SVG canvas coordinates (Y down).
/// Works for lon/lat and for projected metric systems such as PUWG 1992 alike.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projection {
    bounds: Rect<f64>,
    margin: f64,
    scale: f64,
}

impl Projection {
    /// Fit `bounds` into a canvas `width` pixels wide, keeping the aspect ratio.
    pub(crate) fn fit(bounds: Rect<f64>, width: f64, margin: f64) -> Self {
        let span = bounds.width().max(bounds.height()).max(f64::EPSILON);
        let scale = if bounds.width() > 0.0 {
            (width - 2.0 * margin) / bounds.width()
        } else {
            (width - 2.0 * margin) / span
        };
        Self { bounds, margin, scale }
    }

    /// Canvas height implied by the bounds and scale.
    pub(crate) fn height(&self) -> f64 {
        self.bounds.height() * self.scale + 2.0 * self.margin
    }

    pub(crate) fn apply(&self, coord: &Coord<f64>) -> (f64, f64) {
        let x = self.margin + (coord.x - self.bounds.min().x) * self.scale;
        let y = self.margin + (self.bounds.max().y - coord.y) * self.scale; // invert vertically
        (x, y)
    }
}

/// Build a compact SVG path string for a MultiPolygon (exteriors + holes).
pub(crate) fn multipolygon_to_path(shape: &MultiPolygon<f64>, project: &Projection) -> String {
    let mut out = String::new();

    for polygon in &shape.0 {
        ring_to_path(polygon.exterior(), project, &mut out);
        for interior in polygon.interiors() {
            ring_to_path(interior, project, &mut out);
        }
    }

    out
}

/// Append a ring as an SVG subpath: "M x,y L x,y ... Z"
fn ring_to_path(ring: &LineString<f64>, project: &Projection, out: &mut String) {
    let mut coords = ring.coords_iter()
        .map(|coord| project.apply(&coord));
    if let Some((x, y)) = coords.next() {
        out.push_str(&format!(" M{x:.3},{y:.3}"));
        for (x, y) in coords {
            out.push_str(&format!(" L{x:.3},{y:.3}"));
        }
        out.push('Z');
    }
}

#[cfg(test)]
mod tests {
    use geo::{coord, polygon};

    use super::*;

    #[test]
    fn projection_inverts_y_and_keeps_aspect() {
        let bounds = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 10.0, y: 5.0 });
        let project = Projection::fit(bounds, 120.0, 10.0);
        assert_eq!(project.apply(&coord! { x: 0.0, y: 5.0 }), (10.0, 10.0));
        assert_eq!(project.apply(&coord! { x: 10.0, y: 0.0 }), (110.0, 60.0));
        assert_eq!(project.height(), 70.0);
    }

    #[test]
    fn path_has_one_subpath_per_ring() {
        let shape = MultiPolygon(vec![polygon!(
            exterior: [(x: 0.0, y: 0.0), (x: 4.0, y: 0.0), (x: 4.0, y: 4.0), (x: 0.0, y: 0.0)],
            interiors: [[(x: 1.0, y: 1.0), (x: 2.0, y: 1.0), (x: 2.0, y: 2.0), (x: 1.0, y: 1.0)]],
        )]);
        let bounds = Rect::new(coord! { x: 0.0, y: 0.0 }, coord! { x: 4.0, y: 4.0 });
        let path = multipolygon_to_path(&shape, &Projection::fit(bounds, 100.0, 0.0));
        assert_eq!(path.matches('M').count(), 2);
        assert_eq!(path.matches('Z').count(), 2);
        assert!(path.starts_with(" M0.000,100.000"));
    }
}
