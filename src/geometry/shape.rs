use geo::{BoundingRect, Contains, Coord, LineString, Point, Polygon, Rect};
use serde::Serialize;

/// One renderable polygon: a set of closed rings (outer boundaries and holes).
///
/// Every ring has at least three positions plus the closing one, and its
/// positions do not all lie on one line. A `PolygonSet` is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonSet {
    rings: Vec<LineString<f64>>,
}

impl PolygonSet {
    /// Wrap already-validated rings; `None` if there are none.
    pub(crate) fn new(rings: Vec<LineString<f64>>) -> Option<Self> {
        (!rings.is_empty()).then_some(Self { rings })
    }

    /// Get the rings of this polygon.
    #[inline] pub fn rings(&self) -> &[LineString<f64>] { &self.rings }

    /// Bounding rectangle over all rings.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.rings.iter()
            .filter_map(|ring| ring.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                }
            ))
    }

    /// Even-odd containment: a point inside an odd number of rings is inside the polygon.
    /// Rings arrive as a flat list, so holes are not tagged explicitly.
    pub fn contains(&self, point: Point<f64>) -> bool {
        let inside = self.rings.iter()
            .filter(|ring| Polygon::new((*ring).clone(), vec![]).contains(&point))
            .count();
        inside % 2 == 1
    }
}

/// A normalized, renderable geometry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    Point(Point<f64>),
    Polygon(PolygonSet),
}

impl Shape {
    /// Bounding rectangle; degenerate (zero-size) for points.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        match self {
            Shape::Point(p) => Some(Rect::new(p.0, p.0)),
            Shape::Polygon(set) => set.bounds(),
        }
    }

    #[inline] pub fn is_point(&self) -> bool { matches!(self, Shape::Point(_)) }
}
