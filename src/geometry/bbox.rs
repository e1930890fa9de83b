use geo::Rect;
use rstar::{RTreeObject, AABB};

/// A bounding box in an R-tree, associated with a drawn shape by index.
#[derive(Debug, Clone)]
pub(super) struct BoundingBox {
    idx: usize, // Index of corresponding shape in the index's shape list
    bbox: Rect<f64>,
}

impl BoundingBox {
    pub(super) fn new(idx: usize, bbox: Rect<f64>) -> Self {
        Self { idx, bbox }
    }

    /// Grow the box by `pad` on every side.
    pub(super) fn padded(idx: usize, bbox: Rect<f64>, pad: f64) -> Self {
        let (min, max) = (bbox.min(), bbox.max());
        Self::new(idx, Rect::new((min.x - pad, min.y - pad), (max.x + pad, max.y + pad)))
    }

    /// Get the index of the corresponding shape.
    pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for BoundingBox {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.bbox.min().into(), self.bbox.max().into())
    }
}
