use geo::Point;
use rstar::{AABB, RTree};

use super::{Shape, bbox::BoundingBox};

/// Spatial index over drawn shapes, answering "which record was clicked".
pub struct ShapeIndex {
    shapes: Vec<(usize, Shape)>, // (source index, shape)
    rtree: RTree<BoundingBox>,
    tolerance: f64,
}

impl Default for ShapeIndex {
    fn default() -> Self { Self::new(Vec::new(), 0.0) }
}

impl ShapeIndex {
    /// Bulk-load the index. Points get a square of half-size `tolerance`.
    pub fn new(shapes: Vec<(usize, Shape)>, tolerance: f64) -> Self {
        let boxes = shapes.iter().enumerate()
            .filter_map(|(i, (_, shape))| {
                let pad = if shape.is_point() { tolerance } else { 0.0 };
                shape.bounds().map(|rect| BoundingBox::padded(i, rect, pad))
            })
            .collect();

        Self { shapes, rtree: RTree::bulk_load(boxes), tolerance }
    }

    #[inline] pub fn len(&self) -> usize { self.shapes.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Source index of the topmost (last drawn) shape under `(lon, lat)`.
    pub fn hit(&self, lon: f64, lat: f64) -> Option<usize> {
        let point = Point::new(lon, lat);
        let envelope = AABB::from_point([lon, lat]);

        let mut candidates: Vec<usize> = self.rtree
            .locate_in_envelope_intersecting(&envelope)
            .map(|bbox| bbox.idx())
            .collect();
        candidates.sort_unstable_by(|a, b| b.cmp(a));

        candidates.into_iter()
            .find(|&i| match &self.shapes[i].1 {
                Shape::Polygon(set) => set.contains(point),
                Shape::Point(p) => (p.x() - lon).abs() <= self.tolerance && (p.y() - lat).abs() <= self.tolerance,
            })
            .map(|i| self.shapes[i].0)
    }
}
