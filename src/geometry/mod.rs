mod bbox;
mod index;
mod normalize;
mod shape;

pub use index::ShapeIndex;
pub use normalize::{RawGeometry, classify, normalize_point, normalize_polygon, normalize_property};
pub use shape::{PolygonSet, Shape};
