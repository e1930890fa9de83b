use geo::{Point, Rect};
use serde::Serialize;

use crate::{
    geometry::{normalize_point, normalize_polygon},
    property::Property,
};

/// Zoom used when framing a single point.
const POINT_ZOOM: u8 = 18;

/// Extent thresholds (degrees, largest side) and the zoom each band uses.
/// Extents above the first threshold let the map choose its own zoom.
const ZOOM_BANDS: [(f64, Option<u8>); 4] = [
    (0.1, None),
    (0.05, Some(13)),
    (0.01, Some(15)),
    (0.005, Some(16)),
];
const MIN_ZOOM_BAND: u8 = 17;

/// What the map should frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Target {
    Extent(Rect<f64>),
    Point(Point<f64>),
}

/// A camera move: target plus optional zoom level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitTarget {
    pub target: Target,
    pub zoom: Option<u8>,
}

/// Frame a record: the extent of its first drawable polygon, else its point.
/// `None` if the record has neither.
pub fn compute_target(property: &Property) -> Option<FitTarget> {
    if let Some(extent) = normalize_polygon(&property.geometry_coordinates).first().and_then(|set| set.bounds()) {
        return Some(FitTarget { target: Target::Extent(extent), zoom: zoom_for_extent(&extent) });
    }

    normalize_point(&property.coord_point)
        .map(|point| FitTarget { target: Target::Point(point), zoom: Some(POINT_ZOOM) })
}

fn zoom_for_extent(extent: &Rect<f64>) -> Option<u8> {
    let size = extent.width().max(extent.height());
    ZOOM_BANDS.iter()
        .find(|(threshold, _)| size > *threshold)
        .map_or(Some(MIN_ZOOM_BAND), |(_, zoom)| *zoom)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn square(size: f64) -> Property {
        Property::new().with("geometry_coordinates", json!([[[49.0, 40.0], [49.0 + size, 40.0], [49.0 + size, 40.0 + size / 2.0]]]))
    }

    #[test]
    fn zoom_bands() {
        assert_eq!(compute_target(&square(0.02)).unwrap().zoom, Some(15));
        assert_eq!(compute_target(&square(0.2)).unwrap().zoom, None);
        assert_eq!(compute_target(&square(0.07)).unwrap().zoom, Some(13));
        assert_eq!(compute_target(&square(0.007)).unwrap().zoom, Some(16));
        assert_eq!(compute_target(&square(0.001)).unwrap().zoom, Some(17));
    }

    #[test]
    fn extent_covers_polygon() {
        let fit = compute_target(&square(0.02)).unwrap();
        let Target::Extent(rect) = fit.target else { panic!("expected extent") };
        assert!((rect.width() - 0.02).abs() < 1e-9);
        assert!((rect.height() - 0.01).abs() < 1e-9);
    }

    #[test]
    fn point_gets_close_zoom() {
        let p = Property::new().with("coord_point", json!([49.86, 40.4]));
        assert_eq!(compute_target(&p), Some(FitTarget { target: Target::Point(Point::new(49.86, 40.4)), zoom: Some(18) }));
    }

    #[test]
    fn degenerate_polygon_falls_back_to_point() {
        let p = Property::new()
            .with("geometry_coordinates", json!([[[0.0, 0.0], [1.0, 1.0]]]))
            .with("coord_point", "49.86 40.4");
        assert!(matches!(compute_target(&p), Some(FitTarget { target: Target::Point(_), .. })));
    }

    #[test]
    fn nothing_to_frame() {
        assert_eq!(compute_target(&Property::new().with("owner", "A")), None);
    }
}
