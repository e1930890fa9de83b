use std::sync::LazyLock;

use geo::{Coord, LineString, Point};
use regex::Regex;
use serde_json::Value;

use crate::property::Property;
use super::{PolygonSet, Shape};

/// Signed decimal numbers embedded in free text, e.g. `"POINT(49.86 40.40)"`.
static NUMBERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-?\d+(?:\.\d+)?").expect("valid number regex")
});

/// Nesting class of a structured `geometry_coordinates` value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawGeometry<'a> {
    /// `[[[[lon, lat], ...], ...], ...]`: polygons, each a list of rings.
    MultiPolygon(&'a [Value]),
    /// `[[[lon, lat], ...], ...]`: a list of rings.
    Polygon(&'a [Value]),
    /// `[[lon, lat], ...]`: a single bare ring.
    Ring(&'a [Value]),
}

/// Classify a structured coordinate array by looking at its first element.
///
/// Returns `None` for non-arrays and empty arrays. Only the first element is
/// inspected, so `raw[0][0][0]` being an array means multipolygon and
/// `raw[0][0]` being an array means polygon; anything else is a bare ring.
pub fn classify(raw: &Value) -> Option<RawGeometry<'_>> {
    let Value::Array(items) = raw else { return None };
    let first = items.first()?;

    let first_first = first.get(0);
    if first_first.and_then(|v| v.get(0)).is_some_and(Value::is_array) {
        Some(RawGeometry::MultiPolygon(items))
    } else if first_first.is_some_and(Value::is_array) {
        Some(RawGeometry::Polygon(items))
    } else {
        Some(RawGeometry::Ring(items))
    }
}

/// Parse a point from `[lon, lat]` or from the first two numbers in a string.
pub fn normalize_point(raw: &Value) -> Option<Point<f64>> {
    let (lon, lat) = match raw {
        Value::Array(items) if items.len() == 2 => (scalar(&items[0])?, scalar(&items[1])?),
        Value::String(s) => {
            let mut nums = numbers(s);
            (nums.next()?, nums.next()?)
        }
        _ => return None,
    };

    (lon.is_finite() && lat.is_finite()).then(|| Point::new(lon, lat))
}

/// Parse polygon geometry into renderable polygon sets.
///
/// A multipolygon yields one set per inner polygon that keeps at least one
/// valid ring; a polygon, bare ring or numeric string yields at most one.
/// An empty result means the record has no drawable polygon.
pub fn normalize_polygon(raw: &Value) -> Vec<PolygonSet> {
    if let Value::String(s) = raw {
        return flat_ring(s)
            .and_then(|ring| PolygonSet::new(vec![ring]))
            .into_iter()
            .collect();
    }

    match classify(raw) {
        Some(RawGeometry::MultiPolygon(polygons)) => polygons.iter()
            .filter_map(|polygon| match polygon {
                Value::Array(rings) if !rings.is_empty() => polygon_set(rings),
                _ => None,
            })
            .collect(),
        Some(RawGeometry::Polygon(rings)) => polygon_set(rings).into_iter().collect(),
        Some(RawGeometry::Ring(coords)) => finish_ring(clean_coords(coords))
            .and_then(|ring| PolygonSet::new(vec![ring]))
            .into_iter()
            .collect(),
        None => Vec::new(),
    }
}

/// All drawable shapes of a record: its polygons, or else its point.
pub fn normalize_property(property: &Property) -> Vec<Shape> {
    let polygons = normalize_polygon(&property.geometry_coordinates);
    if !polygons.is_empty() {
        return polygons.into_iter().map(Shape::Polygon).collect();
    }
    normalize_point(&property.coord_point)
        .map(Shape::Point)
        .into_iter()
        .collect()
}

/// Build one polygon set from a list of raw rings.
fn polygon_set(rings: &[Value]) -> Option<PolygonSet> {
    let rings = rings.iter()
        .filter_map(|ring| match ring {
            Value::Array(coords) if !coords.is_empty() => finish_ring(clean_coords(coords)),
            _ => None,
        })
        .collect();
    PolygonSet::new(rings)
}

/// Keep only positions that are exactly two non-null numbers.
fn clean_coords(coords: &[Value]) -> Vec<Coord<f64>> {
    coords.iter()
        .filter_map(|coord| match coord {
            Value::Array(pair) if pair.len() == 2 => Some(Coord { x: pair[0].as_f64()?, y: pair[1].as_f64()? }),
            _ => None,
        })
        .filter(|c| c.x.is_finite() && c.y.is_finite())
        .collect()
}

/// Validate and close a ring: at least three positions, not all on one line.
fn finish_ring(mut coords: Vec<Coord<f64>>) -> Option<LineString<f64>> {
    if coords.len() < 3 || is_collinear(&coords) { return None }

    if coords[0] != coords[coords.len() - 1] {
        coords.push(coords[0]);
    }

    Some(LineString(coords))
}

/// Relative tolerance for collinearity, as a fraction of the ring's extent.
const COLLINEAR_EPS: f64 = 1e-9;

/// True when every position lies on one line (repeated points included),
/// within a tolerance scaled to the ring's size.
fn is_collinear(coords: &[Coord<f64>]) -> bool {
    let origin = coords[0];
    let dist = |c: &Coord<f64>| (c.x - origin.x).hypot(c.y - origin.y);

    let Some(far) = coords.iter().copied().max_by(|a, b| dist(a).total_cmp(&dist(b))) else { return true };
    let span = dist(&far);
    if span == 0.0 { return true }

    let axis = far - origin;
    coords.iter().all(|&c| {
        let v = c - origin;
        // |axis × v| / |axis| is the distance of `c` from the line
        (axis.x * v.y - axis.y * v.x).abs() / span <= COLLINEAR_EPS * span
    })
}

/// Rebuild a single ring from a flat stream of numbers paired in order.
fn flat_ring(s: &str) -> Option<LineString<f64>> {
    let nums: Vec<f64> = numbers(s).collect();
    if nums.len() < 6 { return None }

    let coords = nums.chunks_exact(2)
        .map(|pair| Coord { x: pair[0], y: pair[1] })
        .collect();
    finish_ring(coords)
}

fn numbers(s: &str) -> impl Iterator<Item = f64> + '_ {
    NUMBERS.find_iter(s).filter_map(|m| m.as_str().parse::<f64>().ok())
}

/// A coordinate component: a JSON number or a numeric string.
fn scalar(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
