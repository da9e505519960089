use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::Rectangle;

/// Reasons a caller-supplied rectangle is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("request carries neither a rectangle nor labels")]
    NoCriteria,

    #[error("outer ring has {0} points, a rectangle needs 5")]
    TooFewPoints(usize),

    #[error("point {0} does not have a longitude and a latitude")]
    MalformedPoint(usize),

    #[error("ring corners are not axis-aligned")]
    NotAxisAligned,

    #[error("longitude span {0}° must be below 180°")]
    SpanTooWide(f64),

    #[error("corner ({lng}, {lat}) lies outside [-180,180]x[-90,90]")]
    OutOfRange { lng: f64, lat: f64 },

    #[error("outer ring is not closed")]
    RingNotClosed,
}

/// GeoJSON-shaped polygon as it arrives over the wire: `{"type": "Polygon", "coordinates": [[[lng, lat], ...]]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type", default = "polygon_type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<Vec<Vec<f64>>>,
}

fn polygon_type() -> String { "Polygon".into() }

impl RawGeometry {
    pub fn polygon(outer: Vec<Vec<f64>>) -> Self {
        Self { kind: polygon_type(), coordinates: vec![outer] }
    }

    /// Rectangle from west/south/east/north bounds, as a closed ring.
    pub fn from_bounds(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self::polygon(vec![
            vec![west, north],
            vec![east, north],
            vec![east, south],
            vec![west, south],
            vec![west, north],
        ])
    }

    /// True if no ring was supplied at all.
    #[inline] pub fn is_empty(&self) -> bool { self.coordinates.is_empty() }

    /// Parse the outer ring into coordinates, or `None` if there is no ring.
    pub fn outer_ring(&self) -> Result<Option<Vec<Coord<f64>>>, GeometryError> {
        let Some(outer) = self.coordinates.first() else { return Ok(None) };
        outer.iter().enumerate()
            .map(|(i, point)| match point.as_slice() {
                [x, y, ..] if x.is_finite() && y.is_finite() => Ok(Coord { x: *x, y: *y }),
                _ => Err(GeometryError::MalformedPoint(i)),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

/// Validate the optional query rectangle of a request.
///
/// Returns `Ok(None)` for a pure label query (no rectangle but labels present) and
/// the normalized rectangle otherwise.
pub fn validate(raw: Option<&RawGeometry>, has_labels: bool) -> Result<Option<Rectangle>, GeometryError> {
    let ring = match raw {
        Some(raw) => raw.outer_ring()?,
        None => None,
    };

    match ring {
        None if has_labels => Ok(None),
        None => Err(GeometryError::NoCriteria),
        Some(points) if points.len() < 5 => Err(GeometryError::TooFewPoints(points.len())),
        Some(points) => Rectangle::try_from_ring(&points).map(Some),
    }
}
