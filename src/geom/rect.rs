use geo::{Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

use crate::geom::{GeometryError, RawGeometry};

/// Exclusive upper bound on a rectangle's longitude span, in degrees.
pub const MAX_LNG_SPAN: f64 = 180.0;

/// Axis-aligned rectangle in lon/lat degrees, kept as a closed ring UL → UR → LR → LL → UL.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "RawGeometry", try_from = "RawGeometry")]
pub struct Rectangle {
    ring: [Coord<f64>; 5],
}

impl Rectangle {
    /// Build the closed ring spanned by an upper-left and a lower-right corner.
    /// The other corners are UR = (lr.x, ul.y) and LL = (ul.x, lr.y).
    pub fn from_corners(ul: Coord<f64>, lr: Coord<f64>) -> Self {
        let ur = Coord { x: lr.x, y: ul.y };
        let ll = Coord { x: ul.x, y: lr.y };
        Self { ring: [ul, ur, lr, ll, ul] }
    }

    /// Check a caller-supplied outer ring and convert it to a rectangle.
    ///
    /// Checks run in a fixed order: point count, axis alignment, longitude span,
    /// coordinate range, ring closure. The first failing check is reported.
    pub fn try_from_ring(points: &[Coord<f64>]) -> Result<Self, GeometryError> {
        if points.len() < 5 {
            return Err(GeometryError::TooFewPoints(points.len()))
        }

        let (ul, ur, lr, ll) = (points[0], points[1], points[2], points[3]);

        if ul.x != ll.x || ur.x != lr.x || ul.y != ur.y || ll.y != lr.y {
            return Err(GeometryError::NotAxisAligned)
        }

        let span = lr.x - ul.x;
        if span >= MAX_LNG_SPAN {
            return Err(GeometryError::SpanTooWide(span))
        }

        if let Some(&corner) = [ul, ur, lr, ll].iter().find(|c| !in_range(c)) {
            return Err(GeometryError::OutOfRange { lng: corner.x, lat: corner.y })
        }

        if points[4] != ul {
            return Err(GeometryError::RingNotClosed)
        }

        Ok(Self::from_corners(ul, lr))
    }

    #[inline] pub fn ul(&self) -> Coord<f64> { self.ring[0] }
    #[inline] pub fn ur(&self) -> Coord<f64> { self.ring[1] }
    #[inline] pub fn lr(&self) -> Coord<f64> { self.ring[2] }
    #[inline] pub fn ll(&self) -> Coord<f64> { self.ring[3] }

    /// The closed five-point ring.
    #[inline] pub fn ring(&self) -> &[Coord<f64>; 5] { &self.ring }

    /// First ring vertex, used as a patch's reported position.
    #[inline] pub fn anchor(&self) -> Coord<f64> { self.ring[0] }

    /// Min/max envelope (corner order normalized).
    #[inline] pub fn envelope(&self) -> Rect<f64> { Rect::new(self.ul(), self.lr()) }

    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(LineString::from(self.ring.to_vec()), vec![])
    }
}

#[inline]
fn in_range(coord: &Coord<f64>) -> bool {
    (-180.0..=180.0).contains(&coord.x) && (-90.0..=90.0).contains(&coord.y)
}

impl From<Rectangle> for RawGeometry {
    fn from(rect: Rectangle) -> Self {
        RawGeometry::polygon(rect.ring.iter().map(|c| vec![c.x, c.y]).collect())
    }
}

impl TryFrom<RawGeometry> for Rectangle {
    type Error = GeometryError;

    fn try_from(raw: RawGeometry) -> Result<Self, Self::Error> {
        Rectangle::try_from_ring(&raw.outer_ring()?.ok_or(GeometryError::TooFewPoints(0))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Vec<Coord<f64>> {
        points.iter().map(|&(x, y)| Coord { x, y }).collect()
    }

    #[test]
    fn accepts_closed_axis_aligned_ring() {
        let rect = Rectangle::try_from_ring(&ring(&[
            (-180.0, 10.0), (-90.0, 10.0), (-90.0, 0.0), (-180.0, 0.0), (-180.0, 10.0),
        ])).unwrap();
        assert_eq!(rect.ul(), Coord { x: -180.0, y: 10.0 });
        assert_eq!(rect.lr(), Coord { x: -90.0, y: 0.0 });
        assert_eq!(rect.ring()[4], rect.ring()[0]);
    }

    #[test]
    fn rejects_unclosed_ring() {
        let result = Rectangle::try_from_ring(&ring(&[
            (-180.0, 10.0), (-90.0, 10.0), (-90.0, 0.0), (-180.0, 0.0), (-180.0, 0.01),
        ]));
        assert_eq!(result, Err(GeometryError::RingNotClosed));
    }

    #[test]
    fn rejects_short_ring() {
        let result = Rectangle::try_from_ring(&ring(&[(0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]));
        assert_eq!(result, Err(GeometryError::TooFewPoints(4)));
    }

    #[test]
    fn rejects_skewed_ring() {
        let result = Rectangle::try_from_ring(&ring(&[
            (0.0, 1.0), (1.0, 1.5), (1.0, 0.0), (0.0, 0.0), (0.0, 1.0),
        ]));
        assert_eq!(result, Err(GeometryError::NotAxisAligned));
    }

    #[test]
    fn rejects_hemisphere_span() {
        let result = Rectangle::try_from_ring(&ring(&[
            (-90.0, 10.0), (90.0, 10.0), (90.0, 0.0), (-90.0, 0.0), (-90.0, 10.0),
        ]));
        assert_eq!(result, Err(GeometryError::SpanTooWide(180.0)));

        let just_under = Rectangle::try_from_ring(&ring(&[
            (-90.0, 10.0), (89.5, 10.0), (89.5, 0.0), (-90.0, 0.0), (-90.0, 10.0),
        ]));
        assert!(just_under.is_ok());
    }

    #[test]
    fn rejects_out_of_range_corner() {
        let result = Rectangle::try_from_ring(&ring(&[
            (10.0, 95.0), (20.0, 95.0), (20.0, 80.0), (10.0, 80.0), (10.0, 95.0),
        ]));
        assert_eq!(result, Err(GeometryError::OutOfRange { lng: 10.0, lat: 95.0 }));
    }

    #[test]
    fn from_corners_builds_closed_ring() {
        let rect = Rectangle::from_corners(Coord { x: 7.0, y: 52.0 }, Coord { x: 8.0, y: 51.0 });
        assert_eq!(rect.ur(), Coord { x: 8.0, y: 52.0 });
        assert_eq!(rect.ll(), Coord { x: 7.0, y: 51.0 });
        assert_eq!(rect.anchor(), rect.ul());
        assert_eq!(rect.envelope().min(), Coord { x: 7.0, y: 51.0 });
        assert_eq!(rect.envelope().max(), Coord { x: 8.0, y: 52.0 });
    }

    #[test]
    fn serializes_as_geojson_polygon() {
        let rect = Rectangle::from_corners(Coord { x: 1.0, y: 2.0 }, Coord { x: 3.0, y: 0.0 });
        let json = serde_json::to_value(rect).unwrap();
        assert_eq!(json["type"], "Polygon");
        assert_eq!(json["coordinates"][0].as_array().unwrap().len(), 5);
        assert_eq!(serde_json::from_value::<Rectangle>(json).unwrap(), rect);
    }
}
