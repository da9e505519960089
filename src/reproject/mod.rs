mod crs;

use std::collections::hash_map::Entry;

use ahash::AHashMap;
use geo::Coord;
use proj4rs::{proj::Proj, transform::transform};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geom::Rectangle;

pub use crs::{WEB_MERCATOR, WGS84};

/// Decimal places kept on reprojected coordinates.
pub const ROUND_DIGITS: i32 = 13;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReprojectError {
    #[error("projection descriptor is too short to carry an authority code ({0} characters)")]
    DescriptorTooShort(usize),

    #[error("authority code {0:?} is not numeric")]
    InvalidAuthorityCode(String),

    #[error("EPSG:{0} is not a supported source reference system")]
    UnsupportedCrs(u32),

    #[error("failed to build projection for EPSG:{code}: {message}")]
    Projection { code: u32, message: String },

    #[error("coordinate transform failed: {0}")]
    Transform(String),

    #[error("transform produced a non-finite coordinate ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
}

/// Upper-left and lower-right corners of a patch in its projected source CRS.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedBox {
    pub ulx: f64,
    pub uly: f64,
    pub lrx: f64,
    pub lry: f64,
}

/// Extract the EPSG code embedded in a projection descriptor.
///
/// The code is the 5 characters ending 3 characters before the end, e.g.
/// `...AUTHORITY["EPSG","32632"]]`.
pub fn epsg_from_descriptor(descriptor: &str) -> Result<u32, ReprojectError> {
    let chars = descriptor.chars().collect::<Vec<_>>();
    if chars.len() < 8 {
        return Err(ReprojectError::DescriptorTooShort(chars.len()))
    }

    let code = chars[chars.len() - 8..chars.len() - 3].iter().collect::<String>();
    if !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(ReprojectError::InvalidAuthorityCode(code))
    }
    code.parse().map_err(|_| ReprojectError::InvalidAuthorityCode(code))
}

/// Round to [`ROUND_DIGITS`] decimal places, half away from zero.
#[inline]
pub fn round_coord(value: f64) -> f64 {
    let scale = 10f64.powi(ROUND_DIGITS);
    (value * scale).round() / scale
}

/// Converts projected patch footprints into WGS 84 lon/lat rectangles.
///
/// Source projections are built on first use and cached by EPSG code for the
/// lifetime of the reprojector (one ingest run).
pub struct Reprojector {
    target: Proj,
    sources: AHashMap<u32, Proj>,
}

impl std::fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reprojector")
            .field("target", &WGS84)
            .field("sources", &self.sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Reprojector {
    pub fn new() -> Result<Self, ReprojectError> {
        Ok(Self { target: build_proj(WGS84)?, sources: AHashMap::new() })
    }

    /// Reproject a box whose source CRS is named by a projection descriptor.
    pub fn reproject(&mut self, bbox: &ProjectedBox, descriptor: &str) -> Result<Rectangle, ReprojectError> {
        self.reproject_epsg(bbox, epsg_from_descriptor(descriptor)?)
    }

    /// Reproject the two corners of `bbox` from EPSG:`code` and span a lon/lat rectangle between them.
    pub fn reproject_epsg(&mut self, bbox: &ProjectedBox, code: u32) -> Result<Rectangle, ReprojectError> {
        let source = match self.sources.entry(code) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(build_proj(code)?),
        };

        let ul = transform_point(source, code, &self.target, Coord { x: bbox.ulx, y: bbox.uly })?;
        let lr = transform_point(source, code, &self.target, Coord { x: bbox.lrx, y: bbox.lry })?;

        Ok(Rectangle::from_corners(ul, lr))
    }

    /// Number of distinct source projections built so far.
    #[inline] pub fn cached_sources(&self) -> usize { self.sources.len() }
}

fn build_proj(code: u32) -> Result<Proj, ReprojectError> {
    let proj_string = crs::proj4_for_epsg(code).ok_or(ReprojectError::UnsupportedCrs(code))?;
    Proj::from_proj_string(&proj_string)
        .map_err(|e| ReprojectError::Projection { code, message: format!("{e:?}") })
}

/// Transform one coordinate into lon/lat degrees, rounded.
fn transform_point(source: &Proj, code: u32, target: &Proj, coord: Coord<f64>) -> Result<Coord<f64>, ReprojectError> {
    let mut point = if crs::is_geographic(code) {
        (coord.x.to_radians(), coord.y.to_radians(), 0.0)
    } else {
        (coord.x, coord.y, 0.0)
    };

    transform(source, target, &mut point)
        .map_err(|e| ReprojectError::Transform(format!("{e:?}")))?;

    let (x, y) = (point.0.to_degrees(), point.1.to_degrees());
    if !x.is_finite() || !y.is_finite() {
        return Err(ReprojectError::NonFinite { x, y })
    }

    Ok(Coord { x: round_coord(x), y: round_coord(y) })
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTM_32N: &str = r#"PROJCS["WGS 84 / UTM zone 32N",GEOGCS["WGS 84"],AUTHORITY["EPSG","32632"]]"#;

    #[test]
    fn parses_authority_code_at_fixed_offset() {
        assert_eq!(epsg_from_descriptor(UTM_32N), Ok(32632));
        assert_eq!(epsg_from_descriptor(r#"AUTHORITY["EPSG","32733"]]"#), Ok(32733));
    }

    #[test]
    fn rejects_short_or_non_numeric_descriptors() {
        assert_eq!(epsg_from_descriptor("32632"), Err(ReprojectError::DescriptorTooShort(5)));
        assert!(matches!(
            epsg_from_descriptor(r#"AUTHORITY["EPSG","4326"]]"#),
            Err(ReprojectError::InvalidAuthorityCode(_))
        ));
    }

    #[test]
    fn rounds_to_thirteen_places_symmetrically() {
        assert_eq!(round_coord(1.2345678901234568), 1.2345678901235);
        assert_eq!(round_coord(-1.2345678901234568), -1.2345678901235);
        assert_eq!(round_coord(51.20623812345671), 51.2062381234567);
        assert_eq!(round_coord(7.25), 7.25);
    }

    #[test]
    fn reprojects_small_projected_box_into_wgs84_bounds() {
        let mut reprojector = Reprojector::new().unwrap();
        let bbox = ProjectedBox { ulx: 7.646484, uly: 51.206238, lrx: 8.0, lry: 45.0 };
        let rect = reprojector.reproject(&bbox, UTM_32N).unwrap();

        assert_eq!(rect.ring().len(), 5);
        assert_eq!(rect.ring()[0], rect.ring()[4]);
        for corner in rect.ring() {
            assert!(corner.x.is_finite() && corner.y.is_finite());
            assert!((-180.0..=180.0).contains(&corner.x));
            assert!((-90.0..=90.0).contains(&corner.y));
        }
    }

    #[test]
    fn utm_central_meridian_maps_to_zone_longitude() {
        let mut reprojector = Reprojector::new().unwrap();
        let bbox = ProjectedBox { ulx: 500_000.0, uly: 5_538_631.0, lrx: 500_000.0, lry: 0.0 };
        let rect = reprojector.reproject_epsg(&bbox, 32632).unwrap();

        assert!((rect.ul().x - 9.0).abs() < 1e-6);
        assert!((rect.ul().y - 50.0).abs() < 1e-3);
        assert!((rect.lr().x - 9.0).abs() < 1e-6);
        assert!(rect.lr().y.abs() < 1e-6);
    }

    #[test]
    fn rectangle_is_spanned_by_transformed_corners() {
        let mut reprojector = Reprojector::new().unwrap();
        let bbox = ProjectedBox { ulx: 400_000.0, uly: 5_600_000.0, lrx: 401_200.0, lry: 5_598_800.0 };
        let rect = reprojector.reproject_epsg(&bbox, 32632).unwrap();

        assert_eq!(rect.ur(), Coord { x: rect.lr().x, y: rect.ul().y });
        assert_eq!(rect.ll(), Coord { x: rect.ul().x, y: rect.lr().y });
        assert!(rect.ul().x < rect.lr().x);
        assert!(rect.ul().y > rect.lr().y);
    }

    #[test]
    fn caches_source_projections() {
        let mut reprojector = Reprojector::new().unwrap();
        let bbox = ProjectedBox { ulx: 500_000.0, uly: 10.0, lrx: 500_010.0, lry: 0.0 };
        reprojector.reproject_epsg(&bbox, 32632).unwrap();
        reprojector.reproject_epsg(&bbox, 32632).unwrap();
        reprojector.reproject_epsg(&bbox, 32633).unwrap();
        assert_eq!(reprojector.cached_sources(), 2);
    }

    #[test]
    fn unsupported_code_is_an_error() {
        let mut reprojector = Reprojector::new().unwrap();
        let bbox = ProjectedBox { ulx: 0.0, uly: 0.0, lrx: 1.0, lry: 1.0 };
        assert_eq!(reprojector.reproject_epsg(&bbox, 2154), Err(ReprojectError::UnsupportedCrs(2154)));
        assert_eq!(reprojector.cached_sources(), 0);
    }

    #[test]
    fn geographic_source_passes_through() {
        let mut reprojector = Reprojector::new().unwrap();
        let bbox = ProjectedBox { ulx: 13.4, uly: 52.5, lrx: 13.5, lry: 52.4 };
        let rect = reprojector.reproject_epsg(&bbox, WGS84).unwrap();
        assert!((rect.ul().x - 13.4).abs() < 1e-9);
        assert!((rect.lr().y - 52.4).abs() < 1e-9);
    }
}
