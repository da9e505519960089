/// EPSG code of the geographic target reference system (WGS 84 lon/lat).
pub const WGS84: u32 = 4326;

/// EPSG code of spherical Web Mercator.
pub const WEB_MERCATOR: u32 = 3857;

/// Build the PROJ.4 string for a supported EPSG code.
/// - 4326: WGS 84 lon/lat
/// - 3857: Web Mercator
/// - 326zz / 327zz: WGS 84 / UTM zone zz north / south
/// - 258zz: ETRS89 / UTM zone zz (zones 28–38)
pub(crate) fn proj4_for_epsg(code: u32) -> Option<String> {
    match code {
        WGS84 => Some("+proj=longlat +datum=WGS84 +no_defs +type=crs".into()),
        WEB_MERCATOR => Some(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs +type=crs".into()
        ),
        32601..=32660 => Some(utm(code - 32600, false, "+datum=WGS84")),
        32701..=32760 => Some(utm(code - 32700, true, "+datum=WGS84")),
        25828..=25838 => Some(utm(code - 25800, false, "+ellps=GRS80 +towgs84=0,0,0,0,0,0,0")),
        _ => None,
    }
}

/// True if coordinates in this CRS are angular (degrees on input/output).
#[inline]
pub(crate) fn is_geographic(code: u32) -> bool { code == WGS84 }

#[inline]
fn utm(zone: u32, south: bool, datum: &str) -> String {
    let south = if south { " +south" } else { "" };
    format!("+proj=utm +zone={zone}{south} {datum} +units=m +no_defs +type=crs")
}
