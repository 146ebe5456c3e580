// Web-Mercator projection of loaded coordinates
use std::f64::consts::PI;

const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Project WGS84 lon/lat (degrees) to Web-Mercator easting/northing in
/// metres. Applied by the loader so every record carries both coordinate
/// pairs.
pub fn lon_lat_to_easting_northing(lon: f64, lat: f64) -> (f64, f64) {
    let easting = lon.to_radians() * EARTH_RADIUS_M;
    let northing = (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * EARTH_RADIUS_M;
    (easting, northing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_origin() {
        let (easting, northing) = lon_lat_to_easting_northing(0.0, 0.0);
        assert!(easting.abs() < 1e-9);
        assert!(northing.abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_easting() {
        let (easting, _) = lon_lat_to_easting_northing(180.0, 0.0);
        assert!((easting - 20_037_508.342789244).abs() < 1e-6);
    }

    #[test]
    fn test_known_point() {
        // Stockholm.
        let (easting, northing) = lon_lat_to_easting_northing(18.0686, 59.3293);
        assert!((easting - 2_011_371.0).abs() < 100.0);
        assert!((northing - 8_251_950.0).abs() < 100.0);
    }
}
