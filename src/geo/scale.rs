// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Local meters-to-degrees scale on the WGS-84 ellipsoid.

/// Degrees of longitude and latitude per meter at `lat` degrees.
///
/// Returns `(mtodeglon, mtodeglat)`.
pub fn coor_scale(lat: f64) -> (f64, f64) {
    let radlat = lat.to_radians();
    let mtodeglon = 1.0
        / (111_412.84 * radlat.cos() - 93.5 * (3.0 * radlat).cos() + 0.118 * (5.0 * radlat).cos())
            .abs();
    let mtodeglat = 1.0
        / (111_132.92 - 559.82 * (2.0 * radlat).cos() + 1.175 * (4.0 * radlat).cos()
            - 0.0023 * (6.0 * radlat).cos())
        .abs();
    (mtodeglon, mtodeglat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equator() {
        let (mlon, mlat) = coor_scale(0.0);
        // ~111.32 km per degree of longitude, ~110.57 km per degree of latitude
        assert!((1.0 / mlon - 111_319.458).abs() < 0.01);
        assert!((1.0 / mlat - 110_574.2727).abs() < 0.01);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        let (lon0, _) = coor_scale(0.0);
        let (lon60, lat60) = coor_scale(60.0);
        assert!(lon60 > lon0 * 1.9 && lon60 < lon0 * 2.1);
        assert!(1.0 / lat60 > 111_000.0);
    }

    #[test]
    fn test_symmetric_in_latitude() {
        let north = coor_scale(37.5);
        let south = coor_scale(-37.5);
        assert!((north.0 - south.0).abs() < 1e-15);
        assert!((north.1 - south.1).abs() < 1e-15);
    }
}
