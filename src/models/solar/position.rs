//! Solar position ephemeris.
//!
//! Computes topocentric sun coordinates from a UTC timestamp and site
//! latitude/longitude using the Astronomical Almanac low-precision
//! ephemeris (mean anomaly + Kepler iteration, first-order obliquity and
//! perigee drift), with the standard atmospheric refraction correction for
//! the apparent elevation. Accurate to a small fraction of a degree, which
//! is ample for irradiance modeling on an hourly grid.

use chrono::{DateTime, Datelike, Timelike, Utc};

/// Aberration correction (degrees).
const ABERRATION: f64 = 20.0 / 3600.0;

/// Standard atmosphere used by the refraction correction.
const STANDARD_PRESSURE_PA: f64 = 101_325.0;
const STANDARD_TEMPERATURE_C: f64 = 12.0;

/// Sun coordinates at one instant, all in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    /// True zenith angle (90 − elevation).
    pub zenith: f64,
    /// Refraction-corrected zenith angle.
    pub apparent_zenith: f64,
    /// True elevation above the horizon (negative at night).
    pub elevation: f64,
    /// Refraction-corrected elevation.
    pub apparent_elevation: f64,
    /// Azimuth clockwise from north, 0..360.
    pub azimuth: f64,
}

/// Computes the sun position for a UTC instant at the given site.
///
/// `latitude` is positive north, `longitude` positive east, both in
/// degrees.
pub fn ephemeris(time: DateTime<Utc>, latitude: f64, longitude: f64) -> SolarPosition {
    let day_of_year = f64::from(time.ordinal());
    let dec_hours = f64::from(time.hour())
        + f64::from(time.minute()) / 60.0
        + f64::from(time.second()) / 3600.0;

    // Days since the 1900.0 epoch, Julian-calendar leap rule.
    let yr = f64::from(time.year() - 1900);
    let yr_begin = 365.0 * yr + ((yr - 1.0) / 4.0).floor() - 0.5;
    let ezero = yr_begin + day_of_year;
    let t = ezero / 36525.0;

    // Greenwich mean sidereal time at 0h, then at the observation hour.
    let gmst0 = 6.0 / 24.0 + 38.0 / 1440.0 + (45.836 + 8_640_184.542 * t + 0.0929 * t * t) / 86400.0;
    let gmst0 = 360.0 * (gmst0 - gmst0.floor());
    let gmsti = (gmst0 + 360.0 * (1.002_737_909_3 * dec_hours / 24.0)).rem_euclid(360.0);
    let loc_ast = (360.0 + gmsti + longitude).rem_euclid(360.0);

    let epoch_date = ezero + dec_hours / 24.0;
    let t1 = epoch_date / 36525.0;

    let obliquity =
        (23.452294 - 0.0130125 * t1 - 1.64e-6 * t1 * t1 + 5.03e-7 * t1 * t1 * t1).to_radians();
    let ml_perigee =
        281.22083 + 4.70684e-5 * epoch_date + 0.000453 * t1 * t1 + 3.0e-6 * t1 * t1 * t1;
    let mean_anom =
        (358.47583 + 0.985_600_267 * epoch_date - 0.00015 * t1 * t1 - 3.0e-6 * t1 * t1 * t1)
            .rem_euclid(360.0);
    let eccen = 0.016_751_04 - 4.18e-5 * t1 - 1.26e-7 * t1 * t1;

    // Kepler's equation, fixed-point iteration in degrees.
    let mut eccen_anom = mean_anom;
    let mut prev = f64::INFINITY;
    while (eccen_anom - prev).abs() > 1e-4 {
        prev = eccen_anom;
        eccen_anom = mean_anom + eccen.to_degrees() * prev.to_radians().sin();
    }

    let true_anom = 2.0
        * (((1.0 + eccen) / (1.0 - eccen)).sqrt() * (eccen_anom.to_radians() / 2.0).tan())
            .atan()
            .to_degrees()
            .rem_euclid(360.0);

    let ec_lon = (ml_perigee + true_anom).rem_euclid(360.0) - ABERRATION;
    let ec_lon_r = ec_lon.to_radians();

    let declination = (obliquity.sin() * ec_lon_r.sin()).asin();
    let rt_ascen = (obliquity.cos() * ec_lon_r.sin())
        .atan2(ec_lon_r.cos())
        .to_degrees();

    // Hour angle in [-180, 180).
    let mut hour_angle = loc_ast - rt_ascen;
    hour_angle = (hour_angle + 180.0).rem_euclid(360.0) - 180.0;
    let hour_angle_r = hour_angle.to_radians();

    let lat_r = latitude.to_radians();
    let elevation_r = (lat_r.cos() * declination.cos() * hour_angle_r.cos()
        + lat_r.sin() * declination.sin())
    .asin();
    let elevation = elevation_r.to_degrees();

    let azimuth = (-hour_angle_r.sin())
        .atan2(lat_r.cos() * declination.tan() - lat_r.sin() * hour_angle_r.cos())
        .to_degrees()
        .rem_euclid(360.0);

    let apparent_elevation = elevation + refraction(elevation);

    SolarPosition {
        zenith: 90.0 - elevation,
        apparent_zenith: 90.0 - apparent_elevation,
        elevation,
        apparent_elevation,
        azimuth,
    }
}

/// Atmospheric refraction correction (degrees) for a true elevation,
/// standard pressure and temperature.
fn refraction(elevation: f64) -> f64 {
    let tan_el = elevation.to_radians().tan();
    // Correction in arcseconds, piecewise by elevation band.
    let arcsec = if elevation > 85.0 {
        0.0
    } else if elevation > 5.0 {
        58.1 / tan_el - 0.07 / tan_el.powi(3) + 8.6e-5 / tan_el.powi(5)
    } else if elevation > -0.575 {
        elevation.mul_add(
            elevation.mul_add(elevation.mul_add(0.711, -12.79), 103.4),
            -518.2,
        ) * elevation
            + 1735.0
    } else {
        -20.774 / tan_el
    };
    arcsec * (283.0 / (273.0 + STANDARD_TEMPERATURE_C)) * (STANDARD_PRESSURE_PA / 101_325.0)
        / 3600.0
}
