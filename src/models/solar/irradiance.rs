//! Irradiance decomposition and plane-of-array transposition.
//!
//! The measured series carries only global horizontal irradiance. The Erbs
//! correlation splits it into direct-normal and diffuse-horizontal
//! components from the clearness index, and the isotropic-sky transposition
//! projects the components onto the tilted panel plane.

/// Solar constant used for extraterrestrial irradiance (W/m²).
const SOLAR_CONSTANT: f64 = 1367.0;

/// Ground reflectance for the ground-reflected diffuse component.
const ALBEDO: f64 = 0.25;

/// Lower bound on cos(zenith) in the clearness index, keeping low-sun
/// hours from blowing up the ratio.
const MIN_COS_ZENITH: f64 = 0.065;

/// Upper bound on the clearness index.
const MAX_CLEARNESS_INDEX: f64 = 2.0;

/// GHI split into beam and diffuse components (W/m²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrradianceComponents {
    /// Direct normal irradiance.
    pub dni: f64,
    /// Diffuse horizontal irradiance.
    pub dhi: f64,
}

/// Irradiance incident on the tilted panel plane (W/m²).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoaIrradiance {
    /// Beam component on the plane.
    pub direct: f64,
    /// Sky plus ground-reflected diffuse on the plane.
    pub diffuse: f64,
    /// Sum of both components.
    pub global: f64,
}

/// Extraterrestrial normal irradiance for a day of year (W/m²),
/// Spencer's Fourier-series eccentricity correction.
pub fn extraterrestrial_irradiance(day_of_year: u32) -> f64 {
    let b = 2.0 * std::f64::consts::PI * (f64::from(day_of_year) - 1.0) / 365.0;
    SOLAR_CONSTANT
        * (1.00011 + 0.034221 * b.cos() + 0.00128 * b.sin() + 0.000719 * (2.0 * b).cos()
            + 7.7e-5 * (2.0 * b).sin())
}

/// Decomposes GHI into DNI and DHI with the Erbs diffuse-fraction
/// correlation.
///
/// When the sun is at or below the horizon (or GHI is zero) both
/// components are zero.
pub fn erbs(ghi: f64, zenith_deg: f64, day_of_year: u32) -> IrradianceComponents {
    let cos_zenith = zenith_deg.to_radians().cos();
    if ghi <= 0.0 || cos_zenith <= 0.0 {
        return IrradianceComponents { dni: 0.0, dhi: 0.0 };
    }

    let extra = extraterrestrial_irradiance(day_of_year);
    let kt = (ghi / (extra * cos_zenith.max(MIN_COS_ZENITH)))
        .clamp(0.0, MAX_CLEARNESS_INDEX);

    // Diffuse fraction, piecewise in the clearness index.
    let diffuse_fraction = if kt <= 0.22 {
        1.0 - 0.09 * kt
    } else if kt <= 0.8 {
        0.9511 - 0.1604 * kt + 4.388 * kt.powi(2) - 16.638 * kt.powi(3) + 12.336 * kt.powi(4)
    } else {
        0.165
    };

    let dhi = diffuse_fraction * ghi;
    let dni = ((ghi - dhi) / cos_zenith).max(0.0);
    IrradianceComponents { dni, dhi }
}

/// Angle of incidence (degrees) between the sun and the panel normal.
pub fn angle_of_incidence(
    tilt_deg: f64,
    surface_azimuth_deg: f64,
    zenith_deg: f64,
    solar_azimuth_deg: f64,
) -> f64 {
    let tilt = tilt_deg.to_radians();
    let zenith = zenith_deg.to_radians();
    let azimuth_diff = (solar_azimuth_deg - surface_azimuth_deg).to_radians();
    let cos_aoi = zenith.cos() * tilt.cos() + zenith.sin() * tilt.sin() * azimuth_diff.cos();
    cos_aoi.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Transposes the irradiance components onto the tilted plane
/// (isotropic sky diffuse, constant-albedo ground reflection).
pub fn plane_of_array(
    tilt_deg: f64,
    surface_azimuth_deg: f64,
    zenith_deg: f64,
    solar_azimuth_deg: f64,
    ghi: f64,
    components: IrradianceComponents,
) -> PoaIrradiance {
    let tilt = tilt_deg.to_radians();
    let aoi = angle_of_incidence(tilt_deg, surface_azimuth_deg, zenith_deg, solar_azimuth_deg);

    let direct = (components.dni * aoi.to_radians().cos()).max(0.0);
    let sky_diffuse = components.dhi * (1.0 + tilt.cos()) / 2.0;
    let ground_diffuse = ghi.max(0.0) * ALBEDO * (1.0 - tilt.cos()) / 2.0;
    let diffuse = sky_diffuse + ground_diffuse;

    PoaIrradiance {
        direct,
        diffuse,
        global: direct + diffuse,
    }
}

/// Relative airmass at an apparent zenith angle (degrees), Kasten–Young
/// 1989. Undefined below the horizon; returns `None` for zenith ≥ 90°.
pub fn relative_airmass(apparent_zenith_deg: f64) -> Option<f64> {
    if apparent_zenith_deg >= 90.0 {
        return None;
    }
    let am = 1.0
        / (apparent_zenith_deg.to_radians().cos()
            + 0.50572 * (96.07995 - apparent_zenith_deg).powf(-1.6364));
    Some(am)
}

/// Pressure-corrected absolute airmass.
pub fn absolute_airmass(relative: f64, pressure_pa: f64) -> f64 {
    relative * pressure_pa / 101_325.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erbs_zero_ghi_or_night_gives_zero_components() {
        let c = erbs(0.0, 30.0, 172);
        assert_eq!((c.dni, c.dhi), (0.0, 0.0));
        let c = erbs(50.0, 95.0, 172);
        assert_eq!((c.dni, c.dhi), (0.0, 0.0));
    }

    #[test]
    fn erbs_overcast_sky_is_mostly_diffuse() {
        // Low clearness index: kt <= 0.22 keeps over 97% diffuse.
        let ghi = 30.0;
        let c = erbs(ghi, 60.0, 172);
        assert!(c.dhi / ghi > 0.97);
        assert!(c.dni >= 0.0);
    }

    #[test]
    fn erbs_clear_sky_diffuse_fraction_saturates() {
        // Push kt past 0.8: diffuse fraction pins at 0.165.
        let zenith: f64 = 20.0;
        let extra = extraterrestrial_irradiance(172);
        let ghi = 0.9 * extra * zenith.to_radians().cos();
        let c = erbs(ghi, zenith, 172);
        assert!((c.dhi / ghi - 0.165).abs() < 1e-12);
        assert!(c.dni > 0.0);
    }

    #[test]
    fn energy_balance_holds_on_the_horizontal() {
        // dni * cos(z) + dhi must reconstruct ghi.
        let zenith: f64 = 45.0;
        let ghi = 500.0;
        let c = erbs(ghi, zenith, 100);
        let reconstructed = c.dni * zenith.to_radians().cos() + c.dhi;
        assert!((reconstructed - ghi).abs() < 1e-9);
    }

    #[test]
    fn aoi_zero_when_sun_is_normal_to_panel() {
        let aoi = angle_of_incidence(35.0, 180.0, 35.0, 180.0);
        assert!(aoi.abs() < 1e-9);
    }

    #[test]
    fn flat_panel_poa_global_equals_ghi() {
        // Tilt 0: direct = dni*cos(zenith), sky diffuse = dhi, no ground term.
        let zenith = 40.0;
        let ghi = 600.0;
        let c = erbs(ghi, zenith, 172);
        let poa = plane_of_array(0.0, 180.0, zenith, 170.0, ghi, c);
        assert!((poa.global - ghi).abs() < 1e-9);
    }

    #[test]
    fn behind_panel_beam_is_clipped_to_zero() {
        let c = IrradianceComponents { dni: 800.0, dhi: 100.0 };
        // Sun in the north, panel facing south and steeply tilted.
        let poa = plane_of_array(80.0, 180.0, 70.0, 0.0, 300.0, c);
        assert_eq!(poa.direct, 0.0);
        assert!(poa.diffuse > 0.0);
    }

    #[test]
    fn airmass_is_one_overhead_and_grows_to_the_horizon() {
        let overhead = relative_airmass(0.0).unwrap();
        assert!((overhead - 1.0).abs() < 1e-3);
        let slanted = relative_airmass(60.0).unwrap();
        assert!((slanted - 2.0).abs() < 0.01);
        let grazing = relative_airmass(89.9).unwrap();
        assert!(grazing > 30.0);
        assert!(relative_airmass(90.0).is_none());
    }

    #[test]
    fn absolute_airmass_scales_with_pressure() {
        assert!((absolute_airmass(2.0, 101_325.0) - 2.0).abs() < 1e-12);
        assert!((absolute_airmass(2.0, 50_662.5) - 1.0).abs() < 1e-12);
    }
}
