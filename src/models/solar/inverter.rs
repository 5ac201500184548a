//! DC→AC conversion through the inverter efficiency curve.

/// Converts DC module power to AC output (W).
///
/// Three regimes:
///
/// * zero DC input produces zero AC output (the efficiency curve is
///   undefined at a zero load ratio, so this guard must come first);
/// * DC input at or above the inverter's rated DC input — nominal AC
///   power divided by the nominal efficiency — saturates at the nominal
///   AC rating (boundary inclusive);
/// * otherwise the part-load efficiency curve
///   `η(ζ) = -0.0162·ζ - 0.0059/ζ + 0.9858` applies, with
///   `ζ = P_dc / P_dc,nominal`.
pub fn ac_from_dc(power_dc: f64, nominal_power_ac: f64, nominal_efficiency: f64) -> f64 {
    if power_dc <= 0.0 {
        return 0.0;
    }

    let nominal_power_dc = nominal_power_ac / nominal_efficiency;
    if power_dc >= nominal_power_dc {
        return nominal_power_ac;
    }

    let zeta = power_dc / nominal_power_dc;
    let efficiency = -0.0162 * zeta - 0.0059 / zeta + 0.9858;
    efficiency * power_dc
}
