//! End-to-end pipeline runs on synthetic weather.

use hybrid_sim::config::ScenarioConfig;
use hybrid_sim::financial::FinancialReport;
use hybrid_sim::series::EnergySeries;
use hybrid_sim::sim::kpi::KpiReport;
use hybrid_sim::sim::pipeline;
use hybrid_sim::weather::{parse_knmi, WeatherSeries};

/// Builds `days` of hourly KNMI-format records for June 2018: steady
/// 8 m/s wind, 15 °C, and irradiance during midday hours.
fn synthetic_knmi(days: u32) -> String {
    let mut raw = String::from(
        "# synthetic test data\nSTN,YYYYMMDD,   HH,   DD,   FH,    T,    P,    Q\n",
    );
    for day in 0..days {
        let date = 20_180_601 + day;
        for hh in 1..=24 {
            let q = if (11..=17).contains(&hh) { 150 } else { 0 };
            raw.push_str(&format!("210,{date},{hh},220,80,150,10132,{q}\n"));
        }
    }
    raw
}

fn weather(days: u32) -> WeatherSeries {
    parse_knmi(&synthetic_knmi(days), None).expect("synthetic weather should parse")
}

#[test]
fn default_scenario_runs_end_to_end() {
    let scenario = ScenarioConfig::default();
    let weather = weather(3);
    let demand = EnergySeries::new(vec![15.0; weather.len()]);

    let wind = scenario.wind_plant().unwrap();
    let solar = scenario.solar_plant().unwrap();
    let result = pipeline::run(
        &weather,
        &demand,
        &wind,
        &solar,
        scenario.location(),
        &scenario.battery_ratings(),
    )
    .unwrap();

    // Steady 8 m/s at 10 m reaches ~11.6 m/s at hub height; the turbines
    // must produce every hour.
    assert!(result.wind_production.min() > 0.0);

    // PV only produces while irradiance is nonzero.
    for (sample, pv) in weather.samples().iter().zip(result.pv_production.iter()) {
        if sample.ghi == 0.0 {
            assert_eq!(*pv, 0.0);
        }
    }
    assert!(result.pv_production.max() > 0.0, "midday PV should produce");

    // Per-hour balance: production - demand splits into the residuals.
    for t in 0..weather.len() {
        let net = result.production.values()[t] - result.demand.values()[t];
        let split = result.curtailed.values()[t] - result.unserved.values()[t];
        assert!((net - split).abs() < 1e-9);
    }

    assert!(result.curtailed_with_storage.sum() <= result.curtailed.sum() + 1e-9);
    assert!(result.unserved_with_storage.sum() <= result.unserved.sum() + 1e-9);
}

#[test]
fn reports_are_finite_and_consistent() {
    let scenario = ScenarioConfig::default();
    let weather = weather(2);
    let demand = EnergySeries::new(vec![20.0; weather.len()]);

    let wind = scenario.wind_plant().unwrap();
    let solar = scenario.solar_plant().unwrap();
    let result = pipeline::run(
        &weather,
        &demand,
        &wind,
        &solar,
        scenario.location(),
        &scenario.battery_ratings(),
    )
    .unwrap();

    let kpi = KpiReport::from_result(
        &result,
        scenario.capacity_wind_mw(),
        scenario.capacity_pv_mw(solar.module.wp),
    );
    assert!(kpi.capacity_factor_wind > 0.0 && kpi.capacity_factor_wind < 1.0);
    assert!(kpi.capacity_factor_pv >= 0.0 && kpi.capacity_factor_pv < 1.0);
    assert!(
        (kpi.full_load_hours_wind - kpi.capacity_factor_wind * 8760.0).abs() < 1e-9
    );

    let financial = FinancialReport::compute(
        &result.production,
        None,
        &scenario.financial_inputs(),
    )
    .unwrap();
    assert!(financial.annual_revenue_eur > 0.0);
    assert!(financial.lcoe_eur_mwh.is_finite());
}

#[test]
fn oversized_battery_absorbs_a_short_surplus() {
    let mut scenario = ScenarioConfig::default();
    scenario.battery.power_rating_mw = 100.0;
    scenario.battery.energy_rating_mwh = 10_000.0;

    let weather = weather(2);
    // Demand far below production: every hour is surplus.
    let demand = EnergySeries::new(vec![0.5; weather.len()]);

    let wind = scenario.wind_plant().unwrap();
    let solar = scenario.solar_plant().unwrap();
    let result = pipeline::run(
        &weather,
        &demand,
        &wind,
        &solar,
        scenario.location(),
        &scenario.battery_ratings(),
    )
    .unwrap();

    assert!(result.curtailed.sum() > 0.0);
    // With effectively unlimited storage the surplus is fully absorbed.
    assert!(result.curtailed_with_storage.sum() < 1e-6);
    // SOC never leaves its bounds even while charging continuously.
    assert!(result.battery_soc.max() <= 1.0);
    assert!(result.battery_soc.min() >= 0.0);
}
