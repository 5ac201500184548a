//! Hybrid plant simulator entry point — CLI wiring and report printing.

use std::process;

use hybrid_sim::cli::{self, CliOptions};
use hybrid_sim::config::ScenarioConfig;
use hybrid_sim::financial::FinancialReport;
use hybrid_sim::io::export::export_csv;
use hybrid_sim::io::import::{load_demand_csv, load_price_csv};
use hybrid_sim::sim::kpi::KpiReport;
use hybrid_sim::sim::pipeline;
use hybrid_sim::weather::load_knmi_csv;

fn run(opts: &CliOptions) -> Result<(), String> {
    let mut scenario = match &opts.scenario {
        Some(path) => ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string())?,
        None => ScenarioConfig::default(),
    };
    if let Some(year) = opts.year {
        scenario.simulation.year = Some(year);
    }

    let wind = scenario.wind_plant().map_err(|e| e.to_string())?;
    let solar = scenario.solar_plant().map_err(|e| e.to_string())?;

    let weather = load_knmi_csv(&opts.weather, scenario.simulation.year)
        .map_err(|e| format!("weather `{}`: {e}", opts.weather.display()))?;
    let demand = load_demand_csv(&opts.demand)
        .map_err(|e| format!("demand `{}`: {e}", opts.demand.display()))?;
    let prices = match &opts.prices {
        Some(path) => Some(
            load_price_csv(path).map_err(|e| format!("prices `{}`: {e}", path.display()))?,
        ),
        None => None,
    };

    let result = pipeline::run(
        &weather,
        &demand,
        &wind,
        &solar,
        scenario.location(),
        &scenario.battery_ratings(),
    )
    .map_err(|e| e.to_string())?;

    let kpi = KpiReport::from_result(
        &result,
        scenario.capacity_wind_mw(),
        scenario.capacity_pv_mw(solar.module.wp),
    );
    let financial =
        FinancialReport::compute(&result.production, prices.as_ref(), &scenario.financial_inputs())
            .map_err(|e| e.to_string())?;

    println!("{kpi}");
    println!("{financial}");

    if let Some(path) = &opts.out {
        export_csv(&result, weather.timestamps(), path)
            .map_err(|e| format!("failed to write `{}`: {e}", path.display()))?;
        eprintln!("Results written to {}", path.display());
    }

    Ok(())
}

fn main() {
    let opts = match cli::parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = run(&opts) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
