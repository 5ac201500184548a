//! Hand-rolled CLI argument parsing.

use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CliOptions {
    /// Scenario TOML; the baseline defaults apply when absent.
    pub scenario: Option<PathBuf>,
    /// KNMI hourly weather export (required).
    pub weather: PathBuf,
    /// Hourly demand CSV (required).
    pub demand: PathBuf,
    /// Optional hourly day-ahead price CSV.
    pub prices: Option<PathBuf>,
    /// Calendar-year override for the weather filter.
    pub year: Option<i32>,
    /// Optional CSV output path for the hourly result series.
    pub out: Option<PathBuf>,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    parse_options(&args)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut weather = None;
    let mut demand = None;
    let mut prices = None;
    let mut year = None;
    let mut out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--weather" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --weather (expected a KNMI CSV path)",
                )?;
                if weather.replace(PathBuf::from(path)).is_some() {
                    return Err("--weather provided more than once".to_string());
                }
            }
            "--demand" => {
                i += 1;
                let path = args
                    .next_or_err(i, "missing value for --demand (expected a CSV path)")?;
                if demand.replace(PathBuf::from(path)).is_some() {
                    return Err("--demand provided more than once".to_string());
                }
            }
            "--prices" => {
                i += 1;
                let path = args
                    .next_or_err(i, "missing value for --prices (expected a CSV path)")?;
                if prices.replace(PathBuf::from(path)).is_some() {
                    return Err("--prices provided more than once".to_string());
                }
            }
            "--year" => {
                i += 1;
                let raw = args.next_or_err(i, "missing value for --year (expected a year)")?;
                let parsed: i32 = raw
                    .parse()
                    .map_err(|_| format!("--year value \"{raw}\" is not a valid year"))?;
                if year.replace(parsed).is_some() {
                    return Err("--year provided more than once".to_string());
                }
            }
            "--out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --out (expected a file path)")?;
                if out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let weather = weather.ok_or_else(|| "--weather is required".to_string())?;
    let demand = demand.ok_or_else(|| "--demand is required".to_string())?;

    Ok(CliOptions {
        scenario,
        weather,
        demand,
        prices,
        year,
        out,
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  hybrid-sim --weather <knmi.csv> --demand <demand.csv> \
         [--scenario <path>] [--prices <path>] [--year <yyyy>] [--out <path>]"
    );
}
