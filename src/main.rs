//! aqi-sim entry point — CLI wiring and config-driven dashboard simulation.

use std::path::Path;
use std::process;

use aqi_sim::config::DashboardConfig;
use aqi_sim::dataset::DatasetRegistry;
use aqi_sim::forecast::SeededSource;
use aqi_sim::io::export::export_csv;
use aqi_sim::io::inject::InjectionPayload;
use aqi_sim::refresh::RefreshCycle;
use aqi_sim::report::DashboardReport;

/// City shown when no `--city` is given.
const DEFAULT_CITY: &str = "delhi";

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    city: Option<String>,
    horizon_override: Option<usize>,
    seed_override: Option<u64>,
    start_hour_override: Option<u8>,
    refresh_cycles: usize,
    inject_path: Option<String>,
    forecast_out: Option<String>,
}

fn print_help() {
    eprintln!("aqi-sim — city-scale air quality forecast simulator");
    eprintln!();
    eprintln!("Usage: aqi-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load configuration from TOML file");
    eprintln!("  --city <id>              City to report on (default: delhi)");
    eprintln!("  --horizon <n>            Override forecast horizon");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --start-hour <0..=23>    Override forecast start hour");
    eprintln!("  --refresh <n>            Run n simulated refresh cycles first");
    eprintln!("  --inject <path>          Apply a JSON dataset injection payload");
    eprintln!("  --forecast-out <path>    Export the city's forecast to CSV");
    eprintln!("  --help                   Show this help message");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        city: None,
        horizon_override: None,
        seed_override: None,
        start_hour_override: None,
        refresh_cycles: 0,
        inject_path: None,
        forecast_out: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--city" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --city requires a city id argument");
                    process::exit(1);
                }
                cli.city = Some(args[i].clone());
            }
            "--horizon" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --horizon requires a positive integer argument");
                    process::exit(1);
                }
                if let Ok(h) = args[i].parse::<usize>() {
                    cli.horizon_override = Some(h);
                } else {
                    eprintln!("error: --horizon value \"{}\" is not a valid integer", args[i]);
                    process::exit(1);
                }
            }
            "--seed" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --seed requires a u64 argument");
                    process::exit(1);
                }
                if let Ok(s) = args[i].parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{}\" is not a valid u64", args[i]);
                    process::exit(1);
                }
            }
            "--start-hour" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --start-hour requires an hour argument");
                    process::exit(1);
                }
                if let Ok(h) = args[i].parse::<u8>() {
                    cli.start_hour_override = Some(h);
                } else {
                    eprintln!("error: --start-hour value \"{}\" is not a valid hour", args[i]);
                    process::exit(1);
                }
            }
            "--refresh" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --refresh requires a count argument");
                    process::exit(1);
                }
                if let Ok(n) = args[i].parse::<usize>() {
                    cli.refresh_cycles = n;
                } else {
                    eprintln!("error: --refresh value \"{}\" is not a valid count", args[i]);
                    process::exit(1);
                }
            }
            "--inject" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --inject requires a path argument");
                    process::exit(1);
                }
                cli.inject_path = Some(args[i].clone());
            }
            "--forecast-out" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --forecast-out requires a path argument");
                    process::exit(1);
                }
                cli.forecast_out = Some(args[i].clone());
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

fn main() {
    let cli = parse_args();

    // Load config, then apply CLI overrides before validation
    let mut config = if let Some(ref path) = cli.config_path {
        match DashboardConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        DashboardConfig::default()
    };

    if let Some(h) = cli.horizon_override {
        config.forecast.horizon = h;
    }
    if let Some(s) = cli.seed_override {
        config.forecast.seed = s;
    }
    if let Some(h) = cli.start_hour_override {
        config.forecast.start_hour = h;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // Build the seeded registry
    let generator = config.forecast.generator();
    let mut rng = SeededSource::new(config.forecast.seed);
    let mut registry = match DatasetRegistry::seeded(
        &generator,
        config.forecast.horizon,
        config.forecast.start_hour,
        config.history.window,
        &mut rng,
    ) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    // Apply external data injection if requested
    if let Some(ref path) = cli.inject_path {
        let payload = match InjectionPayload::from_json_file(Path::new(path)) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        };
        if let Err(e) = payload.apply(&mut registry, &config.channels) {
            eprintln!("{e}");
            process::exit(1);
        }
    }

    let city = cli.city.as_deref().unwrap_or(DEFAULT_CITY);
    if registry.get(city).is_none() {
        let available: Vec<&str> = registry.cities().collect();
        eprintln!(
            "error: unknown city \"{city}\", available: {}",
            available.join(", ")
        );
        process::exit(1);
    }

    // Run simulated refresh cycles against the selected city
    if cli.refresh_cycles > 0 {
        let cycle = RefreshCycle::new(
            config.channels,
            generator,
            config.forecast.horizon,
            config.forecast.start_hour,
        );
        if let Some(dataset) = registry.get_mut(city) {
            for _ in 0..cli.refresh_cycles {
                if let Err(e) = cycle.apply(dataset, &mut rng) {
                    eprintln!("error: {e}");
                    process::exit(1);
                }
            }
        }
    }

    let Some(dataset) = registry.get(city) else {
        process::exit(1)
    };

    // Per-step forecast lines
    for (i, &v) in dataset.forecast.values().iter().enumerate() {
        println!(
            "+{:<4} (hour {:>2}) AQI {:>3}  {}",
            dataset.forecast.label(i),
            dataset.forecast.hour_of_day(i),
            v,
            config.categories.classify(v as f64).label()
        );
    }

    // Dashboard report
    match DashboardReport::from_dataset(city, dataset, &config.categories, &config.alerts) {
        Ok(report) => println!("\n{report}"),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }

    // Export CSV if requested
    if let Some(ref path) = cli.forecast_out {
        if let Err(e) = export_csv(&dataset.forecast, &config.categories, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Forecast written to {path}");
    }
}
