//! Heat-pump analysis entry point: CLI wiring and config-driven analysis.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;

use heatpump_sim::config::ScenarioConfig;
use heatpump_sim::io::export::export_hourly_csv;
use heatpump_sim::pipeline::{AnalysisInputs, run_analysis};

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    deliveries: Option<String>,
    temperatures: Option<String>,
    catalog: Option<String>,
    heat_pump: Option<String>,
    hourly_out: Option<String>,
    periods: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("heatpump-sim: heat-pump retrofit analysis");
    eprintln!();
    eprintln!("Usage: heatpump-sim --deliveries <csv> --temperatures <csv> --catalog <csv> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --deliveries <path>      Fuel delivery history (date,volume,cost)");
    eprintln!("  --temperatures <path>    Outdoor temperatures (timestamp,temp_f)");
    eprintln!("  --catalog <path>         Heat-pump ratings (manufacturer,model,temp_f,...)");
    eprintln!("  --heat-pump <model>      Override the heat pump selected in the scenario");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (default, cut_out)");
    eprintln!("  --hourly-out <path>      Export simulated hours to CSV");
    eprintln!("  --periods                Print per-delivery resistance diagnostics");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the analysis");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the default preset is used.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) to control log output on stderr.");
}

fn required_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    match args.get(i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {what} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        deliveries: None,
        temperatures: None,
        catalog: None,
        heat_pump: None,
        hourly_out: None,
        periods: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                i += 1;
                cli.scenario_path = Some(required_value(&args, i, "--scenario", "path"));
            }
            "--preset" => {
                i += 1;
                cli.preset = Some(required_value(&args, i, "--preset", "name"));
            }
            "--deliveries" => {
                i += 1;
                cli.deliveries = Some(required_value(&args, i, "--deliveries", "path"));
            }
            "--temperatures" => {
                i += 1;
                cli.temperatures = Some(required_value(&args, i, "--temperatures", "path"));
            }
            "--catalog" => {
                i += 1;
                cli.catalog = Some(required_value(&args, i, "--catalog", "path"));
            }
            "--heat-pump" => {
                i += 1;
                cli.heat_pump = Some(required_value(&args, i, "--heat-pump", "model"));
            }
            "--hourly-out" => {
                i += 1;
                cli.hourly_out = Some(required_value(&args, i, "--hourly-out", "path"));
            }
            "--periods" => {
                cli.periods = true;
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let value = required_value(&args, i, "--port", "u16");
                if let Ok(p) = value.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{value}\" is not a valid u16");
                    process::exit(1);
                }
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
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    // Load config: --scenario takes priority, then --preset, then the default preset
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(model) = cli.heat_pump {
        scenario.heat_pump.model = model;
    }

    // Validate
    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let (Some(deliveries), Some(temperatures), Some(catalog)) =
        (cli.deliveries, cli.temperatures, cli.catalog)
    else {
        eprintln!("error: --deliveries, --temperatures, and --catalog are required");
        print_help();
        process::exit(1);
    };

    let inputs = match AnalysisInputs::from_files(
        Path::new(&deliveries),
        Path::new(&temperatures),
        Path::new(&catalog),
        &scenario.baseline,
    ) {
        Ok(inputs) => inputs,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    let run = match run_analysis(&inputs, &scenario) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!(
        "Average thermal resistance: {:.6} F·h/BTU over {} hours ({:.0} degree-hours, {:.1} units)",
        run.estimate.average_resistance,
        run.estimate.window.hours(),
        run.estimate.degree_hours,
        run.estimate.total_volume,
    );
    if cli.periods {
        for p in &run.estimate.periods {
            match p.resistance {
                Some(r) => println!("  {} .. {}: {:.6}", p.start, p.end, r),
                None => println!("  {} .. {}: n/a (zero volume)", p.start, p.end),
            }
        }
    }
    println!("\n{}", run.report);

    // Export CSV if requested
    if let Some(ref path) = cli.hourly_out {
        if let Err(e) = export_hourly_csv(&run.simulation.hourly, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Hourly results written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(heatpump_sim::api::AppState {
            inputs,
            config: scenario,
            run,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(heatpump_sim::api::serve(state, addr)) {
            eprintln!("error: server failed: {e}");
            process::exit(1);
        }
    }
}
