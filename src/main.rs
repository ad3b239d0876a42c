//! Certification entry point: CLI wiring and config-driven engine construction.

use std::path::Path;
use std::process;

use powerquote::config::EngineConfig;
use powerquote::industries::Industry;
use powerquote::io::export::export_csv;
use powerquote::quote::QuoteEngine;
use powerquote::truequote::fixtures::fixture_set;
use powerquote::truequote::harness::run_batch;
use powerquote::truequote::report::{
    CertificationReport, Scoreboard, render_table, report_to_path, summary_to_path,
};

/// Parsed CLI arguments.
struct CliArgs {
    config_path: Option<String>,
    preset: Option<String>,
    seed_override: Option<u64>,
    strict: bool,
    industry: Option<String>,
    out_dir: Option<String>,
    csv_out: Option<String>,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("powerquote — BESS sizing and valuation engine with TrueQuote certification");
    eprintln!();
    eprintln!("Usage: powerquote [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>      Load engine config from TOML file");
    eprintln!("  --preset <name>      Use a built-in preset (baseline, conservative, strict_ci)");
    eprintln!("  --seed <u64>         Override the fixture fuzzing seed");
    eprintln!("  --strict             Fail fixtures whose required answers were defaulted");
    eprintln!("  --industry <slug>    Certify only one industry's fixtures");
    eprintln!("  --out-dir <path>     Directory for the report JSON files (default: .)");
    eprintln!("  --csv <path>         Export certification rows to CSV");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve              Start REST API server after certification");
        eprintln!("  --port <u16>         API server port (default: 3000)");
    }
    eprintln!("  --help               Show this help message");
    eprintln!();
    eprintln!("If no --config or --preset is given, the baseline policy is used.");
    eprintln!("Setting STRICT=1 in the environment acts like --strict.");
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        config_path: None,
        preset: None,
        seed_override: None,
        strict: false,
        industry: None,
        out_dir: None,
        csv_out: None,
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
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --config requires a path argument");
                    process::exit(1);
                }
                cli.config_path = Some(args[i].clone());
            }
            "--preset" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --preset requires a name argument");
                    process::exit(1);
                }
                cli.preset = Some(args[i].clone());
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
            "--strict" => {
                cli.strict = true;
            }
            "--industry" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --industry requires a slug argument");
                    process::exit(1);
                }
                cli.industry = Some(args[i].clone());
            }
            "--out-dir" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --out-dir requires a path argument");
                    process::exit(1);
                }
                cli.out_dir = Some(args[i].clone());
            }
            "--csv" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --csv requires a path argument");
                    process::exit(1);
                }
                cli.csv_out = Some(args[i].clone());
            }
            #[cfg(feature = "api")]
            "--serve" => {
                cli.serve = true;
            }
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("error: --port requires a u16 argument");
                    process::exit(1);
                }
                if let Ok(p) = args[i].parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{}\" is not a valid u16", args[i]);
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
    let cli = parse_args();

    // Load config: --config takes priority, then --preset, then baseline default
    let mut config = if let Some(ref path) = cli.config_path {
        match EngineConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match EngineConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        EngineConfig::baseline()
    };

    // Apply overrides
    if let Some(seed) = cli.seed_override {
        config.fixtures.seed = seed;
    }
    if cli.strict || matches!(std::env::var("STRICT").as_deref(), Ok("1")) {
        config.validation.strict = true;
    }

    // Validate
    let errors = config.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let strict = config.validation.strict;
    let seed = config.fixtures.seed;

    // Build the fixture batch and certify it
    let mut fixtures = fixture_set(&config.fixtures);
    if let Some(ref slug) = cli.industry {
        let wanted = Industry::resolve(slug);
        fixtures.retain(|f| f.industry == wanted);
    }
    let engine = QuoteEngine::new(config);
    let rows = run_batch(&engine, &fixtures);
    let board = Scoreboard::tally(&rows);

    // Print per-fixture results and the scoreboard
    print!("{}", render_table(&rows));
    println!("\n{board}");

    // Write the report and summary JSON
    let out_dir = cli.out_dir.clone().unwrap_or_else(|| ".".to_string());
    let report_path = Path::new(&out_dir).join("truequote_report.json");
    let summary_path = Path::new(&out_dir).join("truequote_summary.json");
    let report = CertificationReport::new(&rows, strict, seed);
    if let Err(e) = report_to_path(&report_path, &report) {
        eprintln!("error: failed to write report: {e}");
        process::exit(1);
    }
    if let Err(e) = summary_to_path(&summary_path, &rows) {
        eprintln!("error: failed to write summary: {e}");
        process::exit(1);
    }
    eprintln!("Report written to {}", report_path.display());

    // Export CSV if requested
    if let Some(ref path) = cli.csv_out {
        if let Err(e) = export_csv(&rows, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Certification rows written to {path}");
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(powerquote::api::AppState { engine });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        rt.block_on(powerquote::api::serve(state, addr));
    }

    // Exit nonzero when any fixture failed or crashed, so CI gates on it
    if !board.is_acceptable() {
        process::exit(1);
    }
}
