use anyhow::{anyhow, Result};
use clap::{arg, ArgAction, Command};
use lirp_analysis::aggregation::export::export_table;
use lirp_analysis::loader::{aggregate_directory, load_instance};
use lirp_analysis::{CitySource, DemandSurfaceSynthesizer, Point, TableKind};
use lirp_structs::config::AnalysisConfig;
use lirp_utils::{jsonify, load_json_arg};
use rand::{rngs::SmallRng, SeedableRng};
use serde::Serialize;
use std::{fs, io, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("lirp-runtime")
        .about("Visualisation and solver-comparison tooling for LIRP instances")
        .arg_required_else_help(true)
        .arg(
            arg!(-v --verbose "Enable debug logging")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("demand_surface")
                .about("Synthesizes the demand-intensity grid of an instance")
                .arg(
                    arg!(<INSTANCE> "Path to an instance json file")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--seed [SEED] "Seed for the random source (default: OS entropy)")
                        .value_parser(clap::value_parser!(u64)),
                )
                .arg(
                    arg!(--output [OUTPUT_FILE] "If set, the grid is saved to this file path (csv when it ends with .csv, json otherwise)")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("aggregate_results")
                .about("Aggregates solver gaps into summary tables")
                .arg(
                    arg!(<SOLUTIONS_DIR> "Directory holding one sub-directory of results per instance")
                        .value_parser(clap::value_parser!(PathBuf)),
                )
                .arg(
                    arg!(--config [CONFIG] "Config json string or path to json file")
                        .value_parser(clap::value_parser!(String)),
                )
                .arg(
                    arg!(--output [OUTPUT_DIR] "Directory the csv and tex tables are written to")
                        .default_value(".")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    if let Err(e) = match matches.subcommand() {
        Some(("demand_surface", sub_m)) => demand_surface(
            sub_m.get_one::<PathBuf>("INSTANCE").unwrap().clone(),
            sub_m.get_one::<u64>("seed").cloned(),
            sub_m.get_one::<PathBuf>("output").cloned(),
        ),
        Some(("aggregate_results", sub_m)) => aggregate_results(
            sub_m.get_one::<PathBuf>("SOLUTIONS_DIR").unwrap().clone(),
            sub_m.get_one::<String>("config").cloned(),
            sub_m.get_one::<PathBuf>("output").unwrap().clone(),
        ),
        _ => Err(anyhow!("Invalid subcommand")),
    } {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[derive(Serialize)]
struct SurfaceOutput {
    instance: String,
    grid_size: usize,
    seed: Option<u64>,
    depots: Vec<Point>,
    cities: Vec<CitySource>,
    clients: Vec<Point>,
    values: Vec<Vec<f64>>,
}

pub fn demand_surface(
    instance_path: PathBuf,
    seed: Option<u64>,
    output_file: Option<PathBuf>,
) -> Result<()> {
    let instance = load_instance(&instance_path)?;
    let synthesizer = DemandSurfaceSynthesizer::new(&instance)?;
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let grid = synthesizer.synthesize(&mut rng);
    let (min, max) = grid.value_bounds();
    info!(
        "Demand grid for '{}': {}x{}, values in [{:.4}, {:.4}]",
        instance.name,
        grid.grid_size(),
        grid.grid_size(),
        min,
        max
    );

    match output_file {
        Some(path) if path.extension().map_or(false, |ext| ext == "csv") => {
            grid.write_csv(fs::File::create(&path)?)?;
            info!("Grid written to {}", path.display());
        }
        output_file => {
            let output = SurfaceOutput {
                instance: instance.name.clone(),
                grid_size: instance.grid_size,
                seed,
                depots: instance.depots.clone(),
                cities: instance.cities.clone(),
                clients: instance.clients.clone(),
                values: grid.rows(),
            };
            match output_file {
                Some(path) => {
                    fs::write(&path, jsonify(&output))?;
                    info!("Grid written to {}", path.display());
                }
                None => println!("{}", jsonify(&output)),
            }
        }
    }
    Ok(())
}

pub fn aggregate_results(
    solutions_dir: PathBuf,
    config: Option<String>,
    output_dir: PathBuf,
) -> Result<()> {
    let config = match config {
        Some(config) => load_json_arg::<AnalysisConfig>(&config)?,
        None => AnalysisConfig::default(),
    };
    config.validate()?;

    let report = aggregate_directory(&solutions_dir, &config)?;
    for table in &report.tables {
        for path in export_table(table, &output_dir)? {
            info!("{} written to {}", table.kind, path.display());
        }
    }

    let stats = &report.stats;
    println!("Nb solutions calculated : {}", stats.instances_processed);
    if stats.instances_skipped > 0 {
        println!("Skipped directories : {}", stats.instances_skipped);
    }
    if stats.instances_rejected > 0 {
        println!("Rejected instances : {}", stats.instances_rejected);
    }
    println!(
        "Improved the gap for {} instances with 10 retailers, {} instances with 25 retailers (3 dc) and {} instances with 25 retailers (6 dc)",
        stats.improved_in(TableKind::Retailers10Depots3),
        stats.improved_in(TableKind::Retailers25Depots3),
        stats.improved_in(TableKind::Retailers25Depots6)
    );
    Ok(())
}
