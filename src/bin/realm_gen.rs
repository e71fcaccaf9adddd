use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use realm_gen::export::{self, load_realm, save_realm};
use realm_gen::model::RealmMap;
use realm_gen::worldgen::{
    GenerationReport, PlacementReport, RealmGenConfig, TerrainStrategy, generate_realm_with_report,
    placement_violations,
};

#[derive(Parser, Debug)]
#[command(name = "realm-gen")]
#[command(about = "Generate and inspect hex-map realms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a realm and print or save its JSON document
    Generate {
        /// Terrain strategy: random, balanced, weighted or clustered
        #[arg(long)]
        strategy: Option<TerrainStrategy>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        #[arg(long)]
        rows: Option<u32>,

        #[arg(long)]
        cols: Option<u32>,

        /// Realm name (also used for the output filename)
        #[arg(long)]
        name: Option<String>,

        /// JSON file with generation settings; flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Directory to write the realm document into (prints to stdout if omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Summarize a realm document and re-check its placement rules
    Inspect {
        /// Path to a realm JSON document
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate {
            strategy,
            seed,
            rows,
            cols,
            name,
            config,
            out,
        } => {
            let mut config = match config {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading config {}", path.display()))?;
                    serde_json::from_str::<RealmGenConfig>(&text)
                        .with_context(|| format!("parsing config {}", path.display()))?
                }
                None => RealmGenConfig::default(),
            };
            if let Some(strategy) = strategy {
                config.strategy = strategy;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(rows) = rows {
                config.rows = rows;
            }
            if let Some(cols) = cols {
                config.cols = cols;
            }
            if let Some(name) = name {
                config.name = name;
            }
            config.validate().context("invalid generation settings")?;
            generate(&config, out)
        }
        Command::Inspect { file } => inspect(file),
    }
}

fn generate(config: &RealmGenConfig, out: Option<PathBuf>) -> anyhow::Result<()> {
    info!(
        "Generating {}x{} realm '{}' (strategy {}, seed {})",
        config.rows, config.cols, config.name, config.strategy, config.seed
    );
    let (realm, report) = generate_realm_with_report(config);
    log_shortfall(&report);

    match out {
        Some(dir) => {
            print_terrain_stats(&realm);
            let path = save_realm(&realm, &dir)
                .with_context(|| format!("saving realm to {}", dir.display()))?;
            println!("Wrote {}", path.display());
        }
        None => {
            // stdout carries only the document here, so stats go to the log.
            for (kind, count) in realm.terrain_stats() {
                info!("{:<10} {count}", kind.display_name());
            }
            println!("{}", export::to_json(&realm)?);
        }
    }
    Ok(())
}

fn log_shortfall(report: &GenerationReport) {
    let categories: [(&str, PlacementReport); 3] = [
        ("holdings", report.holdings),
        ("landmarks", report.landmarks),
        ("myths", report.myths),
    ];
    for (label, r) in categories {
        if r.is_complete() {
            info!("Placed {}/{} {label}", r.placed, r.requested);
        } else {
            warn!(
                "Placed {}/{} {label} ({} skipped)",
                r.placed,
                r.requested,
                r.shortfall()
            );
        }
    }
}

fn print_terrain_stats(realm: &RealmMap) {
    println!("Terrain:");
    for (kind, count) in realm.terrain_stats() {
        println!("  {:<10} {count}", kind.display_name());
    }
}

fn inspect(file: PathBuf) -> anyhow::Result<()> {
    let realm = load_realm(&file).with_context(|| format!("loading {}", file.display()))?;

    println!("Realm: {}", realm.name);
    println!("Size: {} rows x {} cols", realm.rows(), realm.cols());
    println!(
        "Version {} (created {}, modified {})",
        realm.metadata.version,
        realm.metadata.created_at.to_rfc3339(),
        realm.metadata.last_modified.to_rfc3339()
    );
    print_terrain_stats(&realm);
    println!("Features:");
    println!("  holdings   {}", realm.holdings().len());
    println!("  landmarks  {}", realm.landmarks().len());
    println!("  myths      {}", realm.myths().len());
    println!("  barriers   {}", realm.barriers().len());

    let violations = placement_violations(&realm);
    if violations.is_empty() {
        println!("Placement rules: ok");
    } else {
        println!("Placement rules: {} violation(s)", violations.len());
        for v in &violations {
            println!("  {v}");
        }
    }
    Ok(())
}
