use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use poimap::api::{ElementSource, OverpassClient};
use poimap::config::{DEFAULT_BIND, DEFAULT_LOCALITY, DEFAULT_ZOOM, FileConfig};
use poimap::domain::CategoryFilter;
use poimap::render::EMPTY_NOTICE;
use poimap::report::write_report;
use poimap::{pipeline, server};

/// Browse, export and map the shops and amenities of a locality
///
/// Examples:
///   # Write the CSV and HTML map for Ragusa into the current directory
///   poimap
///
///   # Only cafes in Modica, into ./out
///   poimap -l Modica -c cafe -o out
///
///   # Show which categories exist in Noto
///   poimap -l Noto --list-categories
///
///   # Browse interactively at http://127.0.0.1:8501
///   poimap --serve
#[derive(Parser, Debug)]
#[command(name = "poimap")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to config file (optional, auto-searches poimap.toml if not provided)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Locality name, matched against the OSM `name` of an area
    #[arg(short = 'l', long)]
    locality: Option<String>,

    /// Only keep this category (shop or amenity value); "Tutti" keeps all
    #[arg(short = 'c', long)]
    category: Option<String>,

    /// Directory for the CSV export and the HTML map
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,

    /// Print the categories available for the locality and exit
    #[arg(long)]
    list_categories: bool,

    /// Start the browser session instead of writing files
    #[arg(long)]
    serve: bool,

    /// Address for --serve
    #[arg(long)]
    bind: Option<String>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let file_config = match args.config {
        Some(ref path) => Some(FileConfig::from_path(path)?),
        None => FileConfig::load(),
    };

    let verbose = args.verbose || file_config.as_ref().map(|c| c.verbose).unwrap_or(false);
    init_tracing(verbose);

    let locality = args
        .locality
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.locality.clone()))
        .unwrap_or_else(|| DEFAULT_LOCALITY.to_string());
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.output_dir.clone()))
        .unwrap_or_else(|| PathBuf::from("."));
    let bind = args
        .bind
        .clone()
        .or_else(|| file_config.as_ref().and_then(|c| c.bind.clone()))
        .unwrap_or_else(|| DEFAULT_BIND.to_string());
    let zoom = file_config.as_ref().map(|c| c.zoom).unwrap_or(DEFAULT_ZOOM);
    let selection = args
        .category
        .as_deref()
        .map(CategoryFilter::from_choice)
        .unwrap_or_default();

    let overpass_config = file_config
        .as_ref()
        .and_then(|c| c.overpass.clone())
        .unwrap_or_default();

    if verbose {
        println!("Configuration:");
        println!("  Locality: {}", locality);
        println!("  Category: {}", selection);
        println!("  Overpass endpoint: {}", overpass_config.url);
        println!("  Query timeout: {}s", overpass_config.query_timeout_secs);
        if args.serve {
            println!("  Bind: {}", bind);
        } else {
            println!("  Output directory: {}", output_dir.display());
        }
        println!();
    }

    let client = OverpassClient::new(overpass_config).context("Failed to set up Overpass client")?;

    if args.serve {
        let settings = server::Settings {
            default_locality: locality,
            zoom,
        };
        return server::serve(&bind, client, settings);
    }

    if args.list_categories {
        return list_categories(&client, &locality);
    }

    let total_start = Instant::now();

    let spinner = create_spinner(&format!("Fetching activities in {} from OpenStreetMap...", locality));
    let start = Instant::now();
    let report = pipeline::run(&client, &locality, selection)
        .context("Failed to fetch activities from Overpass API")?;
    spinner.finish_with_message(format!(
        "Found {} activities, {} after filter [{:.1}s]",
        report.total,
        report.records.len(),
        start.elapsed().as_secs_f32()
    ));

    let spinner = create_spinner("Writing CSV and map...");
    let start = Instant::now();
    let files = write_report(&output_dir, &report, zoom)?;
    spinner.finish_with_message(format!(
        "Wrote report [{:.1}s]",
        start.elapsed().as_secs_f32()
    ));

    println!();
    println!("{} attività trovate.", report.records.len());
    if report.is_empty() {
        println!("{}", EMPTY_NOTICE);
    }
    println!();
    println!("CSV:  {}", files.csv.display());
    println!("Map:  {}", files.html.display());
    println!();
    println!(
        "Done! Total time: {:.1}s",
        total_start.elapsed().as_secs_f32()
    );

    Ok(())
}

fn list_categories(source: &dyn ElementSource, locality: &str) -> Result<()> {
    let spinner = create_spinner(&format!("Fetching activities in {}...", locality));
    let report = pipeline::run(source, locality, CategoryFilter::All)?;
    spinner.finish_with_message(format!("Found {} activities", report.total));

    for (category, count) in report.category_counts() {
        println!("{:>6}  {}", count, category);
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}
