//! Binary entry point for dexcache.
//!
//! A small CLI over the library: browse regions, load ranges and look up
//! single records against the live API.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// CLI output goes to stdout, progress and errors to stderr
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use dexcache::models::{Pokemon, REGIONS, get_region_by_id};
use dexcache::observability;
use dexcache::{DexConfig, Error, PokeApiClient, RegionFetcher};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

/// Dexcache - fetch and cache Pokédex data by region.
#[derive(Parser)]
#[command(name = "dexcache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "DEXCACHE_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// List the regions.
    Regions,

    /// Load a region and print one page of it.
    Region {
        /// Region id, e.g. `kanto`.
        id: String,

        /// Page to print (1-based).
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Load an inclusive id range.
    Range {
        /// First id.
        start: u32,

        /// Last id.
        end: u32,

        /// Print records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Fetch a single record.
    Pokemon {
        /// Dex number.
        id: u32,

        /// Print the record as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Fetch species data by name.
    Species {
        /// Species name.
        name: String,
    },

    /// Print one page of the directory listing.
    List {
        /// Page size.
        #[arg(short, long, default_value = "20")]
        limit: u32,

        /// Zero-based offset.
        #[arg(short, long, default_value = "0")]
        offset: u32,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = observability::init_from_env(cli.verbose) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    match run_command(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Loads configuration: file (explicit or default location), then env.
fn load_config(path: Option<&std::path::Path>) -> dexcache::Result<DexConfig> {
    let config = match path {
        Some(path) => DexConfig::load_from_file(path)?,
        None => DexConfig::load_default(),
    };
    Ok(config.with_env_overrides())
}

/// Runs the selected command.
async fn run_command(command: Commands, config: DexConfig) -> dexcache::Result<()> {
    let client = Arc::new(PokeApiClient::from_config(&config));
    let fetcher = RegionFetcher::new(Arc::clone(&client), config.batch.clone());

    match command {
        Commands::Regions => {
            cmd_regions();
            Ok(())
        },
        Commands::Region { id, page } => cmd_region(&fetcher, &id, page, config.items_per_page).await,
        Commands::Range { start, end, json } => cmd_range(&fetcher, start, end, json).await,
        Commands::Pokemon { id, json } => cmd_pokemon(&client, id, json).await,
        Commands::Species { name } => cmd_species(&client, &name).await,
        Commands::List { limit, offset } => cmd_list(&client, limit, offset).await,
    }
}

fn cmd_regions() {
    for region in &REGIONS {
        println!(
            "{:<8} gen {}  #{:04}-#{:04}  {:>3} pokemon  {}",
            region.id,
            region.generation,
            region.start_id,
            region.end_id,
            region.count(),
            region.description
        );
    }
}

async fn cmd_region(
    fetcher: &RegionFetcher,
    region_id: &str,
    page: usize,
    per_page: usize,
) -> dexcache::Result<()> {
    let region = get_region_by_id(region_id)
        .ok_or_else(|| Error::InvalidInput(format!("unknown region: {region_id}")))?;

    let pokemon = fetcher.fetch_region(region, Some(&print_progress)).await;
    eprintln!();

    let per_page = per_page.max(1);
    let pages = pokemon.len().div_ceil(per_page).max(1);
    let page = page.clamp(1, pages);

    println!("{} ({} of {} loaded), page {page}/{pages}", region.name, pokemon.len(), region.count());
    for p in pokemon.iter().skip((page - 1) * per_page).take(per_page) {
        println!("{}", summary_line(p));
    }
    Ok(())
}

async fn cmd_range(fetcher: &RegionFetcher, start: u32, end: u32, json: bool) -> dexcache::Result<()> {
    if start == 0 || end < start {
        return Err(Error::InvalidInput(format!("invalid range {start}-{end}")));
    }

    let report = fetcher
        .fetch_range_report(start, end, Some(&print_progress))
        .await;
    eprintln!();

    if json {
        println!("{}", to_json(&report.pokemon)?);
    } else {
        for p in &report.pokemon {
            println!("{}", summary_line(p));
        }
    }

    let strategy = report.strategy.map_or("none", |s| s.as_str());
    eprintln!(
        "loaded {}/{} via {strategy}",
        report.pokemon.len(),
        report.requested
    );
    if !report.failed_ids.is_empty() {
        eprintln!("failed ids: {:?}", report.failed_ids);
    }
    Ok(())
}

async fn cmd_pokemon(client: &PokeApiClient, id: u32, json: bool) -> dexcache::Result<()> {
    let pokemon = client.try_fetch_pokemon(id).await?;
    if json {
        println!("{}", to_json(&pokemon)?);
        return Ok(());
    }

    println!("{}", summary_line(&pokemon));
    println!("height {}  weight {}", pokemon.height, pokemon.weight);
    for stat in &pokemon.stats {
        println!("  {:<16} {}", stat.name, stat.value);
    }
    println!("  {:<16} {}", "total", pokemon.total_base_stats());
    let abilities: Vec<_> = pokemon.abilities.iter().map(|a| a.name.as_str()).collect();
    println!("abilities: {}", abilities.join(", "));
    Ok(())
}

async fn cmd_species(client: &PokeApiClient, name: &str) -> dexcache::Result<()> {
    let species = client.try_fetch_species(name).await?;
    println!("#{} {}", species.id, species.name);
    if let Some(text) = species.english_flavor_text() {
        println!("{text}");
    }
    if let Some(url) = species.evolution_chain_url() {
        if let Some(chain) = client.fetch_evolution_chain(url).await {
            println!("evolution: {}", chain.species_names().join(" -> "));
        }
    }
    Ok(())
}

async fn cmd_list(client: &PokeApiClient, limit: u32, offset: u32) -> dexcache::Result<()> {
    let list = client.try_fetch_pokemon_list(limit, offset).await?;
    for item in &list.results {
        match item.id() {
            Some(id) => println!("#{id:04} {}", item.name),
            None => println!("      {}", item.name),
        }
    }
    eprintln!("{} of {} total", list.results.len(), list.count);
    Ok(())
}

fn print_progress(current: usize, total: usize) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\rloading {current}/{total}");
    let _ = stderr.flush();
}

fn summary_line(pokemon: &Pokemon) -> String {
    format!("#{:04} {:<14} {}", pokemon.id, pokemon.name, pokemon.types.join("/"))
}

fn to_json<T: serde::Serialize>(value: &T) -> dexcache::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| Error::OperationFailed {
        operation: "serialize_output".to_string(),
        cause: e.to_string(),
    })
}
