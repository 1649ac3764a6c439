use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use neo_explorer::config::{
    CAD_FILE_ENV, DEFAULT_CAD_FILE, DEFAULT_NEO_FILE, NEO_FILE_ENV,
};
use neo_explorer::{create_filters, limit, write_results, DataConfig, FilterOptions, NeoDatabase};

#[derive(Parser)]
#[command(name = "neo")]
#[command(version, about = "Explore near-Earth objects and their close approaches to Earth")]
struct Cli {
    /// Path to the NEO catalog (CSV)
    #[arg(long, global = true, env = NEO_FILE_ENV, default_value = DEFAULT_NEO_FILE)]
    neofile: PathBuf,

    /// Path to the close-approach data (JSON)
    #[arg(long, global = true, env = CAD_FILE_ENV, default_value = DEFAULT_CAD_FILE)]
    cadfile: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one NEO by designation or name
    Inspect {
        /// Primary designation
        #[arg(short, long, conflicts_with = "name", required_unless_present = "name")]
        pdes: Option<String>,
        /// IAU name
        #[arg(short, long)]
        name: Option<String>,
        /// Also list every close approach of the NEO
        #[arg(short, long)]
        verbose: bool,
    },
    /// Find close approaches matching the given criteria
    Query(QueryArgs),
}

#[derive(Args)]
struct QueryArgs {
    /// Only approaches on this date (YYYY-MM-DD)
    #[arg(short, long, value_parser = parse_date)]
    date: Option<NaiveDate>,
    /// Only approaches on or after this date
    #[arg(short, long, value_parser = parse_date)]
    start_date: Option<NaiveDate>,
    /// Only approaches on or before this date
    #[arg(short, long, value_parser = parse_date)]
    end_date: Option<NaiveDate>,
    /// Minimum approach distance, au
    #[arg(long)]
    min_distance: Option<f64>,
    /// Maximum approach distance, au
    #[arg(long)]
    max_distance: Option<f64>,
    /// Minimum relative velocity, km/s
    #[arg(long)]
    min_velocity: Option<f64>,
    /// Maximum relative velocity, km/s
    #[arg(long)]
    max_velocity: Option<f64>,
    /// Minimum NEO diameter, km
    #[arg(long)]
    min_diameter: Option<f64>,
    /// Maximum NEO diameter, km
    #[arg(long)]
    max_diameter: Option<f64>,
    /// Only potentially hazardous NEOs
    #[arg(long, conflicts_with = "not_hazardous")]
    hazardous: bool,
    /// Only NEOs that are not potentially hazardous
    #[arg(long)]
    not_hazardous: bool,
    /// Maximum number of results (0 = no limit)
    #[arg(short, long, default_value_t = 10)]
    limit: usize,
    /// Write results to a .csv or .json file instead of printing them
    #[arg(short, long)]
    outfile: Option<PathBuf>,
}

impl QueryArgs {
    fn filter_options(&self) -> FilterOptions {
        FilterOptions {
            date: self.date,
            start_date: self.start_date,
            end_date: self.end_date,
            distance_min: self.min_distance,
            distance_max: self.max_distance,
            velocity_min: self.min_velocity,
            velocity_max: self.max_velocity,
            diameter_min: self.min_diameter,
            diameter_max: self.max_diameter,
            hazardous: match (self.hazardous, self.not_hazardous) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            },
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("'{}' is not a YYYY-MM-DD date: {}", value, e))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    println!("☄️  Loading NEO data...");
    let db = DataConfig::new(&cli.neofile, &cli.cadfile).load_database()?;
    println!(
        "✓ Loaded {} NEOs and {} close approaches\n",
        db.neos().len(),
        db.approaches().len()
    );

    match cli.command {
        Commands::Inspect { pdes, name, verbose } => run_inspect(&db, pdes, name, verbose),
        Commands::Query(args) => run_query(&db, &args),
    }
}

fn run_inspect(
    db: &NeoDatabase,
    pdes: Option<String>,
    name: Option<String>,
    verbose: bool,
) -> Result<()> {
    let neo = match (&pdes, &name) {
        (Some(pdes), _) => db.get_neo_by_designation(pdes),
        (None, Some(name)) => db.get_neo_by_name(name),
        (None, None) => bail!("either --pdes or --name is required"),
    };

    let Some(neo) = neo else {
        println!("❌ No matching NEO exists in the database.");
        return Ok(());
    };

    println!("{}", neo);
    if verbose {
        for approach in db.approaches_of(neo) {
            println!("- {}", approach);
        }
    }

    Ok(())
}

fn run_query(db: &NeoDatabase, args: &QueryArgs) -> Result<()> {
    let filters = create_filters(&args.filter_options());
    match &args.outfile {
        Some(path) => {
            let results = limit(db.query_linked(&filters), Some(args.limit));
            let written = write_results(results, path)?;
            println!("✓ Wrote {} close approaches to {}", written, path.display());
        }
        None => {
            let results = limit(db.query(&filters), Some(args.limit));
            let mut shown = 0;
            for approach in results {
                println!("{}", approach);
                shown += 1;
            }
            if shown == 0 {
                println!("No close approaches match the given criteria.");
            }
        }
    }

    Ok(())
}
