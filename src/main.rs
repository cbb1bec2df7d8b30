use clap::Parser;
use indexmap::IndexMap;
use movie_scrape::{Credentials, DiagnosticLog, EnrichConfig, Enricher, MovieQuery, Region};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Enrich a list of movies with FilmAffinity synopsis/critics and IMDb rating.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON object mapping movie title to release year
    #[arg(short, long)]
    input: PathBuf,

    /// Where to write the enriched JSON (stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// dotenv file with IMDB_EMAIL and IMDB_PASSWORD
    #[arg(long, default_value = "credentials.env")]
    credentials: PathBuf,

    /// Critic excerpts to keep per movie
    #[arg(long, default_value_t = movie_scrape::config::DEFAULT_NUMBER_CRITICS)]
    number_critics: usize,

    /// FilmAffinity edition
    #[arg(long, value_enum, default_value_t = Region::En)]
    region: Region,

    /// Append-only failure log
    #[arg(long, default_value = "log.txt")]
    log_file: PathBuf,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "info,movie_scrape=debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let input = std::fs::read_to_string(&args.input)?;
    let movies: IndexMap<String, i32> = serde_json::from_str(&input)?;
    let queries: Vec<MovieQuery> = movies
        .into_iter()
        .map(|(title, year)| MovieQuery::new(title, year))
        .collect();

    let credentials = Credentials::from_env_file(&args.credentials)?;
    let config = EnrichConfig::for_region(args.region)
        .with_number_critics(args.number_critics)
        .with_request_timeout(Duration::from_secs(args.timeout_secs));
    let enricher = Enricher::with_http(credentials, config, DiagnosticLog::new(&args.log_file))?;

    let records = enricher.enrich(&queries).await;
    let complete = records.values().filter(|r| r.is_complete()).count();
    tracing::info!(total = records.len(), complete, "Enrichment finished");

    let json = serde_json::to_string_pretty(&records)?;
    match args.output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
