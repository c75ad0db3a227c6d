//! Jikan client CLI application.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::future::join_all;
use jikan_client::api::{AnimeDetailBundle, CharacterDetailBundle, MangaDetailBundle, RandomKind};
use jikan_client::{ApiError, Envelope, JikanClient, RequestDescriptor};
use serde_json::{json, Value};
use shared::Config;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one or more raw requests concurrently, e.g. `/top/anime?page=2`
    Get {
        #[arg(required = true)]
        requests: Vec<String>,
    },
    /// Top anime ranking
    TopAnime {
        #[arg(short, long, default_value_t = 1)]
        page: u32,
        /// airing, upcoming, bypopularity, favorite
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Search anime by title
    SearchAnime {
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Everything the anime detail view loads for one MAL ID
    Anime { id: u32 },
    /// Everything the manga detail view loads for one MAL ID
    Manga { id: u32 },
    /// Everything the character detail view loads for one MAL ID
    Character { id: u32 },
    /// A random entry
    Random {
        #[arg(value_enum)]
        kind: RandomArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RandomArg {
    Anime,
    Manga,
    Character,
    Person,
}

impl From<RandomArg> for RandomKind {
    fn from(arg: RandomArg) -> Self {
        match arg {
            RandomArg::Anime => RandomKind::Anime,
            RandomArg::Manga => RandomKind::Manga,
            RandomArg::Character => RandomKind::Character,
            RandomArg::Person => RandomKind::Person,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = shared::LogConfig::from_config(&config, "jikan-client");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(
        config_file = %args.config.display(),
        base_url = %config.jikan.base_url,
        "Jikan client starting"
    );

    let client = JikanClient::from_config(&config.jikan).context("Failed to create Jikan client")?;

    let output = match args.command {
        Command::Get { requests } => {
            let descriptors = requests
                .iter()
                .map(|raw| raw.parse::<RequestDescriptor>())
                .collect::<Result<Vec<_>, _>>()
                .context("Invalid request")?;

            let pending: Vec<_> = descriptors.into_iter().map(|r| client.fetch(r)).collect();
            let results = join_all(pending).await;

            let rendered: Vec<Value> = requests
                .iter()
                .zip(results)
                .map(|(raw, result)| json!({ "request": raw, "response": render(result) }))
                .collect();
            Value::Array(rendered)
        }
        Command::TopAnime { page, filter } => {
            let envelope = client.top_anime(page, filter.as_deref()).await?;
            serde_json::to_value(envelope)?
        }
        Command::SearchAnime { query, page } => {
            let envelope = client.search_anime(&query, page).await?;
            serde_json::to_value(envelope)?
        }
        Command::Anime { id } => render_anime(client.anime_detail_bundle(id).await),
        Command::Manga { id } => render_manga(client.manga_detail_bundle(id).await),
        Command::Character { id } => render_character(client.character_detail_bundle(id).await),
        Command::Random { kind } => {
            let envelope = client.random(kind.into()).await?;
            serde_json::to_value(envelope)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);

    let stats = client.governor().stats();
    info!(
        dispatched = stats.dispatched,
        succeeded = stats.succeeded,
        failed = stats.failed,
        "Jikan client finished"
    );

    Ok(())
}

fn render(result: Result<Envelope, ApiError>) -> Value {
    match result {
        Ok(envelope) => serde_json::to_value(envelope).unwrap_or(Value::Null),
        Err(e) => {
            warn!(error = %e, "Request failed");
            json!({ "error": e.to_string() })
        }
    }
}

fn render_anime(bundle: AnimeDetailBundle) -> Value {
    json!({
        "full": render(bundle.full),
        "characters": render(bundle.characters),
        "videos": render(bundle.videos),
        "statistics": render(bundle.statistics),
        "recommendations": render(bundle.recommendations),
        "streaming": render(bundle.streaming),
        "themes": render(bundle.themes),
    })
}

fn render_manga(bundle: MangaDetailBundle) -> Value {
    json!({
        "full": render(bundle.full),
        "characters": render(bundle.characters),
        "statistics": render(bundle.statistics),
        "recommendations": render(bundle.recommendations),
    })
}

fn render_character(bundle: CharacterDetailBundle) -> Value {
    json!({
        "full": render(bundle.full),
        "anime": render(bundle.anime),
        "manga": render(bundle.manga),
        "voices": render(bundle.voices),
    })
}
