//! DishDive: review-driven dish recommendation server.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use dishdive_core::DishDiveConfig;
use dishdive_llm::{LLMConfig, LlmClient};
use dishdive_normalize::{AggregateRecomputer, NormalizationService};
use dishdive_store::{SourceType, SqliteStore};

mod routes;
mod state;

use state::AppState;

fn resolve_data_dir() -> PathBuf {
    std::env::var("DISHDIVE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn open_store(config: &DishDiveConfig) -> anyhow::Result<Arc<SqliteStore>> {
    let store = SqliteStore::open(&config.data_paths.db)
        .map_err(|e| anyhow::anyhow!("Failed to open store: {}", e))?;
    Ok(Arc::new(store))
}

fn print_usage() {
    println!("DishDive: review-driven dish recommendation server");
    println!();
    println!("Usage: dishdive [command]");
    println!();
    println!("Commands:");
    println!("  (none) | serve                          Start the server");
    println!("  recompute [data-dir]                    Recompute dish and restaurant aggregates");
    println!("  normalize <type> <source> <dish> <res>  Re-run normalization for one review");
    println!("  help                                    Show this help message");
}

fn parse_id(raw: &str, what: &str) -> anyhow::Result<i64> {
    raw.parse()
        .map_err(|_| anyhow::anyhow!("Invalid {}: {}", what, raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "serve" => {}
            "recompute" => {
                let data_dir = args.get(2).map(PathBuf::from).unwrap_or_else(resolve_data_dir);
                let config = DishDiveConfig::from_env(&data_dir)?;
                let store = open_store(&config)?;
                let report = AggregateRecomputer::new(store).run()?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            "normalize" => {
                if args.len() < 6 {
                    eprintln!("Usage: dishdive normalize <user|web> <source-id> <dish-id> <restaurant-id>");
                    std::process::exit(1);
                }
                let source_type: SourceType = args[2].parse().map_err(|e: String| anyhow::anyhow!(e))?;
                let source_id = parse_id(&args[3], "source id")?;
                let dish_id = parse_id(&args[4], "dish id")?;
                let res_id = parse_id(&args[5], "restaurant id")?;

                let config = DishDiveConfig::from_env(resolve_data_dir())?;
                let store = open_store(&config)?;
                let report = NormalizationService::new(store)?.run(source_type, source_id, dish_id, res_id)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'dishdive help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = DishDiveConfig::from_env(&data_dir)?;
    let port = config.port;
    let store = open_store(&config)?;

    let llm_config = LLMConfig::load(&config.data_paths.llm_config_file);
    let client = LlmClient::new(&llm_config, config.workers.extract_timeout())?;
    match client.target() {
        Some(target) => info!("Extraction model: {} ({})", target.provider, target.model),
        None => info!("No extraction model configured; reviews use rule-based extraction"),
    }

    let state = Arc::new(AppState::new(config, store, Arc::new(client))?);
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("DishDive server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
