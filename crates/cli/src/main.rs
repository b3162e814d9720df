mod config;
mod error;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use runtime::{OllamaBackend, Orchestrator, tools};
use server::ServerState;
use storage::ChatStore;

use config::Config;
use error::Result;

#[derive(Parser)]
#[command(name = "rekaliber")]
#[command(about = "Asistente de chat de Rekaliber con herramientas de datos", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (default: rekaliber.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP chat service
    Serve,
    /// Create the database schema and load the demo catalogue
    InitDb,
    /// List the registered tools
    Tools,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve) | None => cmd_serve(config).await,
        Some(Commands::InitDb) => cmd_init_db(&config),
        Some(Commands::Tools) => cmd_tools(),
    }
}

fn init_tracing(debug: bool) {
    let default_directive = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn cmd_serve(config: Config) -> Result<()> {
    init_tracing(config.server.debug);

    let addr = config.addr()?;
    let store = Arc::new(open_store(&config.storage.db_path)?);
    let seeded = store.seed_demo_data()?;

    let registry = tools::default_registry(Arc::clone(&store))?;
    let tool_count = registry.len();

    let backend = OllamaBackend::builder(&config.model.name)
        .base_url(&config.model.base_url)
        .temperature(config.model.temperature)
        .build();

    let orchestrator = Orchestrator::new(backend, registry)
        .with_deadline(Duration::from_secs(config.model.timeout_secs))
        .with_verbose(config.server.debug);

    println!("{}", "=".repeat(50));
    println!("🚀 Rekaliber Chat — Ollama");
    println!("{}", "=".repeat(50));
    println!("📍 Dirección: {addr}");
    println!("🤖 Modelo: {}", config.model.name);
    println!("🔧 Tools disponibles: {tool_count}");
    println!("💾 Base de datos: {}", config.storage.db_path.display());
    if seeded > 0 {
        println!("✅ Catálogo inicial cargado ({seeded} propiedades)");
    }
    println!("{}", "=".repeat(50));

    let state = Arc::new(ServerState::new(
        orchestrator,
        store,
        &config.model.name,
        config.server.debug,
    ));

    server::serve(state, addr).await?;
    Ok(())
}

fn cmd_init_db(config: &Config) -> Result<()> {
    let store = open_store(&config.storage.db_path)?;
    let seeded = store.seed_demo_data()?;

    println!(
        "Base de datos inicializada en {}",
        config.storage.db_path.display()
    );
    if seeded > 0 {
        println!("✅ {seeded} propiedades de ejemplo insertadas");
    } else {
        println!("✅ El catálogo ya contenía datos");
    }
    Ok(())
}

fn cmd_tools() -> Result<()> {
    // The registry only needs a store for the property tools; an empty
    // in-memory one is enough to list names and descriptions.
    let store = Arc::new(ChatStore::in_memory()?);
    let registry = tools::default_registry(store)?;

    println!("{:<26}  DESCRIPCIÓN", "TOOL");
    println!("{}", "-".repeat(80));
    for (name, description) in registry.descriptors() {
        println!("{name:<26}  {description}");
    }
    Ok(())
}

fn open_store(db_path: &Path) -> Result<ChatStore> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(ChatStore::open(db_path)?)
}
