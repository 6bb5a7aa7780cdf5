//! Makani Suggest - Main entrypoint.
//!
//! This is the main entry point for the Makani Suggest server.
//! It loads configuration, initializes logging, and runs the requested command.

use clap::{Parser, Subcommand};
use makani_suggest_lib::config::server::TransportType;
use makani_suggest_lib::config::{self, ConfigLoader, LogConfig, MakaniConfig};
use makani_suggest_lib::error::{MakaniError, MakaniResult};
use makani_suggest_lib::gateway::QueryGateway;
use makani_suggest_lib::protocol::jsonrpc::{create_handler, ServerState};
use makani_suggest_lib::seed::seed_file;
use makani_suggest_lib::store::{FileWordStore, WordStore};
use makani_suggest_lib::sync::IndexSynchronizer;
use makani_suggest_lib::transport::{serve_stdio, SessionRegistry, TcpServer};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the Makani Suggest server.
#[derive(Parser, Debug)]
#[clap(name = "Makani Suggest", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser, global = true)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Start the server
    Start,

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },

    /// Load a newline-separated word file into the store
    Seed {
        /// Path to the word file
        #[clap(short, long, value_parser)]
        file: PathBuf,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` wins over the configured level. Logs always go to stderr so the
/// stdio transport keeps stdout for protocol traffic.
fn init_logging(log: &LogConfig) -> MakaniResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.level))
        .map_err(|e| MakaniError::Custom(format!("Invalid log filter: {e}")))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location)
        .with_thread_names(true);

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_error::ErrorLayer::default());

    let result = if log.json {
        registry.with(fmt_layer.json()).try_init()
    } else {
        registry.with(fmt_layer.pretty()).try_init()
    };

    result.map_err(|e| MakaniError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Picks the explicit `--config` path, or the default file if it exists.
fn config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let default = Path::new(config::DEFAULT_CONFIG_PATH);
        default.exists().then(|| default.to_path_buf())
    })
}

/// Loads configuration, falling back to default logging to report failures.
fn load_config_or_exit(loader: &ConfigLoader) -> MakaniConfig {
    match loader.load() {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&LogConfig::default());
            error!("Configuration error: {}", e);
            process::exit(1);
        }
    }
}

fn build_runtime(worker_threads: usize) -> MakaniResult<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .thread_name("makani-worker")
        .enable_all()
        .build()
        .map_err(MakaniError::Io)
}

/// Resolves once Ctrl-C is received.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Opens the store, loads the index, and serves until shutdown.
async fn run_server(config: MakaniConfig) -> MakaniResult<()> {
    let store = FileWordStore::open(&config.store.state_dir, config.store.sync_writes).await?;
    let store: Arc<dyn WordStore> = Arc::new(store);

    let synchronizer = IndexSynchronizer::bootstrap(store, config.limits.max_word_length).await?;
    let gateway = QueryGateway::new(synchronizer.index(), config.limits.clone());
    let sessions = SessionRegistry::new();

    let handler = create_handler(&ServerState {
        name: config.server.name.clone(),
        synchronizer,
        gateway,
        sessions: Arc::clone(&sessions),
    });

    match config.server.transport {
        TransportType::Tcp => {
            let server = TcpServer::bind(
                config.server.address,
                handler,
                sessions,
                config.server.max_connections,
                config.server.max_message_size,
            )
            .await?;
            server.run_until(shutdown_signal()).await?;
        }
        TransportType::Stdio => {
            let max_message_size = config.server.max_message_size;
            tokio::select! {
                result = serve_stdio(&handler, &sessions, max_message_size) => result?,
                _ = shutdown_signal() => {}
            }
        }
    }

    info!("Server stopped");
    Ok(())
}

/// Writes every valid line of `file` to the configured store.
async fn run_seed(config: MakaniConfig, file: PathBuf) -> MakaniResult<()> {
    let store = FileWordStore::open(&config.store.state_dir, config.store.sync_writes).await?;

    let report = seed_file(
        &store,
        &file,
        config.store.seed_batch_size,
        config.limits.max_word_length,
    )
    .await
    .map_err(|e| MakaniError::Custom(format!("{e:#}")))?;

    info!(
        inserted = report.inserted,
        already_present = report.accepted - report.inserted,
        skipped = report.blank + report.rejected,
        "Word file loaded"
    );
    Ok(())
}

/// Main entry point for the application.
fn main() -> MakaniResult<()> {
    // Parse command-line arguments
    let args = Args::parse();
    let config_loader = ConfigLoader::new(config_path(args.config), config::ENV_PREFIX);

    match args.command.unwrap_or(Command::Start) {
        Command::Start => {
            let config = load_config_or_exit(&config_loader);
            init_logging(&config.log)?;
            makani_suggest_lib::init();

            info!(
                "Starting {} with transport: {:?}, address: {}",
                config.server.name, config.server.transport, config.server.address
            );

            let runtime = build_runtime(config.server.worker_threads)?;
            runtime.block_on(run_server(config))
        }
        Command::Validate => {
            let config = load_config_or_exit(&config_loader);
            init_logging(&config.log)?;
            info!("Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            init_logging(&LogConfig::default())?;
            info!("Generating default configuration");
            let default_config = MakaniConfig::default();

            // Create parent directories if they don't exist
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent).map_err(MakaniError::Io)?;
            }

            let toml = toml::to_string_pretty(&default_config)
                .map_err(|e| MakaniError::Custom(format!("Failed to serialize config: {e}")))?;
            std::fs::write(&output, toml).map_err(MakaniError::Io)?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
        Command::Seed { file } => {
            let config = load_config_or_exit(&config_loader);
            init_logging(&config.log)?;
            makani_suggest_lib::init();

            let runtime = build_runtime(config.server.worker_threads)?;
            runtime.block_on(run_seed(config, file))
        }
    }
}
