//! docchat CLI - upload a document, ask questions about it, get a summary
//!
//! The CLI is only a presentation layer: it raises intents on the
//! workflow coordinator from docchat-core and renders the state it publishes.

mod chat;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use docchat_core::config::ConfigManager;
use docchat_core::{Config, Operation, SelectedDocument, WorkflowCoordinator};

#[derive(Parser)]
#[command(name = "docchat")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chat with a document through a document service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Document service base address (overrides config and DOCCHAT_BACKEND_URL)
    #[arg(short, long, global = true)]
    backend: Option<String>,

    /// Config file (defaults to <config dir>/docchat/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a document to the service
    Upload {
        /// Document to upload
        path: PathBuf,
    },

    /// Ask a question about the uploaded document
    Ask {
        /// The question
        question: String,
    },

    /// Get a summary of the uploaded document
    Summary,

    /// Interactive chat mode
    Chat {
        /// Select this document before starting
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show the resolved configuration
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<(ConfigManager, Config)> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };

    // Config file < DOCCHAT_BACKEND_URL < --backend
    let mut config = manager.resolve()?;
    if let Some(backend) = &cli.backend {
        config = config.with_base_address(backend.clone());
        config.validate()?;
    }

    Ok((manager, config))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let (manager, config) = load_config(&cli)?;

    // Logs go to stderr so they never interleave with rendered results
    let filter = if cli.verbose {
        "info,docchat_core=debug".to_string()
    } else {
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("warn,docchat_core={}", config.general.log_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let coordinator = WorkflowCoordinator::from_config(&config)?;

    match cli.command.unwrap_or(Commands::Chat { file: None }) {
        Commands::Upload { path } => {
            coordinator.select_document(SelectedDocument::from_path(&path)?);
            let resolution = coordinator.submit_document().await;
            render::report(Operation::Upload, &coordinator.snapshot(), resolution)
        }
        Commands::Ask { question } => {
            coordinator.set_question(question);
            let resolution = coordinator.submit_question().await;
            render::report(Operation::Ask, &coordinator.snapshot(), resolution)
        }
        Commands::Summary => {
            let resolution = coordinator.request_summary().await;
            render::report(Operation::Summary, &coordinator.snapshot(), resolution)
        }
        Commands::Chat { file } => chat::run(&coordinator, file).await,
        Commands::Config => {
            render::config(manager.config_path(), &config)?;
            Ok(())
        }
    }
}
