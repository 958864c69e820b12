use std::path::PathBuf;

use bazaar_chat::Result;
use bazaar_chat::commands::{init_config, run_ask, run_chat, run_index, show_config};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bazaar-chat")]
#[command(about = "A retrieval-augmented e-commerce assistant over a product catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Embed a catalog CSV and upload it to the vector index
    Index {
        /// Path to the catalog CSV file
        #[arg(long)]
        catalog: PathBuf,
        /// Override the configured index name
        #[arg(long)]
        index_name: Option<String>,
    },
    /// Start an interactive chat session
    Chat {
        /// Reuse an existing session id instead of generating one
        #[arg(long)]
        session: Option<String>,
    },
    /// Ask a single question and print the reply
    Ask {
        /// The message to send
        #[arg(long)]
        message: String,
        /// Reuse an existing session id instead of generating one
        #[arg(long)]
        session: Option<String>,
    },
    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            catalog,
            index_name,
        } => {
            run_index(catalog, index_name).await?;
        }
        Commands::Chat { session } => {
            run_chat(session).await?;
        }
        Commands::Ask { message, session } => {
            run_ask(message, session).await?;
        }
        Commands::Config { show } => {
            if show {
                show_config()?;
            } else {
                init_config()?;
            }
        }
    }

    Ok(())
}
