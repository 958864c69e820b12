use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use console::style;
use tracing::info;
use uuid::Uuid;

use crate::chat::ChatOrchestrator;
use crate::config::{Config, Credentials, get_config_dir};
use crate::embeddings::NvidiaClient;
use crate::llm::GroqClient;
use crate::pipeline::IndexingPipeline;
use crate::session::SessionStore;
use crate::vectordb::PineconeClient;
use crate::{ChatbotError, Result};

/// Run the offline indexing pipeline: catalog CSV into the hosted index.
#[inline]
pub async fn run_index(catalog: PathBuf, index_name: Option<String>) -> Result<()> {
    let mut config = Config::load().map_err(|e| ChatbotError::Config(e.to_string()))?;
    if let Some(name) = index_name {
        config.index.name = name;
        config.index.validate()?;
    }
    let credentials = Credentials::from_env()?;

    let embedder = Arc::new(NvidiaClient::new(&config, &credentials.nvidia_api_key)?);
    let index = Arc::new(PineconeClient::new(&config, &credentials.pinecone_api_key)?);
    let ready_timeout = Duration::from_secs(config.index.ready_timeout_secs);

    let pipeline = IndexingPipeline::new(embedder, index, ready_timeout);
    let report = pipeline.build(&catalog).await?;

    println!(
        "Indexed {} documents into '{}'",
        style(report.documents).bold(),
        config.index.name
    );
    println!(
        "Index vector count: {} -> {}",
        report.vectors_before, report.vectors_after
    );

    Ok(())
}

/// Answer a single message and print the reply.
#[inline]
pub async fn run_ask(message: String, session_id: Option<String>) -> Result<()> {
    let orchestrator = build_orchestrator()?;
    let session_id = session_id.unwrap_or_else(new_session_id);

    let answer = orchestrator.respond(&session_id, &message).await?;
    println!("{answer}");

    Ok(())
}

/// Interactive chat loop on stdin. `exit` or `quit` ends the session.
#[inline]
pub async fn run_chat(session_id: Option<String>) -> Result<()> {
    let orchestrator = build_orchestrator()?;
    let session_id = session_id.unwrap_or_else(new_session_id);
    info!("Starting chat session '{}'", session_id);

    println!(
        "{}",
        style("I'm your personal assistant and I can help with product information and recommendations, order processing and order tracking.")
            .cyan()
    );
    println!("Type 'exit' or 'quit' to end the session.\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "exit" | "quit") {
            break;
        }

        let answer = orchestrator.respond(&session_id, message).await?;
        println!("{} {answer}\n", style("Bot:").cyan().bold());
    }

    println!("Goodbye!");
    Ok(())
}

/// Print the resolved settings with credentials redacted.
#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().map_err(|e| ChatbotError::Config(e.to_string()))?;
    let rendered =
        toml::to_string_pretty(&config).map_err(|e| ChatbotError::Config(e.to_string()))?;

    println!("Configuration directory: {}", get_config_dir()?.display());
    println!("{rendered}");

    for (name, set) in credential_status() {
        let status = if set {
            style("set").green()
        } else {
            style("missing").red()
        };
        println!("{name}: {status}");
    }

    Ok(())
}

/// Write a default config.toml for editing.
#[inline]
pub fn init_config() -> Result<()> {
    let path = Config::default()
        .save()
        .map_err(|e| ChatbotError::Config(e.to_string()))?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn build_orchestrator() -> Result<ChatOrchestrator> {
    let config = Config::load().map_err(|e| ChatbotError::Config(e.to_string()))?;
    let credentials = Credentials::from_env()?;

    let embedder = Arc::new(NvidiaClient::new(&config, &credentials.nvidia_api_key)?);
    let index = Arc::new(PineconeClient::new(&config, &credentials.pinecone_api_key)?);
    let model = Arc::new(GroqClient::new(&config, &credentials.groq_api_key)?);
    let sessions = Arc::new(SessionStore::new());

    Ok(ChatOrchestrator::new(
        embedder,
        index,
        model,
        sessions,
        &config.retrieval,
    ))
}

fn new_session_id() -> String {
    Uuid::new_v4().to_string()
}

fn credential_status() -> [(&'static str, bool); 3] {
    use crate::config::settings::{GROQ_API_KEY_VAR, NVIDIA_API_KEY_VAR, PINECONE_API_KEY_VAR};

    [
        (
            NVIDIA_API_KEY_VAR,
            std::env::var(NVIDIA_API_KEY_VAR).is_ok(),
        ),
        (
            PINECONE_API_KEY_VAR,
            std::env::var(PINECONE_API_KEY_VAR).is_ok(),
        ),
        (GROQ_API_KEY_VAR, std::env::var(GROQ_API_KEY_VAR).is_ok()),
    ]
}
