//! Command-line access to the embedding and answer service.
//!
//! Vectors are printed as JSON arrays on stdout; answers are printed as plain text.
use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use docrag::{config, logging, service::EmbeddingService};
use serde_json::{Map, Value};

#[derive(Parser)]
#[command(
    name = "docrag-rag",
    about = "Embed document metadata and queries, or answer questions over contract excerpts"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Embed a metadata JSON object read from a file (`-` for stdin).
    EmbedMetadata { input: PathBuf },
    /// Embed a search query.
    EmbedQuery { query: String },
    /// Answer a question using contract excerpts read from files.
    Answer {
        #[arg(long)]
        query: String,
        #[arg(long = "context")]
        contexts: Vec<PathBuf>,
        #[arg(long = "contract-id")]
        contract_ids: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing("info");
    let config = config::load().context("failed to load configuration")?;
    let service = EmbeddingService::new(&config).context("failed to start embedding service")?;

    match cli.command {
        Command::EmbedMetadata { input } => {
            let metadata = read_metadata(&input)?;
            let vector = service.embed_metadata(&metadata).await?;
            println!("{}", serde_json::to_string(&vector)?);
        }
        Command::EmbedQuery { query } => {
            let vector = service.embed_query(&query).await?;
            println!("{}", serde_json::to_string(&vector)?);
        }
        Command::Answer {
            query,
            contexts,
            contract_ids,
        } => {
            let texts = contexts
                .iter()
                .map(|path| {
                    fs::read_to_string(path)
                        .with_context(|| format!("failed to read context {}", path.display()))
                })
                .collect::<Result<Vec<_>>>()?;
            let ids = (!contract_ids.is_empty()).then_some(contract_ids.as_slice());
            let answer = service.generate_answer(&query, &texts, ids).await?;
            println!("{answer}");
        }
    }

    Ok(())
}

fn read_metadata(input: &Path) -> Result<Map<String, Value>> {
    let raw = if input == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read metadata from stdin")?;
        buffer
    } else {
        fs::read_to_string(input)
            .with_context(|| format!("failed to read metadata at {}", input.display()))?
    };

    match serde_json::from_str::<Value>(&raw).context("failed to parse metadata json")? {
        Value::Object(fields) => Ok(fields),
        _ => bail!("metadata must be a JSON object"),
    }
}
