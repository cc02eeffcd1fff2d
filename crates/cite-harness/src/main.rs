//! # Cite Harness CLI (`citeq`)
//!
//! The `citeq` binary answers questions over a directory of plain-text
//! documents, with every answer passage cited back to an exact byte range
//! of its source file.
//!
//! ## Usage
//!
//! ```bash
//! citeq --config ./citeq.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `citeq ask "<question>"` | Retrieve the most relevant passages with citations |
//! | `citeq ask "<question>" --stream` | Stream the answer token by token |
//! | `citeq docs` | List the documents the store would index |
//! | `citeq rebuild` | Build the index once and report its shape |
//! | `citeq stats` | Print index statistics and session counters |
//!
//! ## Examples
//!
//! ```bash
//! # Ask with the configured top_k
//! citeq ask "what are the payment terms" --config ./citeq.toml
//!
//! # Restrict retrieval to one document
//! citeq ask "termination notice period" --document contracts/acme.txt
//!
//! # Machine-readable output
//! citeq ask "governing law" --json
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cite_harness::config::{load_config, Config};
use cite_harness::retriever::Retriever;
use cite_harness::stats;
use cite_harness::store::DocumentStore;
use cite_harness::store_fs::FsStore;
use cite_harness::stream::StreamEvent;

/// Cite Harness CLI — a local-first passage retrieval engine with
/// byte-offset citations.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file with `[chunking]`, `[retrieval]`, and `[store]` sections.
#[derive(Parser)]
#[command(
    name = "citeq",
    about = "Cite Harness — passage retrieval with byte-offset citations",
    version,
    long_about = "Cite Harness chunks a directory of plain-text documents into overlapping \
    windows, fits a TF-IDF index over them, and answers natural-language questions with the \
    most similar passages, each cited back to the exact byte range of its source document."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./citeq.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Ask a question against the indexed corpus.
    ///
    /// Builds the index on first use (or after the corpus changed),
    /// ranks chunks by cosine similarity, and prints the concatenated
    /// snippets plus their citations.
    Ask {
        /// The question to retrieve passages for.
        question: String,

        /// Number of passages to return. Defaults to `retrieval.top_k`
        /// from the config file.
        #[arg(long)]
        top_k: Option<usize>,

        /// Restrict retrieval to a single document ID.
        #[arg(long)]
        document: Option<String>,

        /// Stream the answer token by token, then the citations.
        #[arg(long)]
        stream: bool,

        /// Print the full result as JSON.
        #[arg(long, conflicts_with = "stream")]
        json: bool,
    },

    /// List the document IDs the store would index.
    Docs,

    /// Build the index once and report its shape.
    ///
    /// Useful after changing the corpus or the chunking configuration to
    /// verify everything indexes cleanly.
    Rebuild,

    /// Print index statistics and session counters.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Ask {
            question,
            top_k,
            document,
            stream,
            json,
        } => {
            let retriever = make_retriever(&config)?;
            let top_k = top_k.unwrap_or(config.retrieval.top_k);

            if stream {
                run_ask_stream(&retriever, &question, top_k, document.as_deref()).await?;
            } else {
                let result = retriever.ask(&question, top_k, document.as_deref()).await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&result)?);
                } else {
                    println!("{}", result.answer_text);
                    println!();
                    if result.citations.is_empty() {
                        println!("Citations: (none)");
                    } else {
                        println!("Citations:");
                        for c in &result.citations {
                            println!(
                                "  {} [{}..{}] score={:.3}",
                                c.document_id, c.start_offset, c.end_offset, c.score
                            );
                        }
                    }
                }
            }
        }

        Commands::Docs => {
            let store = FsStore::new(&config.store)?;
            let ids = store.list_document_ids().await?;
            if ids.is_empty() {
                println!("No documents found under {}", config.store.root.display());
            } else {
                for id in ids {
                    println!("{id}");
                }
            }
        }

        Commands::Rebuild => {
            let retriever = make_retriever(&config)?;
            let index = retriever.rebuild().await?;
            let stats = index.stats();
            println!(
                "Indexed {} document{} into {} chunk{} ({} terms)",
                stats.documents,
                if stats.documents == 1 { "" } else { "s" },
                stats.chunks,
                if stats.chunks == 1 { "" } else { "s" },
                stats.vocabulary
            );
            for id in &stats.truncated_documents {
                println!("  truncated: {id}");
            }
        }

        Commands::Stats => {
            let retriever = make_retriever(&config)?;
            stats::run_stats(&retriever).await?;
        }
    }

    Ok(())
}

fn make_retriever(config: &Config) -> Result<Retriever> {
    let store = FsStore::new(&config.store)?;
    Ok(Retriever::new(Arc::new(store), config.chunking.params()))
}

async fn run_ask_stream(
    retriever: &Retriever,
    question: &str,
    top_k: usize,
    document: Option<&str>,
) -> Result<()> {
    let mut stdout = std::io::stdout();
    let mut first = true;
    for event in retriever.ask_stream(question, top_k, document).await {
        match event {
            StreamEvent::Token(token) => {
                if !first {
                    write!(stdout, " ")?;
                }
                write!(stdout, "{token}")?;
                stdout.flush()?;
                first = false;
            }
            StreamEvent::Citations(citations) => {
                writeln!(stdout)?;
                writeln!(stdout)?;
                if citations.is_empty() {
                    writeln!(stdout, "Citations: (none)")?;
                } else {
                    writeln!(stdout, "Citations:")?;
                    for c in &citations {
                        writeln!(
                            stdout,
                            "  {} [{}..{}] score={:.3}",
                            c.document_id, c.start_offset, c.end_offset, c.score
                        )?;
                    }
                }
            }
        }
    }
    Ok(())
}
