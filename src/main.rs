//! Process entry point: environment, logging, CLI dispatch.

mod scan;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use embed_client::OllamaEmbedder;
use indexer::{CandidateFile, FileMeta, IndexSettings, Indexer};
use tracing::info;
use tracing_subscriber::EnvFilter;
use vector_store::{QdrantSync, StoreConfig};

#[derive(Parser)]
#[command(
    name = "code-sync",
    about = "Keep a vector store collection in sync with a source tree"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a full synchronization pass over a project tree.
    Index {
        /// Project root directory.
        root: PathBuf,
        /// Collection name; derived from the root directory when omitted.
        #[arg(long)]
        collection: Option<String>,
        /// Drop and recreate the collection before indexing.
        #[arg(long)]
        reset: bool,
    },
    /// Re-index a single file (the watcher entry point).
    File {
        /// Project root directory.
        root: PathBuf,
        /// Project-relative path of the changed file.
        path: String,
        /// Collection name; derived from the root directory when omitted.
        #[arg(long)]
        collection: Option<String>,
    },
    /// List collections with their point counts.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment overrides are resolved once, here; nothing below the
    // binary reads the process environment.
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info")).unwrap();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let settings = IndexSettings::from_env();

    match Cli::parse().command {
        Command::Index {
            root,
            collection,
            reset,
        } => run_pass(&settings, &root, collection, reset).await,
        Command::File {
            root,
            path,
            collection,
        } => run_single(&settings, &root, path, collection).await,
        Command::Status => show_status(&settings).await,
    }
}

async fn run_pass(
    settings: &IndexSettings,
    root: &Path,
    collection: Option<String>,
    reset: bool,
) -> anyhow::Result<()> {
    let indexer = build_indexer(settings, root, collection)?;
    let candidates = scan::scan_candidates(root)?;
    info!("{} candidate files under {}", candidates.len(), root.display());

    let summary = indexer.full_pass(root, &candidates, reset).await?;

    println!(
        "{} {} indexed, {} unchanged, {} too large, {} purged",
        "done:".green().bold(),
        summary.indexed,
        summary.unchanged,
        summary.too_large,
        summary.purged_paths
    );
    if summary.failed > 0 {
        println!("{} {} files failed", "warning:".red().bold(), summary.failed);
    }
    Ok(())
}

async fn run_single(
    settings: &IndexSettings,
    root: &Path,
    path: String,
    collection: Option<String>,
) -> anyhow::Result<()> {
    let indexer = build_indexer(settings, root, collection)?;

    let size = std::fs::metadata(root.join(&path))?.len();
    let lang = scan::lang_for_path(&path).to_owned();
    let file = CandidateFile {
        path,
        size,
        meta: FileMeta {
            lang,
            ..FileMeta::default()
        },
    };

    let outcome = indexer.index_one(root, &file).await?;
    println!("{}", serde_json::to_string(&outcome)?);
    Ok(())
}

async fn show_status(settings: &IndexSettings) -> anyhow::Result<()> {
    let store = QdrantSync::new(
        reqwest::Client::new(),
        StoreConfig::new(&settings.vector_store_url, "default", settings.vector_size),
    )?;
    for collection in store.list_collections_extended().await? {
        println!("{:<40} {:>10} points", collection.name, collection.points);
    }
    Ok(())
}

fn build_indexer(
    settings: &IndexSettings,
    root: &Path,
    collection: Option<String>,
) -> anyhow::Result<Indexer> {
    let collection = collection.unwrap_or_else(|| collection_for_root(root));
    info!("target collection '{collection}'");

    let http = reqwest::Client::new();
    let store = QdrantSync::new(
        http.clone(),
        StoreConfig::new(&settings.vector_store_url, collection, settings.vector_size),
    )?;
    let embedder = OllamaEmbedder::new(http, &settings.embedding_url, &settings.embed_model);

    Ok(Indexer::new(
        settings.clone(),
        Arc::new(store),
        Arc::new(embedder),
    ))
}

/// Derive a collection name from the project directory name.
fn collection_for_root(root: &Path) -> String {
    let name = root
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "project".into());
    let slug: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("code_{slug}")
}
