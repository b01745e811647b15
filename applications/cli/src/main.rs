/// Lumen - document management for the RAG search backend
use clap::{Parser, Subcommand};
use lumen_client::{
    DocumentSummary, DocumentSynchronizer, DocumentsClient, Notification, Notifier, UploadFile,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod notifier;

use config::CliConfig;
use notifier::TerminalNotifier;

type Documents = DocumentSynchronizer<DocumentsClient, TerminalNotifier>;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(about = "Upload and manage documents for RAG-powered search", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend URL (overrides config file and LUMEN_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Increase log verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all documents
    List,
    /// Upload one or more files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Delete documents by id
    Delete {
        /// Document ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Open a document
    View {
        /// Document id
        id: String,
    },
    /// Meeting transcripts
    Meetings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose > 0 {
        "lumen=debug,lumen_client=debug"
    } else {
        "lumen=info,lumen_client=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::List => {
            let documents = connect(cli.config, cli.api_url)?;
            documents.refresh().await;
            print_documents(&documents);
        }
        Commands::Upload { files } => {
            let documents = connect(cli.config, cli.api_url)?;
            upload(&documents, files).await;
            print_documents(&documents);
        }
        Commands::Delete { ids } => {
            let documents = connect(cli.config, cli.api_url)?;
            documents.refresh().await;
            for id in &ids {
                documents.remove(id).await;
            }
            print_documents(&documents);
        }
        Commands::View { id } => {
            let documents = connect(cli.config, cli.api_url)?;
            documents.refresh().await;
            match documents.get(&id) {
                Some(document) => documents.view(&document),
                None => TerminalNotifier.notify(Notification::error(format!(
                    "Document not found: {}",
                    id
                ))),
            }
        }
        Commands::Meetings => print_meetings_placeholder(),
    }

    Ok(())
}

/// Load configuration and build a synchronizer for the configured backend.
fn connect(config_path: Option<PathBuf>, api_url: Option<String>) -> anyhow::Result<Documents> {
    let mut config = CliConfig::load(config_path.as_deref())?;
    if let Some(url) = api_url {
        config.api.url = url;
    }
    config.validate()?;

    tracing::debug!(url = %config.api.url, "Using documents backend");

    let client = DocumentsClient::new(config.client_config())?;
    Ok(DocumentSynchronizer::with_notifier(client, TerminalNotifier))
}

async fn upload(documents: &Documents, paths: Vec<PathBuf>) {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        match UploadFile::from_path(&path).await {
            Ok(file) => files.push(file),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "Skipping unreadable file");
                TerminalNotifier.notify(Notification::error(format!(
                    "Failed to upload {}: {}",
                    path.display(),
                    e
                )));
            }
        }
    }

    let report = documents.upload(&files).await;
    tracing::info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Upload finished"
    );
}

fn print_documents(documents: &Documents) {
    let documents = documents.documents();
    if documents.is_empty() {
        println!("No documents.");
        return;
    }

    println!("{}", format_table(&documents));
}

fn format_table(documents: &[DocumentSummary]) -> String {
    let id_width = documents
        .iter()
        .map(|d| d.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    let name_width = documents
        .iter()
        .map(|d| d.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let type_width = documents
        .iter()
        .map(|d| d.doc_type.len())
        .max()
        .unwrap_or(0)
        .max("TYPE".len());

    let mut lines = Vec::with_capacity(documents.len() + 1);
    lines.push(format!(
        "{:<id_width$}  {:<name_width$}  {:<type_width$}  UPLOADED",
        "ID", "NAME", "TYPE"
    ));

    for document in documents {
        let uploaded = document
            .uploaded_at
            .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<id_width$}  {:<name_width$}  {:<type_width$}  {}",
            document.id, document.name, document.doc_type, uploaded
        ));
    }

    lines.join("\n")
}

fn print_meetings_placeholder() {
    println!("Coming Soon");
    println!();
    println!("Meeting Transcripts feature is under development.");
    println!(
        "We're working hard to bring you the ability to manage and search through \
         meeting recordings and transcripts."
    );
}
