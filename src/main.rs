//! Demo CLI for the CRM data-access layer.
//!
//! Drives a paged list loader against a real (or dead) endpoint and prints
//! rows as JSON lines. A dead backend is not an error: the loader degrades
//! to deterministic fallback records and the fallback notice goes to
//! stderr.
//!
//! ```text
//! crm-client --base-url https://api.example.com --kind contact --query ada --pages 3
//! RUST_LOG=crm_transport=debug crm-client --base-url http://127.0.0.1:1 --kind deal
//! ```

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use crm_client::loader::{PagedListLoader, DEFAULT_PAGE_LIMIT};
use crm_client_types::{Company, Contact, Deal, Entity};
use crm_transport::{
    RequestGateway, SessionEvent, SessionEventChannel, StaticTokenProvider,
};

#[derive(Debug, Copy, Clone, ValueEnum)]
enum KindArg {
    Contact,
    Company,
    Deal,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// API base URL.
    #[arg(long)]
    base_url: String,

    /// Entity kind to list.
    #[arg(long, value_enum)]
    kind: KindArg,

    /// Search query forwarded to the server (and applied locally to
    /// fallback records).
    #[arg(long, default_value = "")]
    query: String,

    /// Items per live page.
    #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
    limit: usize,

    /// Maximum pages to fetch, initial load included.
    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Bearer token for authenticated endpoints.
    #[arg(long)]
    token: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let session = SessionEventChannel::new();
    let _expiry = session.subscribe(|SessionEvent::Expired| {
        eprintln!("session expired; re-authenticate and try again");
    });

    let gateway = RequestGateway::new(&cli.base_url, session)
        .with_token_provider(Arc::new(StaticTokenProvider::new(cli.token.clone())));
    let gateway = Arc::new(gateway);

    match cli.kind {
        KindArg::Contact => run::<Contact>(gateway, &cli),
        KindArg::Company => run::<Company>(gateway, &cli),
        KindArg::Deal => run::<Deal>(gateway, &cli),
    }
}

fn run<T: Entity>(gateway: Arc<RequestGateway>, cli: &Cli) -> Result<()> {
    let mut loader: PagedListLoader<T> = PagedListLoader::with_limit(gateway, cli.limit);
    loader.set_query(cli.query.clone());
    loader.load(true);

    let mut pages = 1;
    while pages < cli.pages && loader.next_cursor().is_some() {
        loader.more();
        pages += 1;
    }

    if !loader.error().is_empty() {
        eprintln!("{}", loader.error());
    }
    for row in loader.rows() {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}
