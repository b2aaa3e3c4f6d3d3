//! SafeFlow backend binary
//!
//! Serves the draft API over a file-backed store.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use safeflow_server::app;
use safeflow_store::FileDraftStore;

#[derive(Debug, Parser)]
#[command(name = "safeflow-server", about = "SafeFlow draft persistence backend")]
struct Cli {
    /// Address to listen on
    #[arg(long, env = "SAFEFLOW_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Path of the draft mapping file
    #[arg(long, env = "SAFEFLOW_DATA_PATH", default_value = "data/drafts.json")]
    data_path: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = Arc::new(FileDraftStore::new(&cli.data_path));
    let router = app(store);

    info!(bind = %cli.bind, data_path = %cli.data_path.display(), "safeflow backend listening");
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    axum::serve(listener, router).await?;
    Ok(())
}
