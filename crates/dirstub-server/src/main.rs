use clap::Parser;
use dirstub_server::{server::StubServer, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Dirstub: serve canned HTTP responses from a directory tree of JSON descriptors.
#[derive(Parser, Debug)]
#[command(name = "dirstub-server")]
#[command(author, version, about)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8181")]
    port: u16,

    /// Directory the content store is rooted at
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Subpath under the root that routes and rooted bodies resolve in
    /// (e.g. 'tests' -> <root>/tests)
    #[arg(short, long)]
    output: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::new(args.port, args.root, args.output);
    StubServer::new(config).run().await
}
