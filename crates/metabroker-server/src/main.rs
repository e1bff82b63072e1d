use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use metabroker_server::{MetadataServer, ServerConfig};

#[derive(Parser)]
#[command(name = "metabroker", about = "Per-project metadata broker", version)]
struct Args {
    /// Address the HTTP server binds to
    #[arg(long, default_value = "127.0.0.1:9988")]
    bind_addr: SocketAddr,

    /// Folder used to store per-project metadata files
    #[arg(long, default_value = "/data")]
    data_folder: PathBuf,

    /// Legacy metadata file migrated at startup when MIGRATION_PROJECT_ID is set
    #[arg(long, default_value = "/data/metadata.json")]
    legacy_file: PathBuf,

    /// Comma separated list of allowed CORS origins
    #[arg(long, value_delimiter = ',')]
    allowed_cors_origins: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = ServerConfig {
        bind_addr: args.bind_addr,
        data_folder: args.data_folder,
        legacy_file: args.legacy_file,
        allowed_cors_origins: args.allowed_cors_origins,
    };
    tracing::info!(?config, "metadata broker starting");

    MetadataServer::new(config).serve().await?;
    Ok(())
}
