use anyhow::Result;
use clap::Parser;

use portal_mock_server::{MockServer, Settings, logging::init_logging};

#[derive(Debug, Parser)]
#[command(
    name = "portal-mock-server",
    version,
    about = "In-memory mock of the portal REST backend"
)]
struct Cli {
    /// Address to listen on, e.g. 127.0.0.1:8080.
    #[arg(long)]
    addr: Option<String>,

    /// HS256 secret for minted tokens (at least 32 characters).
    #[arg(long)]
    jwt_secret: Option<String>,

    /// Access token lifetime in seconds.
    #[arg(long)]
    access_ttl_seconds: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(addr) = cli.addr {
        settings.addr = addr;
    }
    if let Some(secret) = cli.jwt_secret {
        settings.jwt_secret = secret;
    }
    if let Some(ttl) = cli.access_ttl_seconds {
        settings.access_ttl_seconds = ttl;
    }

    init_logging(&settings.log_level)?;

    let server = MockServer::spawn(settings).await?;
    tracing::info!("demo users: reader@example.com / reporter@example.com / admin@example.com");

    // Serve until interrupted.
    tokio::signal::ctrl_c().await?;
    server.abort();
    Ok(())
}
