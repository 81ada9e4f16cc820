mod compare;
mod config;
mod error;
mod http;
mod prompts;
mod protocol;
mod registry;
mod resources;
mod server;
mod tools;

use config::ServerConfig;
use server::NpmMcpServer;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = ServerConfig::from_env()?;
    NpmMcpServer::bootstrap(config).await?;

    Ok(())
}
