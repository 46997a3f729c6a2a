use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Lobby server for party chess
#[derive(Parser, Debug)]
#[command(name = "partychess-server", version)]
struct Args {
    /// Address to bind
    #[arg(long, env = "PARTYCHESS_IP", default_value = "0.0.0.0")]
    ip: IpAddr,

    /// Port to bind
    #[arg(long, env = "PARTYCHESS_PORT", default_value_t = 8080)]
    port: u16,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "PARTYCHESS_LOG", default_value = "info")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&args.log).context("invalid log filter")?,
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let addr = SocketAddr::new(args.ip, args.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    backend::serve(listener).await?;
    Ok(())
}
