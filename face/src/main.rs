use clap::Parser;
use face::{AppState, Config, app, init_logging};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::broadcast;
use tracing::{info, warn};

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();

    let (logs, _) = broadcast::channel(100);
    init_logging(logs.clone())?;

    if config.api_key.is_empty() {
        warn!("no API key configured; questions will be answered with an apology");
    }
    let robot = Arc::new(config.build_robot()?);
    let app = app(AppState { robot, logs });

    let addr: SocketAddr = config.addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, engine = ?config.engine, profile = ?config.profile, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
