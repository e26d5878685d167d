//! boothwall-ui - photo-booth coordinator
//!
//! Tracks the capture session lifecycle driven by webhook callbacks from the
//! kiosk application and maintains the 3-slot display ring buffer of the most
//! recently produced photos.

use anyhow::Result;
use boothwall_common::config::resolve_config;
use boothwall_ui::{build_router, AppState};
use clap::Parser;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "boothwall-ui", version, about = "Photo-booth coordinator service")]
struct Args {
    /// Root folder holding static/ and scripts/
    #[arg(long, env = "BOOTHWALL_ROOT")]
    root: Option<String>,

    /// Listen port on 127.0.0.1
    #[arg(long, env = "BOOTHWALL_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting Boothwall coordinator (boothwall-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = resolve_config(args.root.as_deref(), args.port);
    info!("Root folder: {}", config.root_folder.display());

    // Slot and script folders must exist before the first publish or launch
    config.ensure_layout()?;

    let addr = format!("127.0.0.1:{}", config.port);
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("boothwall-ui listening on http://{}", addr);
    info!("Webhook endpoint: http://{}/hook", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
