// ZeroPoint Node - Web Server
// REST API with Axum; routes live in zeropoint_node::api

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use zeropoint_node::api::{router, AppState};
use zeropoint_node::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // Optional config path as the only positional argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ConfigLoader::load(config_path.as_deref())?;

    if !config.output_dir.exists() {
        info!(
            "No artifacts at {} yet; run `zeropoint generate` to populate /artifacts",
            config.output_dir.display()
        );
    }

    let addr = config.bind.clone();
    let state = AppState::new(config);
    info!("{}", state.matrix.summary());

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🚀 Server running on http://{}", addr);
    info!("   API:       /api/harmonic/4/5, /api/matrix, /api/universe");
    info!("   Artifacts: /artifacts/UNIVERSE.md");

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}
