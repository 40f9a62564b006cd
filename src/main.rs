// src/main.rs

use color_eyre::eyre::{Result, WrapErr};
use tracing::info;

use vanguard_recon::app::{AppState, create_app};
use vanguard_recon::config::Config;
use vanguard_recon::core::pipeline::Pipeline;
use vanguard_recon::core::registry::JobRegistry;
use vanguard_recon::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Setup ---
    color_eyre::install()?;
    logging::initialize_logging()?;

    let config = Config::from_env().wrap_err("invalid configuration")?;
    let pipeline = Pipeline::from_config(&config, JobRegistry::new())?;

    let address = config.bind_address();
    let app = create_app(AppState::new(pipeline, config));

    // --- Serve ---
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .wrap_err_with(|| format!("failed to bind {address}"))?;
    info!(address = %address, "Vanguard recon server listening.");

    axum::serve(listener, app).await?;
    Ok(())
}
