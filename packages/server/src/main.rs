use std::net::SocketAddr;

use anyhow::Context as _;
use api::{routes, server, AppState, Settings};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::new().context("Failed to load settings")?;
    let _log_guards = api::logging::init(&settings.log_file)?;

    let pool = api::db::connect(&settings.db_path)
        .await
        .with_context(|| format!("Failed to open database {}", settings.db_path.display()))?;
    tracing::info!(
        db_path = %settings.db_path.display(),
        signups_allowed = settings.signups_allowed,
        "database ready"
    );

    let app = routes::router(AppState::new(pool, settings.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Server fail to start on {addr}"))?;
    tracing::info!(port = settings.port, "Server start on port: {}", settings.port);

    tokio::select! {
        _ = server::serve(listener, app, &settings.timeouts) => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            tracing::info!("shutting down");
        }
    }

    Ok(())
}
