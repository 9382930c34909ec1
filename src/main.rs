use axum::extract::DefaultBodyLimit;
use std::time::Duration;
use study_buddy::{config::Config, routes, AppState};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let app_state = AppState::new(&config)?;

    {
        let sessions = app_state.sessions.clone();
        let ttl = config.session_ttl();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(PURGE_INTERVAL);
            loop {
                ticker.tick().await;
                sessions.purge_idle(ttl);
            }
        });
    }

    let app = routes::router(app_state, config.generate_rps)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.server_address).await?;
    info!(
        address = %listener.local_addr()?,
        provider = %config.groq_api_url,
        "study buddy listening"
    );
    axum::serve(listener, app).await?;
    Ok(())
}
