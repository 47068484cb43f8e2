mod api;
mod middleware;

use outlet_upstream::UpstreamClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = outlet_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let upstream = match config.api_url.as_deref() {
        Some(base_url) => Some(UpstreamClient::new(
            base_url,
            config.upstream_timeout_secs,
            &config.upstream_user_agent,
        )?),
        None => {
            tracing::warn!("OUTLET_API_URL not set; proxy endpoints will answer 500");
            None
        }
    };

    let app = build_app(AppState {
        upstream,
        neighbor_radius_km: config.neighbor_radius_km,
    });

    tracing::info!(
        bind_addr = %config.bind_addr,
        env = %config.env,
        neighbor_radius_km = config.neighbor_radius_km,
        "starting outlet server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
