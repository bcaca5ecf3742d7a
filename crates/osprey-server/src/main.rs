mod api;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};
use osprey_analysis::AnalysisPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = osprey_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = osprey_db::PoolConfig::from_app_config(&config);
    let pool = osprey_db::connect_pool(&config.database_url, pool_config).await?;
    osprey_db::run_migrations(&pool).await?;

    let pipeline = Arc::new(AnalysisPipeline::from_app_config(&config, pool.clone())?);
    let proxy_client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            config.scraper_request_timeout_secs,
        ))
        .build()?;

    let app = build_app(AppState {
        pool,
        pipeline,
        proxy_client,
    });

    tracing::info!(addr = %config.bind_addr, "osprey server listening");
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
