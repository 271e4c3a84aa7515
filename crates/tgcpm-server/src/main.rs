mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tgcpm_db::SqliteStore;
use tgcpm_engine::Analyzer;
use tgcpm_sources::TonPriceClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::RequesterThrottle,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = tgcpm_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let store = SqliteStore::new(&config.database_url)?;
    store.run_migrations().await?;

    let analyzer = Analyzer::from_app_config(&config, Arc::new(store.clone()))?
        .with_audit(Arc::new(store.clone()));
    let ton_price = TonPriceClient::new(
        &config.ton_price_url,
        config.ton_to_usd,
        config.secondary_timeout_secs,
        &config.user_agent,
    )?;
    let throttle = RequesterThrottle::new(Duration::from_secs(config.requester_cooldown_secs));

    let app = build_app(
        AppState {
            store,
            analyzer: Arc::new(analyzer),
            ton_price: Arc::new(ton_price),
        },
        throttle,
    );

    tracing::info!(env = %config.env, bind_addr = %config.bind_addr, "starting server");
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
