//! stride-back binary entrypoint wiring the HTTP gateway, the JSON snapshot
//! store, and the two time-driven background loops.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "telegram-sink")]
use stride_back::services::telegram::TelegramNotifier;
use stride_back::{
    clock::{Clock, SystemClock},
    config::AppConfig,
    dao::score_store::{SnapshotStore, json_file::JsonFileStore},
    routes,
    services::{
        challenge_watcher, daily_digest,
        notifier::{Notifier, TraceNotifier},
    },
    state::{AppState, ScoreBoard},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::from_env();

    let store: Arc<dyn SnapshotStore> = Arc::new(JsonFileStore::new(config.data_path.clone()));
    let board = match store.load().await {
        Ok(snapshot) => {
            info!(
                records = snapshot.len(),
                path = %config.data_path.display(),
                "loaded score snapshot"
            );
            ScoreBoard::from_snapshot(&snapshot)
        }
        Err(err) => {
            warn!(error = %err, "failed to load score snapshot; starting empty");
            ScoreBoard::default()
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(config.utc_offset));
    let state = AppState::new(board, store, clock);
    let notifier = build_notifier(&config);

    tokio::spawn(daily_digest::run(
        state.clone(),
        notifier.clone(),
        config.digest.clone(),
    ));
    tokio::spawn(challenge_watcher::run(
        state.clone(),
        notifier,
        config.watcher_tick,
    ));

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick the outbound sink: Telegram when a token is configured, log-only
/// otherwise.
fn build_notifier(config: &AppConfig) -> Arc<dyn Notifier> {
    #[cfg(feature = "telegram-sink")]
    {
        if let Some(token) = config.telegram_token.as_deref() {
            match TelegramNotifier::new(token) {
                Ok(notifier) => {
                    info!("delivering notifications via the Telegram Bot API");
                    return Arc::new(notifier);
                }
                Err(err) => {
                    warn!(error = %err, "failed to build Telegram notifier; using log-only sink")
                }
            }
        } else {
            info!("TELEGRAM_BOT_TOKEN not set; outbound messages are logged only");
        }
    }
    #[cfg(not(feature = "telegram-sink"))]
    let _ = config;

    Arc::new(TraceNotifier)
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: stride_back::state::SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
