//! LearnTrack server binary.
//!
//! Run from repo root: `cargo run -p learntrack-server`

use learntrack::{bootstrap, build_router, AppConfig, AppState};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // `.env` may carry RUST_LOG, so load it before the subscriber reads the filter.
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration");
            std::process::exit(1);
        }
    };
    info!(mode = ?config.mode, address = %config.address(), "starting server");

    let milestones = match bootstrap::init(&config).await {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "startup failed");
            std::process::exit(1);
        }
    };
    let app = build_router(AppState::new(milestones));

    let listener = match TcpListener::bind(config.address()).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, address = %config.address(), "failed to bind");
            std::process::exit(1);
        }
    };
    info!("listening on http://{}", config.address());

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %err, "server error");
        std::process::exit(1);
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("learntrack=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
