use mimalloc::MiMalloc;
use rds_backend::{AppState, Config, app_router, service::startup};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        secret_path = %cfg.secret_path.display(),
        db_port = cfg.db_port,
        listen_addr = %cfg.listen_addr,
        poll_interval_secs = cfg.poll_interval_secs,
        poll_timeout_secs = cfg.poll_timeout_secs,
        require_schema = cfg.require_schema,
        loglevel = %cfg.loglevel
    );

    // The mode is settled before the listener exists, so no request can
    // observe a half-initialized backend.
    let mode = startup::initialize(&cfg).await;
    info!(mode = %mode.kind(), "startup sequence finished");

    let app = app_router(AppState::with_mode(mode));

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(signal = "SIGINT", "initiating graceful shutdown"),
        _ = terminate => info!(signal = "SIGTERM", "initiating graceful shutdown"),
    }
}
