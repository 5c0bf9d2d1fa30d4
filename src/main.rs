use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pressroom::config::{Config, LogSettings};
use pressroom::handlers::{api_router, internal_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing(LogSettings::from_env());

    let config = Config::from_env()?;

    tracing::info!(service = %config.service_name, "Starting document service");
    tracing::info!(
        blank_page = %config.pdf_blank_path.display(),
        workspace_root = %config.workspace_root.display(),
        tool_timeout_seconds = config.tool_timeout_seconds,
        max_request_size_mb = config.max_request_size_mb,
        "Configuration loaded"
    );

    let api_addr = format!("{}:{}", config.server_host, config.server_port);
    let internal_addr = format!("{}:{}", config.server_host, config.internal_port);

    let state = AppState::new(config);

    let api_listener = TcpListener::bind(&api_addr).await?;
    let internal_listener = TcpListener::bind(&internal_addr).await?;

    tracing::info!(external = %api_addr, internal = %internal_addr, "listening on ports");

    let api = axum::serve(api_listener, api_router(state.clone()))
        .with_graceful_shutdown(shutdown_signal());
    let internal = axum::serve(internal_listener, internal_router(state))
        .with_graceful_shutdown(shutdown_signal());

    tokio::try_join!(async { api.await }, async { internal.await })?;

    tracing::info!("Document service stopped");
    Ok(())
}

fn init_tracing(settings: LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| settings.default_filter().into());
    let registry = tracing_subscriber::registry().with(filter);

    if settings.human {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("shutdown signal received");
}
