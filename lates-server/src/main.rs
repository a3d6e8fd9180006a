//! Run with
//!
//! ```not_rust
//! LATES_ADDR=127.0.0.1:8080 RUST_LOG=info cargo run -p lates-server
//! ```

use std::sync::Arc;

use anyhow::Context;
use lates::{archive::LogSink, web, DailyRegistry, OffsetClock};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

mod config;

fn main() -> anyhow::Result<()> {
    // Must happen while the process is still single-threaded.
    let clock = OffsetClock::local();

    init_tracing();
    let config = Config::from_env()?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build the tokio runtime")?
        .block_on(serve(config, clock))
}

async fn serve(config: Config, clock: OffsetClock) -> anyhow::Result<()> {
    let registry = Arc::new(DailyRegistry::with_sink_and_clock(LogSink, clock));
    let app = web::router_with_title(registry, config.title);

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    tracing::info!(offset = %clock.offset(), "listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("received ctrl-c, shutting down"),
        Err(err) => {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();
}
