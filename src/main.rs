#![warn(clippy::pedantic, clippy::all, clippy::nursery)]

use roster::{
    config::RuntimeConfiguration,
    error::{BindListenerSnafu, RosterResult, ServeSnafu},
    routes::app,
    state::RosterState,
};
use snafu::ResultExt;
use sqlx::postgres::PgPoolOptions;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
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

    warn!("signal received, starting graceful shutdown");
}

async fn run() -> RosterResult<()> {
    let config = RuntimeConfiguration::new()?;
    let options = PgPoolOptions::new().max_connections(15);
    let state = RosterState::new(options, &config).await?;

    let addr = config.server_config().socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .context(BindListenerSnafu { addr })?;

    info!(?addr, "Listening");
    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context(ServeSnafu)
}

#[tokio::main]
async fn main() {
    let dotenv = dotenvy::dotenv();

    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");
    if let Err(e) = dotenv {
        warn!(?e, "no .env loaded, using the process environment only");
    }

    if let Err(e) = run().await {
        error!(?e, "{e}");
        std::process::exit(1);
    }
}
