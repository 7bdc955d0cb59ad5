//! Backend entry-point: loads settings, wires stores, and serves the REST API
//! alongside the periodic expiry sweep.

mod server;

use std::env;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::AppSettings;
use backend::inbound::http::health::HealthState;
use backend::inbound::sweeper::ExpirySweeper;
use backend::outbound::persistence::{DbPool, PoolConfig, run_migrations};

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let policy = settings.checkin_policy()?;
    let sweep_interval = settings.sweep_interval()?;

    let db_pool = match settings.database_url.as_deref() {
        Some(url) => Some(connect(url).await?),
        None => {
            warn!("no database URL configured; using in-memory stores");
            None
        }
    };

    let config = ServerConfig::new(bind_addr)
        .with_db_pool(db_pool)
        .with_policy(policy)
        .with_error_status(settings.error_status_policy());

    let health_state = web::Data::new(HealthState::new());
    let (server, handles) = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "listening");

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let sweeper = ExpirySweeper::new(handles.sweep, handles.clock, sweep_interval);
    let sweeper_task = actix_web::rt::spawn(sweeper.run_until(async {
        let _ = stop_rx.await;
    }));

    let served = server.await;
    health_state.mark_unhealthy();
    let _ = stop_tx.send(());
    if let Err(error) = sweeper_task.await {
        warn!(%error, "expiry sweeper task ended abnormally");
    }
    served.wrap_err("HTTP server failed")
}

/// Apply pending migrations, then open the connection pool.
async fn connect(database_url: &str) -> Result<DbPool> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || run_migrations(&url))
        .await
        .wrap_err("migration task panicked")??;
    info!(applied, "database migrations complete");

    let config = PoolConfig::new(database_url);
    info!(?config, "opening database pool");
    let pool = DbPool::new(config).await?;
    Ok(pool)
}
