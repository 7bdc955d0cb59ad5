//! Run one expiry sweep against the database and report what it closed.
//!
//! Settings come from the same `CHECKINS_*` sources as the server, so the
//! sweep closes check-ins at the dwell limit the server enforces. Command-line
//! flags override individual values.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use backend::config::AppSettings;
use backend::domain::{CheckinPolicy, CheckinService};
use backend::inbound::sweeper::ExpirySweeper;
use backend::outbound::persistence::{
    DbPool, DieselCheckinRepository, DieselUserRepository, DieselVenueRepository, PoolConfig,
};
use clap::Parser;
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

/// `sweep-checkins` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sweep-checkins",
    about = "Close check-ins that exceeded the maximum dwell time",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `CHECKINS_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Minutes after which an active check-in counts as abandoned. Falls back
    /// to `CHECKINS_MAX_DWELL_MINUTES` when omitted.
    #[arg(long = "max-dwell-minutes", value_name = "minutes")]
    max_dwell_minutes: Option<i64>,
}

/// Resolved inputs for one sweep.
#[derive(Debug)]
struct SweepPlan {
    database_url: String,
    policy: CheckinPolicy,
}

fn main() -> io::Result<()> {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = load_settings()?;
    let plan = plan_sweep(args, settings)?;
    info!(max_dwell_minutes = plan.policy.max_dwell().num_minutes(), "starting sweep");

    let pool = DbPool::new(PoolConfig::new(&plan.database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let engine = CheckinService::new(
        Arc::new(DieselCheckinRepository::new(pool.clone())),
        Arc::new(DieselVenueRepository::new(pool.clone())),
        Arc::new(DieselUserRepository::new(pool)),
        Arc::clone(&clock),
    )
    .with_policy(plan.policy);

    // The period is irrelevant for a single pass.
    let sweeper = ExpirySweeper::new(Arc::new(engine), clock, Duration::from_secs(1));
    let outcome = sweeper
        .run_once()
        .await
        .map_err(|error| io::Error::other(format!("sweep failed: {}", error.message())))?;

    println!("candidates={}", outcome.candidates);
    println!("closed={}", outcome.closed);
    Ok(())
}

/// Load `CHECKINS_*` settings from the environment and configuration files.
///
/// Only the program name is forwarded: the sweep's own flags are parsed by
/// clap and applied in [`plan_sweep`].
fn load_settings() -> io::Result<AppSettings> {
    AppSettings::load_from_iter([OsString::from("sweep-checkins")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))
}

fn plan_sweep(args: CliArgs, mut settings: AppSettings) -> io::Result<SweepPlan> {
    if let Some(minutes) = args.max_dwell_minutes {
        settings.max_dwell_minutes = Some(minutes);
    }
    let policy = settings
        .checkin_policy()
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let database_url = resolve_database_url(args.database_url, settings.database_url)?;
    Ok(SweepPlan {
        database_url,
        policy,
    })
}

fn resolve_database_url(
    explicit: Option<String>,
    configured: Option<String>,
) -> io::Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url must not be empty when provided",
            ));
        }
        return Ok(value);
    }

    let configured = configured.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "database URL missing: set --database-url or CHECKINS_DATABASE_URL",
        )
    })?;
    if configured.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "CHECKINS_DATABASE_URL must not be empty",
        ));
    }
    Ok(configured)
}
