//! Application settings loaded via OrthoConfig.
//!
//! Every key can be supplied as a `CHECKINS_*` environment variable, a
//! command-line flag, or a configuration file entry. Unset keys fall back to
//! the defaults exposed by the accessors below.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{
    CheckinPolicy, CheckinPolicyError, DEFAULT_COOLDOWN_MINUTES, DEFAULT_MAX_DWELL_MINUTES,
};
use crate::inbound::http::ErrorStatusPolicy;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Errors raised while turning raw settings into runtime configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("host {host:?} is not an IP address")]
    InvalidHost { host: String },
    #[error("sweep interval must be at least one second")]
    ZeroSweepInterval,
    #[error(transparent)]
    Policy(#[from] CheckinPolicyError),
}

/// Settings for the check-in service and its maintenance tools.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CHECKINS")]
pub struct AppSettings {
    /// Interface to bind the HTTP server to.
    pub host: Option<String>,
    /// Port to bind the HTTP server to.
    pub port: Option<u16>,
    /// PostgreSQL connection URL. In-memory stores are used when unset.
    pub database_url: Option<String>,
    /// Minutes a user must wait before returning to a venue.
    pub cooldown_minutes: Option<i64>,
    /// Minutes after which the sweep closes an active check-in.
    pub max_dwell_minutes: Option<i64>,
    /// Seconds between expiry sweeps.
    pub sweep_interval_secs: Option<u64>,
    /// Report every domain error with its own status code.
    #[ortho_config(default = false)]
    pub unified_error_status: bool,
}

impl AppSettings {
    /// Socket address for the HTTP listener.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Cooldown and dwell limits for the check-in engine.
    pub fn checkin_policy(&self) -> Result<CheckinPolicy, SettingsError> {
        let policy = CheckinPolicy::new(
            self.cooldown_minutes.unwrap_or(DEFAULT_COOLDOWN_MINUTES),
            self.max_dwell_minutes.unwrap_or(DEFAULT_MAX_DWELL_MINUTES),
        )?;
        Ok(policy)
    }

    /// Period of the background expiry sweep.
    pub fn sweep_interval(&self) -> Result<Duration, SettingsError> {
        match self.sweep_interval_secs.unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS) {
            0 => Err(SettingsError::ZeroSweepInterval),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// How domain errors from the check-in endpoints map to HTTP statuses.
    pub fn error_status_policy(&self) -> ErrorStatusPolicy {
        if self.unified_error_status {
            ErrorStatusPolicy::Unified
        } else {
            ErrorStatusPolicy::Legacy
        }
    }
}
