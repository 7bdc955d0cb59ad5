//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use backend::domain::CheckinPolicy;
use backend::inbound::http::ErrorStatusPolicy;
use backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) policy: CheckinPolicy,
    pub(crate) error_status: ErrorStatusPolicy,
}

impl ServerConfig {
    /// Configuration with in-memory stores and default engine limits.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            policy: CheckinPolicy::default(),
            error_status: ErrorStatusPolicy::default(),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, every store uses its Diesel-backed repository.
    #[must_use]
    pub fn with_db_pool(mut self, pool: Option<DbPool>) -> Self {
        self.db_pool = pool;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: CheckinPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_error_status(mut self, error_status: ErrorStatusPolicy) -> Self {
        self.error_status = error_status;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
