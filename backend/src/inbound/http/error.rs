//! HTTP adapter mapping for domain errors.
//!
//! Domain errors stay HTTP-agnostic; this module turns them into JSON bodies
//! and status codes. Internal failures are logged and redacted.
//!
//! Check-in endpoints first pass failures through [`ErrorStatusPolicy`].
//! `Legacy` reproduces the historical contract of the check-in API: every
//! rejected check-in is a `400 Bad Request` and every rejected checkout is a
//! `404 Not Found`, whatever the underlying cause. `Unified` reports each
//! domain error with its own status (`404` for unknown ids, `409` for
//! business-rule conflicts). Outages and internal failures keep their own
//! codes under both policies.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Selects how check-in and checkout failures are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStatusPolicy {
    #[default]
    Legacy,
    Unified,
}

impl ErrorStatusPolicy {
    /// Adjust a failure raised by the check-in operation.
    pub fn for_check_in(self, error: Error) -> Error {
        match (self, error.code()) {
            (Self::Legacy, ErrorCode::NotFound | ErrorCode::Conflict) => {
                error.recoded(ErrorCode::InvalidRequest)
            }
            _ => error,
        }
    }

    /// Adjust a failure raised by the checkout operation.
    pub fn for_check_out(self, error: Error) -> Error {
        match (self, error.code()) {
            (Self::Legacy, ErrorCode::Conflict) => error.recoded(ErrorCode::NotFound),
            _ => error,
        }
    }
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self.code(), ErrorCode::InternalError) {
            error!(message = self.message(), trace_id = ?self.trace_id(), "internal error");
        }
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}
