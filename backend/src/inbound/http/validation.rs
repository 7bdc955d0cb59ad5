//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidNumber,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidNumber => "invalid_number",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a finite number"))
        .with_value(ErrorCode::InvalidNumber, value)
}

/// Require a present, non-blank value.
pub(crate) fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn parse_uuid(value: String, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, &value))
}

/// Parse an entity identifier such as `UserId` or `VenueId`.
pub(crate) fn parse_id<T: From<Uuid>>(value: String, field: FieldName) -> Result<T, Error> {
    parse_uuid(value, field).map(T::from)
}

/// Parse a required identifier from an optional body field.
pub(crate) fn require_id<T: From<Uuid>>(
    value: Option<String>,
    field: FieldName,
) -> Result<T, Error> {
    parse_id(require(value, field)?, field)
}

/// Parse a required finite number from a query string value.
pub(crate) fn require_number(value: Option<String>, field: FieldName) -> Result<f64, Error> {
    let raw = require(value, field)?;
    match raw.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(invalid_number_error(field, &raw)),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode as DomainErrorCode, VenueId};

    const FIELD: FieldName = FieldName::new("venueId");

    fn detail(error: &Error, key: &str) -> serde_json::Value {
        error.details().expect("details")[key].clone()
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   ".to_owned()))]
    fn require_rejects_absent_and_blank(#[case] value: Option<String>) {
        let error = require(value, FIELD).expect_err("missing");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(detail(&error, "code"), "missing_field");
        assert_eq!(detail(&error, "field"), "venueId");
    }

    #[rstest]
    fn require_id_parses_uuids() {
        let id: VenueId = require_id(
            Some("3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned()),
            FIELD,
        )
        .expect("valid id");
        assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    fn invalid_uuid_reports_value() {
        let error = parse_id::<VenueId>("not-a-uuid".to_owned(), FIELD).expect_err("invalid");
        assert_eq!(detail(&error, "code"), "invalid_uuid");
        assert_eq!(detail(&error, "value"), "not-a-uuid");
    }

    #[rstest]
    #[case("41.88", Some(41.88))]
    #[case(" -87.63 ", Some(-87.63))]
    #[case("NaN", None)]
    #[case("inf", None)]
    #[case("north", None)]
    fn require_number_accepts_only_finite_values(
        #[case] raw: &str,
        #[case] expected: Option<f64>,
    ) {
        let parsed = require_number(Some(raw.to_owned()), FieldName::new("lat")).ok();
        assert_eq!(parsed, expected);
    }
}
