//! Shared helpers for domain services.

use crate::domain::Error;
use crate::domain::ports::{CheckinRepositoryError, UserPersistenceError, VenueRepositoryError};

pub(crate) fn map_checkin_repository_error(error: CheckinRepositoryError) -> Error {
    match error {
        CheckinRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("checkin repository unavailable: {message}"))
        }
        CheckinRepositoryError::Query { message } => {
            Error::internal(format!("checkin repository error: {message}"))
        }
    }
}

pub(crate) fn map_venue_repository_error(error: VenueRepositoryError) -> Error {
    match error {
        VenueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("venue repository unavailable: {message}"))
        }
        VenueRepositoryError::Query { message } => {
            Error::internal(format!("venue repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("user {field} is already registered")).with_details(
                serde_json::json!({
                    "code": "duplicate_user",
                    "field": field,
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(CheckinRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(CheckinRepositoryError::query("bad sql"), ErrorCode::InternalError)]
    fn checkin_errors_map_to_codes(#[case] error: CheckinRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_checkin_repository_error(error).code(), code);
    }

    #[rstest]
    #[case(VenueRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(VenueRepositoryError::query("bad sql"), ErrorCode::InternalError)]
    fn venue_errors_map_to_codes(#[case] error: VenueRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(map_venue_repository_error(error).code(), code);
    }

    #[rstest]
    fn duplicate_user_maps_to_conflict_naming_the_field() {
        let error = map_user_repository_error(UserPersistenceError::duplicate("username"));
        assert_eq!(error.code(), ErrorCode::Conflict);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "username");
    }
}
