//! User profile lookup and provisioning.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    RegisterUserRequest, UserProfileQuery, UserRegistration, UserRepository,
};
use crate::domain::service_support::map_user_repository_error;
use crate::domain::{Error, User, UserDraft, UserId, UserProfile, UserValidationError};

fn invalid_user(error: UserValidationError) -> Error {
    let field = match &error {
        UserValidationError::InvalidEmail => "email",
        UserValidationError::UsernameTooShort { .. }
        | UserValidationError::UsernameTooLong { .. }
        | UserValidationError::UsernameInvalidCharacters => "username",
        UserValidationError::EmptyName { field: "first name" } => "firstName",
        UserValidationError::EmptyName { .. } => "lastName",
        UserValidationError::TimestampsOutOfOrder => "updatedAt",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": "invalid_user",
    }))
}

fn already_registered(field: &str, value: &str) -> Error {
    Error::conflict(format!("{field} {value} is already registered")).with_details(json!({
        "code": "duplicate_user",
        "field": field,
    }))
}

/// Service over the User Store.
pub struct UserService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> UserService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U: UserRepository> UserProfileQuery for UserService<U> {
    async fn fetch_profile(&self, user_id: UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_repository_error)?
            .map(|user| user.profile())
            .ok_or_else(|| {
                Error::not_found(format!("user {user_id} not found")).with_details(json!({
                    "code": "user_not_found",
                    "userId": user_id,
                }))
            })
    }
}

#[async_trait]
impl<U: UserRepository> UserRegistration for UserService<U> {
    async fn register_user(&self, request: RegisterUserRequest) -> Result<UserProfile, Error> {
        let now = self.clock.utc();
        let user = User::new(UserDraft {
            id: UserId::random(),
            email: request.email.trim().to_owned(),
            username: request.username.trim().to_owned(),
            first_name: request.first_name.trim().to_owned(),
            last_name: request.last_name.trim().to_owned(),
            password_hash: None,
            created_at: now,
            updated_at: now,
        })
        .map_err(invalid_user)?;

        let email_taken = self
            .users
            .find_by_email(user.email())
            .await
            .map_err(map_user_repository_error)?;
        if email_taken.is_some() {
            return Err(already_registered("email", user.email()));
        }
        let username_taken = self
            .users
            .find_by_username(user.username())
            .await
            .map_err(map_user_repository_error)?;
        if username_taken.is_some() {
            return Err(already_registered("username", user.username()));
        }

        self.users
            .save(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id(), username = user.username(), "user provisioned");
        Ok(user.profile())
    }
}
