//! Driving ports for user profiles and provisioning.

use async_trait::async_trait;

use crate::domain::{Error, UserId, UserProfile};

/// Attributes supplied when provisioning a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// Reads credential-free user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Fetch the profile of a user, or `NotFound`.
    async fn fetch_profile(&self, user_id: UserId) -> Result<UserProfile, Error>;
}

/// Provisions users in the User Store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Create a user; `Conflict` when the email or username is taken.
    async fn register_user(&self, request: RegisterUserRequest) -> Result<UserProfile, Error>;
}
