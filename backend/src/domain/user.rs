//! User identity model.
//!
//! Users are owned by the User Store. The check-in engine only resolves them
//! by id; the remaining fields back the profile endpoint and the uniqueness
//! rules enforced when a user is provisioned.

use std::fmt;

use chrono::{DateTime, Utc};

use super::ids::define_entity_id;

define_entity_id! {
    /// Stable user identifier stored as a UUID.
    UserId
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

/// Validation errors returned by [`User::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidEmail,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyName { field: &'static str },
    TimestampsOutOfOrder,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => write!(f, "username must be at most {max} characters"),
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::EmptyName { field } => write!(f, "{field} must not be empty"),
            Self::TimestampsOutOfOrder => write!(f, "updated_at must not precede created_at"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Opaque credential hash managed by an external identity system.
///
/// The value is never serialised and its `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored hash.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the stored hash for persistence adapters.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Input for building a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: Option<PasswordHash>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registered user.
///
/// `User` deliberately does not implement `Serialize`; adapters expose
/// [`UserProfile`] instead so the credential hash never reaches the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    email: String,
    username: String,
    first_name: String,
    last_name: String,
    password_hash: Option<PasswordHash>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn validate_email(email: &str) -> Result<(), UserValidationError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(UserValidationError::InvalidEmail);
    };
    let well_formed = !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace);
    if well_formed {
        Ok(())
    } else {
        Err(UserValidationError::InvalidEmail)
    }
}

fn validate_username(username: &str) -> Result<(), UserValidationError> {
    let length = username.chars().count();
    if length < USERNAME_MIN {
        return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
    }
    if length > USERNAME_MAX {
        return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
    }
    let allowed = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !allowed {
        return Err(UserValidationError::UsernameInvalidCharacters);
    }
    Ok(())
}

fn require_name(value: &str, field: &'static str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        Err(UserValidationError::EmptyName { field })
    } else {
        Ok(())
    }
}

impl User {
    /// Validate a draft and build a user.
    pub fn new(draft: UserDraft) -> Result<Self, UserValidationError> {
        let UserDraft {
            id,
            email,
            username,
            first_name,
            last_name,
            password_hash,
            created_at,
            updated_at,
        } = draft;

        validate_email(&email)?;
        validate_username(&username)?;
        require_name(&first_name, "first name")?;
        require_name(&last_name, "last name")?;
        if updated_at < created_at {
            return Err(UserValidationError::TimestampsOutOfOrder);
        }

        Ok(Self {
            id,
            email,
            username,
            first_name,
            last_name,
            password_hash,
            created_at,
            updated_at,
        })
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Stored credential hash, if the user was provisioned with one.
    pub fn password_hash(&self) -> Option<&PasswordHash> {
        self.password_hash.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Credential-free projection of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public view of a user without credential material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}
