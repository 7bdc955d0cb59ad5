//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Uniqueness of email (ignoring case) and username is enforced by unique
//! indexes; a violation surfaces as [`UserPersistenceError::Duplicate`]
//! naming the clashing field.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, User, UserDraft, UserId};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation_constraint,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

diesel::define_sql_function! {
    fn lower(x: Text) -> Text;
}

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn map_write_error(error: diesel::result::Error) -> UserPersistenceError {
    match unique_violation_constraint(&error) {
        Some(EMAIL_CONSTRAINT) => UserPersistenceError::duplicate("email"),
        Some(_) => UserPersistenceError::duplicate("username"),
        None => map_diesel_error(error),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        email,
        username,
        first_name,
        last_name,
        password_hash,
        created_at,
        updated_at,
    } = row;
    User::new(UserDraft {
        id: UserId::from_uuid(id),
        email,
        username,
        first_name,
        last_name,
        password_hash: password_hash.map(PasswordHash::new),
        created_at,
        updated_at,
    })
    .map_err(|err| UserPersistenceError::query(format!("stored user {id}: {err}")))
}

impl DieselUserRepository {
    async fn find_one<F>(&self, filter: F) -> Result<Option<User>, UserPersistenceError>
    where
        F: FnOnce(users::table) -> users::BoxedQuery<'static, diesel::pg::Pg>,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = filter(users::table)
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let id = *id.as_uuid();
        self.find_one(|table| table.filter(users::id.eq(id)).into_boxed())
            .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserPersistenceError> {
        let email = email.to_owned();
        self.find_one(|table| {
            table
                .filter(lower(users::email).eq(lower(email)))
                .into_boxed()
        })
        .await
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let username = username.to_owned();
        self.find_one(|table| table.filter(users::username.eq(username)).into_boxed())
            .await
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email(),
            username: user.username(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            password_hash: user.password_hash().map(PasswordHash::expose),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        };
        let update = UserUpdate {
            email: user.email(),
            username: user.username(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            updated_at: user.updated_at(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict(users::id)
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_write_error)
    }
}
