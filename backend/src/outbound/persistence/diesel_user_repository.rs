//! Diesel-backed user store.

use async_trait::async_trait;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, Username};

use super::error_map::{is_unique_violation, map_diesel_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

diesel::define_sql_function! {
    /// SQLite's built-in `lower`, used for case-insensitive lookups.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text
}

/// User repository persisting to SQLite through Diesel.
///
/// Queries run on the blocking thread pool; the connection pool is cloned
/// into each task.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over the shared pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn run<T, F>(&self, op: F) -> Result<T, UserPersistenceError>
    where
        T: Send + 'static,
        F: FnOnce(&mut SqliteConnection) -> Result<T, UserPersistenceError> + Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|error| UserPersistenceError::connection(error.to_string()))?;
            op(&mut conn)
        })
        .await
        .map_err(|error| UserPersistenceError::query(format!("blocking task failed: {error}")))?
    }
}

fn into_domain(row: UserRow) -> Result<User, UserPersistenceError> {
    row.into_domain()
        .map_err(|error| UserPersistenceError::query(error.to_string()))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let row = NewUserRow::from(user);
        self.run(move |conn| {
            conn.transaction(|conn| {
                diesel::insert_into(users::table)
                    .values(&row)
                    .execute(conn)
            })
            .map(|_| ())
            .map_err(|error| {
                if is_unique_violation(&error) {
                    UserPersistenceError::DuplicateUsername
                } else {
                    map_diesel_error(
                        error,
                        UserPersistenceError::connection,
                        UserPersistenceError::query,
                    )
                }
            })
        })
        .await
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let name = username.as_str().to_owned();
        self.run(move |conn| {
            users::table
                .filter(users::username.eq(&name))
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map_err(|error| {
                    map_diesel_error(
                        error,
                        UserPersistenceError::connection,
                        UserPersistenceError::query,
                    )
                })?
                .map(into_domain)
                .transpose()
        })
        .await
    }

    async fn find_by_username_ci(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        // ASCII folding on both sides matches the NOCASE index semantics.
        let folded = username.as_str().to_ascii_lowercase();
        self.run(move |conn| {
            users::table
                .filter(lower(users::username).eq(&folded))
                .select(UserRow::as_select())
                .first::<UserRow>(conn)
                .optional()
                .map_err(|error| {
                    map_diesel_error(
                        error,
                        UserPersistenceError::connection,
                        UserPersistenceError::query,
                    )
                })?
                .map(into_domain)
                .transpose()
        })
        .await
    }
}
