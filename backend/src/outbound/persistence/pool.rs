//! Connection pool for Diesel SQLite connections.
//!
//! Wraps `r2d2` to provide pooled connections for the persistence layer.
//! Repositories check out connections on the blocking thread pool; the pool
//! itself is cheap to clone and share.

use std::time::Duration;

use diesel::SqliteConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pooled SQLite connection handed to repository query functions.
pub type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Errors that can occur during pool operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Failed to check out a connection from the pool.
    #[error("failed to get connection from pool: {message}")]
    Checkout {
        /// Checkout failure description.
        message: String,
    },
    /// Failed to build the connection pool.
    #[error("failed to build connection pool: {message}")]
    Build {
        /// Build failure description.
        message: String,
    },
    /// Failed to apply pending migrations.
    #[error("failed to run migrations: {message}")]
    Migration {
        /// Migration failure description.
        message: String,
    },
}

impl PoolError {
    /// Create a checkout error with the given message.
    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }

    /// Create a build error with the given message.
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}

/// Configuration for the database connection pool.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    connection_timeout: Duration,
}

impl PoolConfig {
    /// Create a new configuration with the given database URL (a SQLite
    /// path).
    ///
    /// Defaults: 10 connections, 30 second checkout timeout.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: 10,
            connection_timeout: Duration::from_secs(30),
        }
    }

    /// Set the maximum number of connections in the pool.
    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    /// Set the connection checkout timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Get the database URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Per-connection SQLite pragmas applied on checkout.
///
/// SQLite's default busy handler gives up immediately, so a writer that
/// loses the lock race would surface SQLITE_BUSY instead of waiting and the
/// unique-violation mapping downstream would never see the real conflict.
/// Foreign keys are off by default and must be switched on per connection
/// for the declared `REFERENCES` clauses to be enforced.
#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000; PRAGMA foreign_keys = ON;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Shared SQLite connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<ConnectionManager<SqliteConnection>>,
}

impl DbPool {
    /// Build a pool from the configuration.
    pub fn new(config: &PoolConfig) -> Result<Self, PoolError> {
        let manager = ConnectionManager::<SqliteConnection>::new(config.database_url());
        let inner = Pool::builder()
            .max_size(config.max_size)
            .connection_timeout(config.connection_timeout)
            .connection_customizer(Box::new(ConnectionPragmas))
            .build(manager)
            .map_err(|error| PoolError::build(error.to_string()))?;
        Ok(Self { inner })
    }

    /// Build a single-connection in-memory pool for tests.
    ///
    /// Each SQLite `:memory:` connection is its own database, so the pool is
    /// capped at one connection to keep every checkout on the same data.
    pub fn new_in_memory() -> Result<Self, PoolError> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let inner = Pool::builder()
            .max_size(1)
            .connection_customizer(Box::new(ConnectionPragmas))
            .build(manager)
            .map_err(|error| PoolError::build(error.to_string()))?;
        Ok(Self { inner })
    }

    /// Check out a connection.
    pub fn get(&self) -> Result<SqlitePooledConnection, PoolError> {
        self.inner
            .get()
            .map_err(|error| PoolError::checkout(error.to_string()))
    }

    /// Apply any pending embedded migrations.
    pub fn run_migrations(&self) -> Result<(), PoolError> {
        let mut conn = self.get()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|_| ())
            .map_err(|error| PoolError::Migration {
                message: error.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use diesel::RunQueryDsl;
    use diesel::sql_types::Integer;

    use super::*;

    #[derive(diesel::QueryableByName)]
    struct BusyTimeout {
        #[diesel(sql_type = Integer)]
        timeout: i32,
    }

    #[derive(diesel::QueryableByName)]
    struct ForeignKeys {
        #[diesel(sql_type = Integer)]
        foreign_keys: i32,
    }

    #[test]
    fn checked_out_connections_carry_the_session_pragmas() {
        let pool = DbPool::new_in_memory().expect("in-memory pool");
        let mut conn = pool.get().expect("connection");

        let busy: BusyTimeout = diesel::sql_query("PRAGMA busy_timeout")
            .get_result(&mut conn)
            .expect("busy_timeout readable");
        assert_eq!(busy.timeout, 5000);

        let fks: ForeignKeys = diesel::sql_query("PRAGMA foreign_keys")
            .get_result(&mut conn)
            .expect("foreign_keys readable");
        assert_eq!(fks.foreign_keys, 1);
    }
}
