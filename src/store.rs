//! Data access for the `users` table.
//!
//! [`UserStore`] is the seam handlers are written against. [`SqlUserStore`]
//! implements it over a `sqlx` [`AnyPool`], so the same statements run on
//! PostgreSQL in production and on SQLite in tests.
//!
//! Every statement binds its arguments positionally (`$1`, `$2`, ...). Values
//! are never formatted into SQL text.
//!
//! The pool is `Send + Sync` and owns all connection management; a single
//! `SqlUserStore` is shared by every in-flight request.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::{debug, instrument};

use crate::user::{User, validate};

/// Failures surfaced by a [`UserStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input rejected before reaching the database.
    #[error("{0}")]
    Validation(String),

    /// No row with this id.
    #[error("user {0} not found")]
    NotFound(i64),

    /// Connectivity, constraint violation, or any other database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Entity operations over the users table. Implementations must be safe to
/// share between concurrent requests.
#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Every user, in whatever order the store returns them. Empty is not an error.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn get_user(&self, id: i64) -> Result<User, StoreError>;

    /// Inserts a user and returns it with its store-assigned id.
    async fn create_user(&self, name: &str, email: &str) -> Result<User, StoreError>;

    /// Overwrites both fields, then re-reads the row so the caller sees the
    /// stored state rather than an echo of its input.
    async fn update_user(&self, id: i64, name: &str, email: &str) -> Result<User, StoreError>;

    /// Reads the row, deletes it, and returns what was deleted.
    async fn delete_user(&self, id: i64) -> Result<User, StoreError>;

    /// Round trip to the database, used by the readiness probe.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// SQL flavour of the connected database. Only the bootstrap DDL differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Picks the dialect from a connection URL's scheme.
    pub fn from_url(url: &str) -> Self {
        if url.starts_with("sqlite:") { Self::Sqlite } else { Self::Postgres }
    }

    fn create_table(self) -> &'static str {
        match self {
            Self::Postgres => {
                "CREATE TABLE IF NOT EXISTS users (id SERIAL PRIMARY KEY, name TEXT NOT NULL, email TEXT NOT NULL)"
            }
            Self::Sqlite => {
                "CREATE TABLE IF NOT EXISTS users (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, email TEXT NOT NULL)"
            }
        }
    }
}

/// [`UserStore`] backed by a relational database through `sqlx`.
#[derive(Clone)]
pub struct SqlUserStore {
    pool: AnyPool,
    dialect: Dialect,
}

impl SqlUserStore {
    /// Connects to `url` (`postgres://…` or `sqlite:…`).
    ///
    /// An in-memory SQLite database lives and dies with its connection, so
    /// for those the pool is pinned to one connection that is never recycled.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        sqlx::any::install_default_drivers();

        let dialect = Dialect::from_url(url);
        let mut options = AnyPoolOptions::new();
        if dialect == Dialect::Sqlite && url.contains(":memory:") {
            options = options.max_connections(1).idle_timeout(None::<Duration>).max_lifetime(None::<Duration>);
        }

        let pool = options.connect(url).await?;
        debug!(?dialect, "connected to user store");
        Ok(Self { pool, dialect })
    }

    pub fn from_pool(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    pub fn dialect(&self) -> Dialect { self.dialect }

    /// Closes the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Creates the `users` table if it does not exist yet. Safe to run on
    /// every start.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(self.dialect.create_table()).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    #[instrument(skip(self), err)]
    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>("SELECT id, name, email FROM users")
            .fetch_all(&self.pool)
            .await?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    #[instrument(skip(self), err)]
    async fn get_user(&self, id: i64) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self), err)]
    async fn create_user(&self, name: &str, email: &str) -> Result<User, StoreError> {
        validate(name, email)?;

        let id: i64 = sqlx::query_scalar("INSERT INTO users (name, email) VALUES ($1, $2) RETURNING id")
            .bind(name)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(User { id, name: name.to_owned(), email: email.to_owned() })
    }

    #[instrument(skip(self), err)]
    async fn update_user(&self, id: i64, name: &str, email: &str) -> Result<User, StoreError> {
        validate(name, email)?;

        let result = sqlx::query("UPDATE users SET name = $1, email = $2 WHERE id = $3")
            .bind(name)
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        self.get_user(id).await
    }

    #[instrument(skip(self), err)]
    async fn delete_user(&self, id: i64) -> Result<User, StoreError> {
        let user = self.get_user(id).await?;

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        // Lost a race with a concurrent delete.
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(user)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
