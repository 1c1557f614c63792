//! SQLite persistence layer for the analysis decoder bot.
//!
//! Stores registered user profiles and their history of decoded
//! reports and manual vitals entries. All operations are free
//! functions taking a `&SqlitePool`; the [`Database`] wrapper owns
//! the pool and runs migrations.

pub mod error;
pub mod models;
pub mod record;
pub mod user;

pub use error::{DatabaseError, Result};
pub use models::{NewRecord, NewUser, Record, User};
pub use record::{
    count_records, delete_records_for_user, get_record, insert_record, list_records,
    DEFAULT_HISTORY_LIMIT,
};
pub use user::{
    count_users, create_user, delete_user, get_user, get_user_by_chat_id, update_user,
};

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

/// Database handle owning the connection pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to a SQLite database, creating the file if needed.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, 5).await
    }

    /// Connect with an explicit pool size.
    pub async fn connect_with_pool_size(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await?;

        info!(url, "connected to database");

        Ok(Self { pool })
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for in-flight queries.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
