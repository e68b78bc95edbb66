//! SQLite-backed sessions. The state is stored as a bincode blob per slot.

use anyhow::{anyhow, Context, Result};
use farm_core::FarmState;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::future::Future;
use std::str::FromStr;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::{debug, info};

use crate::StateStore;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS sessions (
    slot TEXT PRIMARY KEY,
    farm_name TEXT,
    week INTEGER NOT NULL,
    status TEXT NOT NULL,
    state BLOB NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Open (creating if needed) the database at `url` and apply the schema.
pub async fn init_db(url: &str) -> Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid sqlite url {url}"))?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(opts)
        .await
        .with_context(|| format!("connecting to {url}"))?;
    sqlx::query(SCHEMA).execute(&pool).await?;
    info!(url, "session schema ready");
    Ok(pool)
}

/// Insert or replace the state saved under `slot`.
pub async fn save_state(pool: &SqlitePool, slot: &str, state: &FarmState) -> Result<()> {
    let blob = bincode::serialize(state)?;
    let status = format!("{:?}", state.status).to_lowercase();
    sqlx::query(
        "INSERT INTO sessions (slot, farm_name, week, status, state, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         ON CONFLICT(slot) DO UPDATE SET
            farm_name = excluded.farm_name,
            week = excluded.week,
            status = excluded.status,
            state = excluded.state,
            updated_at = excluded.updated_at",
    )
    .bind(slot)
    .bind(state.farm_name.as_deref())
    .bind(i64::from(state.week))
    .bind(status)
    .bind(blob)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    debug!(slot, week = state.week, "session saved");
    Ok(())
}

pub async fn load_state(pool: &SqlitePool, slot: &str) -> Result<Option<FarmState>> {
    let row = sqlx::query_as::<_, (Vec<u8>,)>("SELECT state FROM sessions WHERE slot = ?")
        .bind(slot)
        .fetch_optional(pool)
        .await?;
    match row {
        Some((blob,)) => {
            let state = bincode::deserialize(&blob)
                .with_context(|| format!("decoding session {slot}"))?;
            Ok(Some(state))
        }
        None => Ok(None),
    }
}

pub async fn clear_state(pool: &SqlitePool, slot: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE slot = ?")
        .bind(slot)
        .execute(pool)
        .await?;
    Ok(())
}

/// Blocking [`StateStore`] over a SQLite database.
///
/// Owns a private single-threaded runtime. When called from inside another
/// runtime the query runs on a scoped helper thread instead.
pub struct SqliteStore {
    rt: Runtime,
    pool: SqlitePool,
    slot: String,
}

impl SqliteStore {
    pub fn open(url: &str, slot: &str) -> Result<Self> {
        let rt = Builder::new_current_thread().enable_all().build()?;
        let pool = rt.block_on(init_db(url))?;
        Ok(Self {
            rt,
            pool,
            slot: slot.to_string(),
        })
    }

    fn run<T: Send>(&self, fut: impl Future<Output = Result<T>> + Send) -> Result<T> {
        if Handle::try_current().is_err() {
            return self.rt.block_on(fut);
        }
        std::thread::scope(|scope| {
            scope
                .spawn(|| self.rt.block_on(fut))
                .join()
                .map_err(|_| anyhow!("sqlite worker panicked"))?
        })
    }
}

impl StateStore for SqliteStore {
    fn load(&mut self) -> Result<Option<FarmState>> {
        self.run(load_state(&self.pool, &self.slot))
    }

    fn save(&mut self, state: &FarmState) -> Result<()> {
        self.run(save_state(&self.pool, &self.slot, state))
    }

    fn clear(&mut self) -> Result<()> {
        self.run(clear_state(&self.pool, &self.slot))
    }
}
