//! # Verse Store
//!
//! The store owns the single cached SQLite connection of the process and exposes the
//! read operations the handlers need, plus the wholesale replacement used by the
//! bulk loader.
//!
//! ## Connection policy
//!
//! - The connection is opened on first use and reused by every later call. If opening
//!   fails the error is returned and the next call tries again, so a caller that keeps
//!   the `Store` around recovers once the database becomes reachable.
//! - Each operation runs on Tokio's blocking pool (`spawn_blocking`). The connection
//!   mutex is only locked inside that closure, never across an `.await`.
//! - `close` drops the connection; the server calls it after the HTTP server stops.
//!
//! Identifiers are UUIDs. `find_by_id` validates the syntax before reaching SQLite and
//! reports malformed input as [`StoreError::InvalidIdentifier`].

mod queries;
mod schema;

pub use queries::LoadReport;

use common::model::health::ConnectionState;
use common::model::verse::{NewVerse, VerseRecord};
use log::{info, warn};
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Where the database lives and how long a query may wait for a lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub location: Location,
    pub busy_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Memory,
    File(PathBuf),
}

impl Location {
    /// Accepts a plain path, a `sqlite://` URL, or `:memory:`.
    pub fn parse(url: &str) -> Location {
        let path = url
            .trim()
            .strip_prefix("sqlite://")
            .or_else(|| url.trim().strip_prefix("sqlite:"))
            .unwrap_or(url.trim());
        if path == ":memory:" {
            Location::Memory
        } else {
            Location::File(PathBuf::from(path))
        }
    }
}

impl StoreSettings {
    pub fn new(url: &str, busy_timeout: Duration) -> StoreSettings {
        StoreSettings {
            location: Location::parse(url),
            busy_timeout,
        }
    }

    pub fn in_memory() -> StoreSettings {
        StoreSettings {
            location: Location::Memory,
            busy_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&AppConfig> for StoreSettings {
    fn from(config: &AppConfig) -> Self {
        StoreSettings::new(&config.database_url, config.busy_timeout)
    }
}

/// Cheaply clonable handle to the process-wide store connection.
#[derive(Clone)]
pub struct Store {
    settings: Arc<StoreSettings>,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl Store {
    /// Creates a store without connecting; the first operation opens the connection.
    pub fn new(settings: StoreSettings) -> Store {
        Store {
            settings: Arc::new(settings),
            conn: Arc::new(Mutex::new(None)),
        }
    }

    /// Opens the connection now, surfacing any failure to the caller.
    pub async fn connect(&self) -> Result<(), StoreError> {
        self.run(|_| Ok(())).await
    }

    pub async fn close(&self) -> Result<(), StoreError> {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let taken = lock(&conn)?.take();
            if let Some(c) = taken {
                c.close().map_err(|(_, e)| StoreError::Database(e))?;
                info!("Database connection closed");
            }
            Ok(())
        })
        .await?
    }

    pub async fn ping(&self) -> ConnectionState {
        match self.run(|c| Ok(queries::ping(c)?)).await {
            Ok(()) => ConnectionState::Connected,
            Err(e) => {
                warn!("Database ping failed: {}", e);
                ConnectionState::Disconnected
            }
        }
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.run(|c| Ok(queries::count(c)?)).await
    }

    /// Returns `Ok(None)` when no verse has this id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<VerseRecord>, StoreError> {
        let id = parse_id(id)?;
        self.run(move |c| Ok(queries::find_by_id(c, &id)?)).await
    }

    /// Returns the verse at zero-based `offset` in insertion order.
    pub async fn find_at_offset(&self, offset: u64) -> Result<Option<VerseRecord>, StoreError> {
        self.run(move |c| Ok(queries::find_at_offset(c, offset)?)).await
    }

    pub async fn find_page(&self, skip: u64, take: u64) -> Result<Vec<VerseRecord>, StoreError> {
        self.run(move |c| Ok(queries::find_page(c, skip, take)?)).await
    }

    /// Case-insensitive literal substring match on `source`.
    pub async fn find_by_source_substring(
        &self,
        text: &str,
        limit: u64,
    ) -> Result<Vec<VerseRecord>, StoreError> {
        let pattern = format!("(?i){}", crate::search::escape_pattern(text));
        let limit = limit.min(crate::search::MAX_RESULTS);
        self.run(move |c| Ok(queries::find_by_source_pattern(c, &pattern, limit)?))
            .await
    }

    /// Deletes the whole collection and loads `verses` in its place.
    pub async fn replace_all(&self, verses: Vec<NewVerse>) -> Result<LoadReport, StoreError> {
        self.run_mut(move |c| Ok(queries::replace_all(c, &verses)?))
            .await
    }

    async fn run<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        self.run_mut(move |c| f(&*c)).await
    }

    async fn run_mut<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let settings = Arc::clone(&self.settings);
        tokio::task::spawn_blocking(move || {
            let mut guard = lock(&conn)?;
            if guard.is_none() {
                *guard = Some(open(&settings)?);
            }
            match guard.as_mut() {
                Some(c) => f(c),
                None => Err(StoreError::Unavailable("no connection".to_string())),
            }
        })
        .await?
    }
}

fn lock(
    conn: &Mutex<Option<Connection>>,
) -> Result<std::sync::MutexGuard<'_, Option<Connection>>, StoreError> {
    conn.lock()
        .map_err(|_| StoreError::Unavailable("connection lock poisoned".to_string()))
}

fn open(settings: &StoreSettings) -> Result<Connection, StoreError> {
    let conn = match &settings.location {
        Location::Memory => Connection::open_in_memory(),
        Location::File(path) => Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
                | OpenFlags::SQLITE_OPEN_URI,
        ),
    }
    .map_err(|e| StoreError::Unavailable(e.to_string()))?;

    conn.busy_timeout(settings.busy_timeout)?;
    schema::register_functions(&conn)?;
    schema::ensure(&conn)?;

    match &settings.location {
        Location::Memory => info!("Connected to in-memory database"),
        Location::File(path) => info!("Connected to database at {}", path.display()),
    }
    Ok(conn)
}

/// Accepts any UUID notation and returns it parsed.
pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::InvalidIdentifier(id.to_string()))
}
