//! SQLite Geolocation Repository
//!
//! Implements GeolocationRepository using SQLite for storage. Each
//! operation opens its own connection inside spawn_blocking so database
//! I/O never blocks the async runtime.

use crate::domain::entities::{Geolocation, NewGeolocation};
use crate::domain::ports::{GeolocationRepository, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, ip_address, city, country_name, zip, created_at, updated_at";

/// SQLite-backed geolocation record store.
///
/// The schema is created on open; uniqueness is enforced by the UNIQUE
/// constraint on ip_address, which is the authoritative guard against
/// concurrent duplicate inserts.
pub struct SqliteGeolocationRepository {
    db_path: String,
}

impl SqliteGeolocationRepository {
    /// Open the repository, creating the schema when missing.
    pub fn open(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path).map_err(to_store_error)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS geolocations (
                 id           INTEGER PRIMARY KEY AUTOINCREMENT,
                 ip_address   TEXT NOT NULL UNIQUE,
                 city         TEXT NOT NULL,
                 country_name TEXT NOT NULL,
                 zip          TEXT NOT NULL,
                 created_at   TEXT NOT NULL,
                 updated_at   TEXT NOT NULL
             )",
        )
        .map_err(to_store_error)?;

        Ok(Self {
            db_path: db_path.to_string(),
        })
    }

    /// Run a blocking database operation on its own connection.
    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path).map_err(to_store_error)?;
            op(&conn).map_err(to_store_error)
        })
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?
    }

    /// Convert a SQLite row to a Geolocation entity.
    fn row_to_geolocation(row: &Row) -> rusqlite::Result<Geolocation> {
        Ok(Geolocation {
            id: row.get(0)?,
            ip_address: row.get(1)?,
            city: row.get(2)?,
            country_name: row.get(3)?,
            zip: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
        })
    }
}

fn to_store_error(e: rusqlite::Error) -> StoreError {
    match e {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            StoreError::UniqueViolation
        }
        other => StoreError::Backend(other.to_string()),
    }
}

#[async_trait]
impl GeolocationRepository for SqliteGeolocationRepository {
    async fn exists(&self, ip_address: &str) -> Result<bool, StoreError> {
        let ip_address = ip_address.to_string();
        self.with_conn(move |conn| {
            let found: i64 = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM geolocations WHERE ip_address = ?1)",
                params![ip_address],
                |row| row.get(0),
            )?;
            Ok(found != 0)
        })
        .await
    }

    async fn insert(&self, record: NewGeolocation) -> Result<Geolocation, StoreError> {
        self.with_conn(move |conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO geolocations (ip_address, city, country_name, zip, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.ip_address,
                    record.city,
                    record.country_name,
                    record.zip,
                    now,
                    now
                ],
            )?;

            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {} FROM geolocations WHERE id = ?1", COLUMNS),
                params![id],
                Self::row_to_geolocation,
            )
        })
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Geolocation>, StoreError> {
        self.with_conn(move |conn| {
            conn.query_row(
                &format!("SELECT {} FROM geolocations WHERE id = ?1", COLUMNS),
                params![id],
                Self::row_to_geolocation,
            )
            .optional()
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM geolocations WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn all(&self) -> Result<Vec<Geolocation>, StoreError> {
        self.with_conn(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM geolocations ORDER BY id",
                COLUMNS
            ))?;
            let records = stmt
                .query_map([], Self::row_to_geolocation)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
        .await
    }
}
