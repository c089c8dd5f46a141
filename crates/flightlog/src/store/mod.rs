//! Storage layer for the logbook.
//!
//! This module provides `SQLite`-based persistent storage for flight-log
//! entries, the supporting registries, and the metadata records of
//! archived PDF reports.

pub mod migrations;
mod registry;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{DayNight, FlightRecord};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata record for one archived report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredReport {
    /// Unique identifier of the metadata row.
    pub id: i64,
    /// Durable file name, e.g. "`FlightLog_2026-03-14_15-09-26.pdf`".
    pub file_name: String,
    /// When the report was archived.
    pub created_at: DateTime<Utc>,
    /// BLAKE3 hash of the file contents at archive time.
    pub content_hash: String,
}

/// Storage engine for the logbook.
///
/// Provides persistent storage using `SQLite` with support for:
/// - Flight entry insertion, enumeration, and removal
/// - Pilot, aircraft, and airfield registries
/// - Stored-report metadata records for the archive
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    /// Initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Enable WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Flight entries ===

    /// Insert a flight entry and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn insert_flight(&self, record: &FlightRecord) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO flights (
                date, pilot, designation, aircraft,
                departure, departure_time, arrival, arrival_time,
                day_night, takeoffs, landings, duration, remarks
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
            ",
            params![
                record.date.format(DATE_FORMAT).to_string(),
                record.pilot,
                record.designation,
                record.aircraft,
                record.departure,
                record.departure_time.format(DATETIME_FORMAT).to_string(),
                record.arrival,
                record.arrival_time.format(DATETIME_FORMAT).to_string(),
                record.day_night.to_string(),
                i64::from(record.takeoffs),
                i64::from(record.landings),
                record.duration,
                record.remarks,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Inserted flight with id {}", id);
        Ok(id)
    }

    /// Get all flight entries, in insertion order.
    ///
    /// The report and the totals view both consume this sequence as-is, so
    /// the entry order (not the flight dates) decides row order and the
    /// first-wins tie-break for longest/shortest.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flights(&self) -> Result<Vec<FlightRecord>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, date, pilot, designation, aircraft,
                   departure, departure_time, arrival, arrival_time,
                   day_night, takeoffs, landings, duration, remarks
            FROM flights ORDER BY id ASC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_flight)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Get a flight entry by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn flight(&self, id: i64) -> Result<Option<FlightRecord>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, date, pilot, designation, aircraft,
                       departure, departure_time, arrival, arrival_time,
                       day_night, takeoffs, landings, duration, remarks
                FROM flights WHERE id = ?1
                ",
                [id],
                Self::row_to_flight,
            )
            .optional()?;
        Ok(result)
    }

    /// Delete a flight entry by id.
    ///
    /// Returns `true` if an entry was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_flight(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM flights WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    // === Stored report records ===

    /// Insert a metadata record for an archived report file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails, including when
    /// the file name is already recorded.
    pub fn insert_report_record(
        &self,
        file_name: &str,
        created_at: DateTime<Utc>,
        content_hash: &str,
    ) -> Result<StoredReport> {
        self.conn.execute(
            r"
            INSERT INTO stored_reports (file_name, created_at, content_hash)
            VALUES (?1, ?2, ?3)
            ",
            params![file_name, created_at.to_rfc3339(), content_hash],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("Recorded stored report {} as id {}", file_name, id);
        Ok(StoredReport {
            id,
            file_name: file_name.to_string(),
            created_at,
            content_hash: content_hash.to_string(),
        })
    }

    /// Get all stored-report records in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stored_reports(&self) -> Result<Vec<StoredReport>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, file_name, created_at, content_hash
            FROM stored_reports ORDER BY id ASC
            ",
        )?;

        let reports = stmt
            .query_map([], Self::row_to_report)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    /// Get a stored-report record by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stored_report(&self, id: i64) -> Result<Option<StoredReport>> {
        let result = self
            .conn
            .query_row(
                r"
                SELECT id, file_name, created_at, content_hash
                FROM stored_reports WHERE id = ?1
                ",
                [id],
                Self::row_to_report,
            )
            .optional()?;
        Ok(result)
    }

    /// Delete a stored-report record by id.
    ///
    /// Returns `true` if a record was deleted, `false` if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_report_record(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM stored_reports WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Convert a database row to a `FlightRecord`.
    fn row_to_flight(row: &rusqlite::Row) -> rusqlite::Result<FlightRecord> {
        let id: i64 = row.get(0)?;
        let date_str: String = row.get(1)?;
        let departure_time_str: String = row.get(6)?;
        let arrival_time_str: String = row.get(8)?;
        let day_night_str: String = row.get(9)?;

        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT).unwrap_or_else(|_| {
            warn!("Unparsable flight date '{}', substituting today", date_str);
            Utc::now().date_naive()
        });

        Ok(FlightRecord {
            id: Some(id),
            date,
            pilot: row.get(2)?,
            designation: row.get(3)?,
            aircraft: row.get(4)?,
            departure: row.get(5)?,
            departure_time: parse_datetime(&departure_time_str),
            arrival: row.get(7)?,
            arrival_time: parse_datetime(&arrival_time_str),
            day_night: DayNight::parse(&day_night_str),
            takeoffs: row.get(10)?,
            landings: row.get(11)?,
            duration: row.get(12)?,
            remarks: row.get(13)?,
        })
    }

    /// Convert a database row to a `StoredReport`.
    fn row_to_report(row: &rusqlite::Row) -> rusqlite::Result<StoredReport> {
        let created_at_str: String = row.get(2)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc));

        Ok(StoredReport {
            id: row.get(0)?,
            file_name: row.get(1)?,
            created_at,
            content_hash: row.get(3)?,
        })
    }
}

fn parse_datetime(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).unwrap_or_else(|_| {
        warn!("Unparsable timestamp '{}', substituting now", text);
        Utc::now().naive_utc()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::tests::sample_record;

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_open_in_memory() {
        let storage = Storage::open_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_insert_and_get_flight() {
        let storage = create_test_storage();
        let record = sample_record("01:15");

        let id = storage.insert_flight(&record).unwrap();
        let retrieved = storage.flight(id).unwrap().unwrap();

        assert_eq!(retrieved.id, Some(id));
        assert_eq!(retrieved.date, record.date);
        assert_eq!(retrieved.pilot, record.pilot);
        assert_eq!(retrieved.designation, "PIC");
        assert_eq!(retrieved.aircraft, record.aircraft);
        assert_eq!(retrieved.departure, record.departure);
        assert_eq!(retrieved.departure_time, record.departure_time);
        assert_eq!(retrieved.arrival, record.arrival);
        assert_eq!(retrieved.arrival_time, record.arrival_time);
        assert_eq!(retrieved.day_night, record.day_night);
        assert_eq!(retrieved.takeoffs, 1);
        assert_eq!(retrieved.landings, 1);
        assert_eq!(retrieved.duration, "01:15");
        assert_eq!(retrieved.remarks, "");
    }

    #[test]
    fn test_get_nonexistent_flight() {
        let storage = create_test_storage();
        assert!(storage.flight(99_999).unwrap().is_none());
    }

    #[test]
    fn test_flights_insertion_order_ignores_dates() {
        let storage = create_test_storage();

        let mut first = sample_record("01:00");
        first.date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
        let mut second = sample_record("02:00");
        second.date = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();

        let first_id = storage.insert_flight(&first).unwrap();
        let second_id = storage.insert_flight(&second).unwrap();

        // A backdated entry stays where it was entered; the list is never
        // re-sorted by flight date.
        let flights = storage.flights().unwrap();
        assert_eq!(flights.len(), 2);
        assert_eq!(flights[0].id, Some(first_id));
        assert_eq!(flights[0].date, first.date);
        assert_eq!(flights[1].id, Some(second_id));
        assert_eq!(flights[1].date, second.date);
    }

    #[test]
    fn test_flights_same_date_keep_insertion_order() {
        let storage = create_test_storage();

        let mut first = sample_record("01:00");
        first.pilot = "First".to_string();
        let mut second = sample_record("02:00");
        second.pilot = "Second".to_string();

        storage.insert_flight(&first).unwrap();
        storage.insert_flight(&second).unwrap();

        let flights = storage.flights().unwrap();
        assert_eq!(flights[0].pilot, "First");
        assert_eq!(flights[1].pilot, "Second");
    }

    #[test]
    fn test_delete_flight() {
        let storage = create_test_storage();
        let id = storage.insert_flight(&sample_record("01:00")).unwrap();

        assert!(storage.delete_flight(id).unwrap());
        assert!(storage.flight(id).unwrap().is_none());
        assert!(!storage.delete_flight(id).unwrap());
    }

    #[test]
    fn test_insert_and_list_report_records() {
        let storage = create_test_storage();
        let created = Utc::now();

        let first = storage
            .insert_report_record("FlightLog_2026-03-14_15-09-26.pdf", created, "abc123")
            .unwrap();
        let second = storage
            .insert_report_record("FlightLog_2026-03-14_15-09-27.pdf", created, "def456")
            .unwrap();

        let reports = storage.stored_reports().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].id, first.id);
        assert_eq!(reports[1].id, second.id);
        assert_eq!(reports[0].file_name, "FlightLog_2026-03-14_15-09-26.pdf");
        assert_eq!(reports[0].content_hash, "abc123");
    }

    #[test]
    fn test_report_record_round_trips_timestamp() {
        let storage = create_test_storage();
        let created = Utc::now();

        let inserted = storage
            .insert_report_record("FlightLog_2026-03-14_15-09-26.pdf", created, "abc123")
            .unwrap();
        let loaded = storage.stored_report(inserted.id).unwrap().unwrap();

        // RFC 3339 keeps sub-second precision, so the round trip is exact.
        assert_eq!(loaded.created_at, created);
    }

    #[test]
    fn test_duplicate_report_file_name_is_rejected() {
        let storage = create_test_storage();
        let created = Utc::now();

        storage
            .insert_report_record("FlightLog_2026-03-14_15-09-26.pdf", created, "abc123")
            .unwrap();
        let result =
            storage.insert_report_record("FlightLog_2026-03-14_15-09-26.pdf", created, "def456");

        assert!(matches!(result, Err(Error::DatabaseQuery(_))));
    }

    #[test]
    fn test_delete_report_record() {
        let storage = create_test_storage();
        let report = storage
            .insert_report_record("FlightLog_2026-03-14_15-09-26.pdf", Utc::now(), "abc123")
            .unwrap();

        assert!(storage.delete_report_record(report.id).unwrap());
        assert!(storage.stored_report(report.id).unwrap().is_none());
        assert!(!storage.delete_report_record(report.id).unwrap());
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let temp = tempfile::TempDir::new().unwrap();
        let nested_path = temp.path().join("nested/dir/logbook.db");

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        assert_eq!(storage.path(), nested_path);
    }

    #[test]
    fn test_open_file_based_round_trip() {
        let temp = tempfile::TempDir::new().unwrap();
        let db_path = temp.path().join("logbook.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.insert_flight(&sample_record("01:30")).unwrap();
        }

        let reopened = Storage::open(&db_path).unwrap();
        let flights = reopened.flights().unwrap();
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].duration, "01:30");
    }
}
