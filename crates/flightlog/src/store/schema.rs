//! `SQLite` schema definitions for the logbook.
//!
//! This module contains the SQL statements for creating and managing
//! the database schema.

/// SQL statement to create the flights table.
pub const CREATE_FLIGHTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS flights (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    pilot TEXT NOT NULL,
    designation TEXT NOT NULL DEFAULT 'PIC',
    aircraft TEXT NOT NULL,
    departure TEXT NOT NULL,
    departure_time TEXT NOT NULL,
    arrival TEXT NOT NULL,
    arrival_time TEXT NOT NULL,
    day_night TEXT NOT NULL DEFAULT 'Day',
    takeoffs INTEGER NOT NULL,
    landings INTEGER NOT NULL,
    duration TEXT NOT NULL,
    remarks TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create an index on flight date.
pub const CREATE_FLIGHT_DATE_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_flights_date ON flights(date)
";

/// SQL statement to create the pilots registry table.
pub const CREATE_PILOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS pilots (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    address TEXT NOT NULL DEFAULT '',
    telephone TEXT NOT NULL DEFAULT '',
    email TEXT NOT NULL DEFAULT ''
)
";

/// SQL statement to create the aircraft registry table.
pub const CREATE_AIRCRAFT_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS aircraft (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    registration TEXT NOT NULL UNIQUE,
    make TEXT NOT NULL DEFAULT '',
    model TEXT NOT NULL DEFAULT '',
    code TEXT NOT NULL DEFAULT '',
    engine_type TEXT NOT NULL DEFAULT 'SEP'
)
";

/// SQL statement to create the airfields registry table.
pub const CREATE_AIRFIELDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS airfields (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL DEFAULT '',
    county TEXT NOT NULL DEFAULT '',
    country TEXT NOT NULL DEFAULT '',
    telephone TEXT NOT NULL DEFAULT '',
    website TEXT NOT NULL DEFAULT ''
)
";

/// SQL statement to create the stored reports metadata table.
pub const CREATE_STORED_REPORTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS stored_reports (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    file_name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,
    content_hash TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All domain schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_FLIGHTS_TABLE,
    CREATE_FLIGHT_DATE_INDEX,
    CREATE_PILOTS_TABLE,
    CREATE_AIRCRAFT_TABLE,
    CREATE_AIRFIELDS_TABLE,
    CREATE_STORED_REPORTS_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.is_empty());
        }
    }

    #[test]
    fn test_create_flights_table_contains_required_columns() {
        assert!(CREATE_FLIGHTS_TABLE.contains("id INTEGER PRIMARY KEY"));
        assert!(CREATE_FLIGHTS_TABLE.contains("date TEXT NOT NULL"));
        assert!(CREATE_FLIGHTS_TABLE.contains("duration TEXT NOT NULL"));
        assert!(CREATE_FLIGHTS_TABLE.contains("takeoffs INTEGER NOT NULL"));
        assert!(CREATE_FLIGHTS_TABLE.contains("landings INTEGER NOT NULL"));
    }

    #[test]
    fn test_create_stored_reports_table_structure() {
        assert!(CREATE_STORED_REPORTS_TABLE.contains("file_name TEXT NOT NULL UNIQUE"));
        assert!(CREATE_STORED_REPORTS_TABLE.contains("created_at TEXT NOT NULL"));
        assert!(CREATE_STORED_REPORTS_TABLE.contains("content_hash TEXT NOT NULL"));
    }

    #[test]
    fn test_registry_uniqueness_constraints() {
        assert!(CREATE_AIRCRAFT_TABLE.contains("registration TEXT NOT NULL UNIQUE"));
        assert!(CREATE_AIRFIELDS_TABLE.contains("code TEXT NOT NULL UNIQUE"));
    }

    #[test]
    fn test_create_metadata_table_structure() {
        assert!(CREATE_METADATA_TABLE.contains("key TEXT PRIMARY KEY"));
        assert!(CREATE_METADATA_TABLE.contains("value TEXT NOT NULL"));
    }
}
