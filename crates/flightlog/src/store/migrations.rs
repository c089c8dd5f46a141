//! Database migration system for the logbook.
//!
//! Schema changes are expressed as an ordered table of versioned
//! migrations; the version reached is recorded in the metadata table so
//! an existing database is brought forward exactly once per change.

use rusqlite::Connection;
use tracing::debug;

use crate::error::{Error, Result};

use super::schema;

/// One schema migration step.
struct Migration {
    /// Version this migration brings the database to.
    version: i32,
    /// Short human-readable summary, used in logs.
    description: &'static str,
    /// Statements to execute, in order.
    statements: &'static [&'static str],
}

/// All migrations, oldest first.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "initial logbook schema",
    statements: schema::SCHEMA_STATEMENTS,
}];

/// The schema version a fully migrated database is at.
pub const CURRENT_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Initialize the database schema.
///
/// Creates the metadata table, then applies every migration newer than
/// the recorded version. Safe to call on every open.
///
/// # Errors
///
/// Returns an error if a migration statement fails or the recorded
/// version cannot be read.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(schema::CREATE_METADATA_TABLE, [])?;

    let version = get_schema_version(conn)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > version) {
        debug!(
            "Applying migration {}: {}",
            migration.version, migration.description
        );
        for statement in migration.statements {
            conn.execute(statement, [])?;
        }
        set_schema_version(conn, migration.version)?;
    }

    Ok(())
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (fresh database).
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<String, rusqlite::Error> = conn.query_row(
        "SELECT value FROM metadata WHERE key = ?1",
        [VERSION_KEY],
        |row| row.get(0),
    );

    match result {
        Ok(value) => value
            .parse()
            .map_err(|_| Error::migration(format!("invalid schema version: {value}"))),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Set the schema version in the database.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_db() -> Connection {
        Connection::open_in_memory().expect("failed to create in-memory database")
    }

    fn table_exists(conn: &Connection, name: &str) -> bool {
        let count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        for table in ["flights", "pilots", "aircraft", "airfields", "stored_reports", "metadata"] {
            assert!(table_exists(&conn, table), "missing table {table}");
        }
    }

    #[test]
    fn test_initialize_schema_sets_version() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_initialize_schema_idempotent() {
        let conn = create_test_db();

        initialize_schema(&conn).expect("first init failed");
        initialize_schema(&conn).expect("second init failed");

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_VERSION);
    }

    #[test]
    fn test_get_schema_version_fresh_db() {
        let conn = create_test_db();
        conn.execute(schema::CREATE_METADATA_TABLE, []).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 0);
    }

    #[test]
    fn test_set_and_get_schema_version() {
        let conn = create_test_db();
        conn.execute(schema::CREATE_METADATA_TABLE, []).unwrap();

        set_schema_version(&conn, 42).unwrap();
        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, 42);
    }

    #[test]
    fn test_invalid_version_is_a_migration_error() {
        let conn = create_test_db();
        conn.execute(schema::CREATE_METADATA_TABLE, []).unwrap();
        conn.execute(
            "INSERT INTO metadata (key, value) VALUES ('schema_version', 'not a number')",
            [],
        )
        .unwrap();

        let err = get_schema_version(&conn).unwrap_err();
        assert!(err.to_string().contains("invalid schema version"));
    }

    #[test]
    fn test_migrations_are_strictly_increasing() {
        let mut last = 0;
        for migration in MIGRATIONS {
            assert!(migration.version > last);
            last = migration.version;
        }
        assert_eq!(last, CURRENT_VERSION);
    }

    #[test]
    fn test_newer_database_is_left_alone() {
        let conn = create_test_db();
        conn.execute(schema::CREATE_METADATA_TABLE, []).unwrap();
        set_schema_version(&conn, CURRENT_VERSION + 1).unwrap();

        initialize_schema(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_VERSION + 1);
        // No migration ran, so the flights table was never created.
        assert!(!table_exists(&conn, "flights"));
    }

    #[test]
    fn test_flight_date_index_created() {
        let conn = create_test_db();
        initialize_schema(&conn).expect("failed to initialize schema");

        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index' AND tbl_name='flights'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(std::result::Result::ok)
            .collect();

        assert!(indexes.iter().any(|n| n.contains("date")));
    }
}
