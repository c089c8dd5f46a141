//! Error types for flightlog.
//!
//! This module defines all error types used throughout the flightlog crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flightlog operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Report Errors ===
    /// Report rendering failed before any bytes were produced.
    #[error("report rendering failed: {message}")]
    Render {
        /// Description of what went wrong.
        message: String,
    },

    // === Archive Errors ===
    /// Failed to write a staged report file. Nothing durable was touched.
    #[error("failed to stage report at {path}: {source}")]
    ReportStage {
        /// Path of the staged file that could not be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to copy a staged report into durable storage. The staged
    /// file is left in place so the promotion can be retried.
    #[error("failed to promote report '{file_name}': {source}")]
    ReportPromote {
        /// The durable file name the report was headed for.
        file_name: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A promoted file could not be rolled back after its metadata insert
    /// failed, leaving an orphaned file in the reports directory.
    #[error("failed to roll back report file {path}: {source}")]
    ReportRollback {
        /// Path of the orphaned durable file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An archived report file exists but could not be removed. Its
    /// metadata record is kept so the deletion can be retried.
    #[error("failed to remove archived report {path}: {source}")]
    ReportDelete {
        /// Path of the file that could not be removed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A stored report's metadata exists but its file is gone.
    #[error("stored report {id} ('{file_name}') is missing its file")]
    StaleReport {
        /// Metadata row id of the stale report.
        id: i64,
        /// The durable file name that could not be found.
        file_name: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for flightlog operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new render error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new migration error.
    #[must_use]
    pub fn migration(message: impl Into<String>) -> Self {
        Self::DatabaseMigration {
            message: message.into(),
        }
    }

    /// Check if this error means a stored report's file has gone missing.
    #[must_use]
    pub fn is_stale_report(&self) -> bool {
        matches!(self, Self::StaleReport { .. })
    }
}
