//! The report archive: staged and durable report files.
//!
//! A rendered report moves through two phases. `stage` writes the bytes
//! to a temp file the user can preview; `promote` copies that file into
//! the reports directory under a timestamped name and records it in
//! storage, while `discard` throws the staged file away. Promotion is
//! atomic from the caller's viewpoint: afterwards either both the
//! durable file and its metadata record exist, or neither does.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::store::{Storage, StoredReport};

const FILE_PREFIX: &str = "FlightLog_";
const FILE_EXTENSION: &str = "pdf";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Handle to a staged (not yet archived) report file.
///
/// The file is not removed when the handle drops: a failed promotion
/// must leave it behind so the caller can retry. It is removed by a
/// successful [`ReportArchive::promote`] or an explicit
/// [`ReportArchive::discard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedReport {
    path: PathBuf,
    content_hash: String,
}

impl StagedReport {
    /// Path of the staged file, usable for preview or export.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// BLAKE3 hash of the staged bytes.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

/// Two-phase store for generated report documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportArchive {
    reports_dir: PathBuf,
    staging_dir: PathBuf,
}

impl ReportArchive {
    /// Create an archive over the given directories, creating both if
    /// they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be created.
    pub fn new(reports_dir: impl Into<PathBuf>, staging_dir: impl Into<PathBuf>) -> Result<Self> {
        let reports_dir = reports_dir.into();
        let staging_dir = staging_dir.into();
        for dir in [&reports_dir, &staging_dir] {
            fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(Self {
            reports_dir,
            staging_dir,
        })
    }

    /// Directory holding archived report files.
    #[must_use]
    pub fn reports_dir(&self) -> &Path {
        &self.reports_dir
    }

    /// Path of an archived report file.
    #[must_use]
    pub fn report_path(&self, record: &StoredReport) -> PathBuf {
        self.reports_dir.join(&record.file_name)
    }

    /// Write report bytes to a staged temp file.
    ///
    /// Nothing durable changes; the caller can preview the file, then
    /// [`promote`](Self::promote) or [`discard`](Self::discard) it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportStage`] if the temp file cannot be written.
    pub fn stage(&self, bytes: &[u8]) -> Result<StagedReport> {
        let stage_err = |source: io::Error| Error::ReportStage {
            path: self.staging_dir.clone(),
            source,
        };

        let content_hash = blake3::hash(bytes).to_hex().to_string();
        let mut temp = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(".pdf")
            .tempfile_in(&self.staging_dir)
            .map_err(stage_err)?;
        temp.write_all(bytes).map_err(stage_err)?;
        let (_, path) = temp.keep().map_err(|e| stage_err(e.error))?;

        debug!("Staged report at {}", path.display());
        Ok(StagedReport { path, content_hash })
    }

    /// Promote a staged report into durable storage.
    ///
    /// The staged file is copied into the reports directory under a
    /// timestamped name (with a counter suffix if two reports land in
    /// the same second), verified against the staged hash, and recorded
    /// in storage. On success the staged file is removed; removal
    /// failure is logged, not fatal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportPromote`] if the copy fails; the staged
    /// file is left intact and nothing durable changed. If the metadata
    /// insert fails, the copied file is rolled back and the insert error
    /// propagates; should that rollback itself fail,
    /// [`Error::ReportRollback`] reports the orphaned path.
    pub fn promote(&self, storage: &Storage, staged: &StagedReport) -> Result<StoredReport> {
        let created_at = Utc::now();
        let file_name = unique_file_name(&self.reports_dir, &Local::now());
        let durable_path = self.reports_dir.join(&file_name);

        self.copy_staged(staged, &durable_path, &file_name)?;

        let record =
            match storage.insert_report_record(&file_name, created_at, staged.content_hash()) {
                Ok(record) => record,
                Err(insert_err) => {
                    warn!(
                        "Metadata insert for {} failed, rolling back the file",
                        file_name
                    );
                    return match fs::remove_file(&durable_path) {
                        Ok(()) => Err(insert_err),
                        Err(source) => {
                            error!(
                                "Rollback failed, orphaned report file at {}",
                                durable_path.display()
                            );
                            Err(Error::ReportRollback {
                                path: durable_path,
                                source,
                            })
                        }
                    };
                }
            };

        if let Err(e) = fs::remove_file(staged.path()) {
            warn!(
                "Failed to remove staged file {}: {}",
                staged.path().display(),
                e
            );
        }

        info!("Archived report {}", file_name);
        Ok(record)
    }

    /// Copy the staged file next to its destination, verify the hash,
    /// then rename into place. A partial copy can never surface under
    /// the durable name.
    fn copy_staged(
        &self,
        staged: &StagedReport,
        durable_path: &Path,
        file_name: &str,
    ) -> Result<()> {
        let promote_err = |source: io::Error| Error::ReportPromote {
            file_name: file_name.to_string(),
            source,
        };

        let temp = NamedTempFile::new_in(&self.reports_dir).map_err(promote_err)?;
        fs::copy(staged.path(), temp.path()).map_err(promote_err)?;

        let copied_hash = hash_file(temp.path()).map_err(promote_err)?;
        if copied_hash != staged.content_hash {
            return Err(promote_err(io::Error::new(
                io::ErrorKind::InvalidData,
                "copied bytes do not match the staged hash",
            )));
        }

        temp.persist(durable_path).map_err(|e| promote_err(e.error))?;
        Ok(())
    }

    /// List all archived report records, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn list(&self, storage: &Storage) -> Result<Vec<StoredReport>> {
        storage.stored_reports()
    }

    /// Read an archived report's bytes back.
    ///
    /// A hash mismatch against the record is logged as a warning; the
    /// bytes are still returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StaleReport`] when the metadata record exists
    /// but the file is gone. Callers should offer to delete the record
    /// rather than treat this as fatal.
    pub fn load(&self, record: &StoredReport) -> Result<Vec<u8>> {
        let path = self.report_path(record);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::StaleReport {
                    id: record.id,
                    file_name: record.file_name.clone(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let hash = blake3::hash(&bytes).to_hex().to_string();
        if hash != record.content_hash {
            warn!("Content hash mismatch for {}", record.file_name);
        }
        Ok(bytes)
    }

    /// Remove an archived report: the file first, then its record.
    ///
    /// A missing file is not an error here; the user's intent is that
    /// the document be gone. Any other removal failure keeps the record
    /// and propagates, so the report stays listed and the deletion can
    /// be retried. Doing the file first means a crash between the two
    /// steps leaves at worst a stale record, which `load` detects,
    /// never an unfindable file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReportDelete`] if the file exists but cannot be
    /// removed, or an error if the metadata removal fails.
    pub fn delete(&self, storage: &Storage, record: &StoredReport) -> Result<()> {
        let path = self.report_path(record);
        match fs::remove_file(&path) {
            Ok(()) => debug!("Removed report file {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("Report file {} already gone", path.display());
            }
            Err(source) => {
                warn!(
                    "Failed to remove report file {}, keeping its record",
                    path.display()
                );
                return Err(Error::ReportDelete { path, source });
            }
        }

        storage.delete_report_record(record.id)?;
        Ok(())
    }

    /// Remove a staged report without promoting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed; an
    /// already-gone file is fine.
    pub fn discard(&self, staged: StagedReport) -> Result<()> {
        match fs::remove_file(staged.path()) {
            Ok(()) => {
                debug!("Discarded staged report {}", staged.path().display());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Pick a `FlightLog_<timestamp>` name not already present in `dir`; a
/// same-second collision gets a counter suffix.
fn unique_file_name(dir: &Path, timestamp: &DateTime<Local>) -> String {
    let base = format!("{FILE_PREFIX}{}", timestamp.format(TIMESTAMP_FORMAT));
    let mut candidate = format!("{base}.{FILE_EXTENSION}");
    let mut counter = 1;
    while dir.join(&candidate).exists() {
        counter += 1;
        candidate = format!("{base}-{counter}.{FILE_EXTENSION}");
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn test_archive() -> (TempDir, ReportArchive) {
        let temp = TempDir::new().unwrap();
        let archive = ReportArchive::new(
            temp.path().join("reports"),
            temp.path().join("staging"),
        )
        .unwrap();
        (temp, archive)
    }

    fn file_storage(temp: &TempDir) -> Storage {
        Storage::open(temp.path().join("logbook.db")).unwrap()
    }

    fn durable_files(archive: &ReportArchive) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(archive.reports_dir())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_new_creates_directories() {
        let (_temp, archive) = test_archive();
        assert!(archive.reports_dir().is_dir());
        assert!(archive.staging_dir.is_dir());
    }

    #[test]
    fn test_stage_writes_temp_file() {
        let (_temp, archive) = test_archive();
        let staged = archive.stage(b"report bytes").unwrap();

        assert!(staged.path().exists());
        assert!(staged.path().starts_with(&archive.staging_dir));
        assert_eq!(fs::read(staged.path()).unwrap(), b"report bytes");
        assert_eq!(
            staged.content_hash(),
            blake3::hash(b"report bytes").to_hex().to_string()
        );
    }

    #[test]
    fn test_promote_archives_file_and_record() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);

        let staged = archive.stage(b"report bytes").unwrap();
        let staged_path = staged.path().to_path_buf();
        let record = archive.promote(&storage, &staged).unwrap();

        assert!(record.file_name.starts_with("FlightLog_"));
        assert!(record.file_name.ends_with(".pdf"));
        assert!(archive.report_path(&record).exists());
        assert!(!staged_path.exists(), "staged file should be removed");

        let listed = archive.list(&storage).unwrap();
        assert_eq!(listed, vec![record.clone()]);
        assert_eq!(archive.load(&record).unwrap(), b"report bytes");
    }

    #[test]
    fn test_promoted_names_are_unique() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);

        let first = archive
            .promote(&storage, &archive.stage(b"one").unwrap())
            .unwrap();
        let second = archive
            .promote(&storage, &archive.stage(b"two").unwrap())
            .unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert_eq!(durable_files(&archive).len(), 2);
    }

    #[test]
    fn test_unique_file_name_counter_suffix() {
        let temp = TempDir::new().unwrap();
        let timestamp = Local.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();

        let first = unique_file_name(temp.path(), &timestamp);
        assert_eq!(first, "FlightLog_2026-01-01_12-00-00.pdf");

        fs::write(temp.path().join(&first), b"x").unwrap();
        let second = unique_file_name(temp.path(), &timestamp);
        assert_eq!(second, "FlightLog_2026-01-01_12-00-00-2.pdf");

        fs::write(temp.path().join(&second), b"x").unwrap();
        let third = unique_file_name(temp.path(), &timestamp);
        assert_eq!(third, "FlightLog_2026-01-01_12-00-00-3.pdf");
    }

    #[test]
    fn test_promote_rolls_back_when_metadata_insert_fails() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);
        let staged = archive.stage(b"report bytes").unwrap();

        // Break the metadata table through a second connection.
        let saboteur = rusqlite::Connection::open(temp.path().join("logbook.db")).unwrap();
        saboteur.execute("DROP TABLE stored_reports", []).unwrap();

        let err = archive.promote(&storage, &staged).unwrap_err();
        assert!(matches!(err, Error::DatabaseQuery(_)));

        // No orphaned durable file, and the staged file survives for retry.
        assert!(durable_files(&archive).is_empty());
        assert!(staged.path().exists());

        // Restore the table; the same handle promotes cleanly.
        saboteur
            .execute(crate::store::schema::CREATE_STORED_REPORTS_TABLE, [])
            .unwrap();
        let record = archive.promote(&storage, &staged).unwrap();
        assert_eq!(archive.load(&record).unwrap(), b"report bytes");
        assert!(!staged.path().exists());
    }

    #[test]
    fn test_load_missing_file_is_stale() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);

        let record = archive
            .promote(&storage, &archive.stage(b"report bytes").unwrap())
            .unwrap();
        fs::remove_file(archive.report_path(&record)).unwrap();

        let err = archive.load(&record).unwrap_err();
        assert!(err.is_stale_report());
    }

    #[test]
    fn test_load_tolerates_hash_mismatch() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);

        let record = archive
            .promote(&storage, &archive.stage(b"original").unwrap())
            .unwrap();
        fs::write(archive.report_path(&record), b"tampered").unwrap();

        // Logged, not fatal: the caller still gets what is on disk.
        assert_eq!(archive.load(&record).unwrap(), b"tampered");
    }

    #[test]
    fn test_delete_removes_file_and_record() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);

        let record = archive
            .promote(&storage, &archive.stage(b"report bytes").unwrap())
            .unwrap();
        archive.delete(&storage, &record).unwrap();

        assert!(archive.list(&storage).unwrap().is_empty());
        assert!(!archive.report_path(&record).exists());
        assert!(archive.load(&record).unwrap_err().is_stale_report());
    }

    #[test]
    fn test_delete_with_missing_file_still_removes_record() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);

        let record = archive
            .promote(&storage, &archive.stage(b"report bytes").unwrap())
            .unwrap();
        fs::remove_file(archive.report_path(&record)).unwrap();

        archive.delete(&storage, &record).unwrap();
        assert!(archive.list(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_delete_keeps_record_when_file_removal_fails() {
        let (temp, archive) = test_archive();
        let storage = file_storage(&temp);

        let record = archive
            .promote(&storage, &archive.stage(b"report bytes").unwrap())
            .unwrap();

        // Swap the durable file for a non-empty directory so removal
        // fails with something other than NotFound.
        let path = archive.report_path(&record);
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("obstruction"), b"x").unwrap();

        let err = archive.delete(&storage, &record).unwrap_err();
        assert!(matches!(err, Error::ReportDelete { .. }));
        assert_eq!(archive.list(&storage).unwrap(), vec![record.clone()]);

        // Clearing the obstruction lets the same record delete cleanly.
        fs::remove_dir_all(&path).unwrap();
        archive.delete(&storage, &record).unwrap();
        assert!(archive.list(&storage).unwrap().is_empty());
    }

    #[test]
    fn test_discard_removes_staged_file() {
        let (_temp, archive) = test_archive();

        let staged = archive.stage(b"abandoned").unwrap();
        let path = staged.path().to_path_buf();
        archive.discard(staged).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_discard_tolerates_already_gone() {
        let (_temp, archive) = test_archive();

        let staged = archive.stage(b"abandoned").unwrap();
        fs::remove_file(staged.path()).unwrap();
        archive.discard(staged).unwrap();
    }
}
