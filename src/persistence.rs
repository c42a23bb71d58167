// Persistence - whole-document load/save of a record collection
//
// Every export rewrites the file in full, every import reads it in full.
// A failed import hands nothing back, so the caller's in-memory collection
// is only replaced when the new data decoded cleanly.
//
// File layout: `<data_dir>/<app_name>.<extension>`, one file per format.

use crate::config::AppConfig;
use crate::entities::Expense;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Boxed decoder/encoder error from whichever format is in use
pub type FormatError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying storage could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// File exists but is not a valid document of the expected shape
    #[error("Malformed {format} document {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: FormatError,
    },

    /// Records could not be encoded; nothing was written
    #[error("Cannot encode {format} document for {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        format: &'static str,
        #[source]
        source: FormatError,
    },
}

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Outcome of a successful import
#[derive(Debug, Clone, PartialEq)]
pub enum Import<T> {
    /// File held a valid document (possibly an empty one)
    Loaded(Vec<T>),

    /// No file, or a file with no content: nothing stored yet
    EmptyOrMissing,
}

impl<T> Import<T> {
    /// Loaded records, or an empty collection when there was nothing to load
    pub fn into_records(self) -> Vec<T> {
        match self {
            Import::Loaded(records) => records,
            Import::EmptyOrMissing => Vec::new(),
        }
    }
}

// ============================================================================
// FORMAT ADAPTERS
// ============================================================================

/// Encoder/decoder for one file format, keyed by its extension
pub trait FormatAdapter<T> {
    /// Format token, also the file extension (`"json"`, `"csv"`)
    fn extension(&self) -> &'static str;

    fn encode(&self, records: &[T]) -> std::result::Result<Vec<u8>, FormatError>;

    fn decode(&self, bytes: &[u8]) -> std::result::Result<Vec<T>, FormatError>;
}

/// JSON array of objects at the document root, no envelope
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl<T> FormatAdapter<T> for JsonFormat
where
    T: Serialize + DeserializeOwned,
{
    fn extension(&self) -> &'static str {
        "json"
    }

    fn encode(&self, records: &[T]) -> std::result::Result<Vec<u8>, FormatError> {
        Ok(serde_json::to_vec_pretty(records)?)
    }

    fn decode(&self, bytes: &[u8]) -> std::result::Result<Vec<T>, FormatError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Column order of the CSV export; names match the JSON field names
pub const EXPENSE_CSV_HEADER: [&str; 5] = ["id", "description", "amount", "date", "billingMonth"];

/// CSV with a header row. The header is always written, so an empty
/// collection still round-trips as "loaded, zero rows".
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormat;

impl FormatAdapter<Expense> for CsvFormat {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn encode(&self, records: &[Expense]) -> std::result::Result<Vec<u8>, FormatError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        wtr.write_record(EXPENSE_CSV_HEADER)?;
        for record in records {
            wtr.serialize(record)?;
        }

        Ok(wtr.into_inner().map_err(|e| e.error().to_string())?)
    }

    fn decode(&self, bytes: &[u8]) -> std::result::Result<Vec<Expense>, FormatError> {
        let mut rdr = csv::Reader::from_reader(bytes);

        let mut records = Vec::new();
        for result in rdr.deserialize() {
            let record: Expense = result?;
            records.push(record);
        }

        Ok(records)
    }
}

// ============================================================================
// PERSISTENCE ADAPTER
// ============================================================================

/// Loads and saves whole collections under the configured app name.
///
/// Holds no records itself: export borrows a snapshot, import returns a
/// freshly owned one.
#[derive(Debug, Clone)]
pub struct PersistenceAdapter {
    config: AppConfig,
}

impl PersistenceAdapter {
    pub fn new(config: AppConfig) -> Self {
        PersistenceAdapter { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Where a given format is stored
    pub fn path_for(&self, extension: &str) -> PathBuf {
        self.config.file_path(extension)
    }

    /// Write `records` to `<app_name>.<ext>`, returning the path written
    pub fn export<T, F>(&self, format: &F, records: &[T]) -> Result<PathBuf>
    where
        F: FormatAdapter<T>,
    {
        let path = self.path_for(format.extension());
        export_to(format, records, &path)?;
        Ok(path)
    }

    /// Read `<app_name>.<ext>`
    pub fn import<T, F>(&self, format: &F) -> Result<Import<T>>
    where
        F: FormatAdapter<T>,
    {
        import_from(format, &self.path_for(format.extension()))
    }

    pub fn export_json(&self, expenses: &[Expense]) -> Result<PathBuf> {
        self.export(&JsonFormat, expenses)
    }

    pub fn import_json(&self) -> Result<Import<Expense>> {
        self.import(&JsonFormat)
    }

    pub fn export_csv(&self, expenses: &[Expense]) -> Result<PathBuf> {
        self.export(&CsvFormat, expenses)
    }

    pub fn import_csv(&self) -> Result<Import<Expense>> {
        self.import(&CsvFormat)
    }
}

/// Serialize `records` and overwrite `destination` in full.
///
/// Bytes go to a sibling `.tmp` file first and are renamed over the
/// destination, so a failed write leaves the previous file intact.
pub fn export_to<T, F>(format: &F, records: &[T], destination: &Path) -> Result<()>
where
    F: FormatAdapter<T>,
{
    let io_err = |source: io::Error| PersistenceError::Io {
        path: destination.to_path_buf(),
        source,
    };

    let bytes = format
        .encode(records)
        .map_err(|e| PersistenceError::Encode {
            path: destination.to_path_buf(),
            format: format.extension(),
            source: e,
        })?;

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let tmp = temp_path(destination);
    if let Err(e) = fs::write(&tmp, &bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(e));
    }
    if let Err(e) = fs::rename(&tmp, destination) {
        let _ = fs::remove_file(&tmp);
        return Err(io_err(e));
    }

    info!(
        "Exported {} records to {} ({} bytes)",
        records.len(),
        destination.display(),
        bytes.len()
    );
    Ok(())
}

/// Read and decode `source` in full.
///
/// Missing or blank file is `EmptyOrMissing`, not an error.
pub fn import_from<T, F>(format: &F, source: &Path) -> Result<Import<T>>
where
    F: FormatAdapter<T>,
{
    let bytes = match fs::read(source) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("No data file at {}", source.display());
            return Ok(Import::EmptyOrMissing);
        }
        Err(e) => {
            return Err(PersistenceError::Io {
                path: source.to_path_buf(),
                source: e,
            })
        }
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        debug!("Data file {} is empty", source.display());
        return Ok(Import::EmptyOrMissing);
    }

    let records = format
        .decode(&bytes)
        .map_err(|e| PersistenceError::Malformed {
            path: source.to_path_buf(),
            format: format.extension(),
            source: e,
        })?;

    info!("Imported {} records from {}", records.len(), source.display());
    Ok(Import::Loaded(records))
}

fn temp_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

// ============================================================================
// TESTS
// ============================================================================
