use std::{fs::File, io::Read, path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::models::PerfumeRecord;

/// Errors raised while reading the perfume catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog at {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Source of perfume records
///
/// Implementations return rows in source order; tie-breaking in the
/// recommendation engine relies on that order being stable.
#[cfg_attr(test, mockall::automock)]
pub trait CatalogSource: Send + Sync {
    /// Loads every catalog record
    fn load(&self) -> Result<Vec<PerfumeRecord>, CatalogError>;
}

/// CSV-backed catalog that re-reads the file on every `load`
#[derive(Debug, Clone)]
pub struct CsvCatalog {
    path: PathBuf,
}

impl CsvCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for CsvCatalog {
    fn load(&self) -> Result<Vec<PerfumeRecord>, CatalogError> {
        let file = File::open(&self.path).map_err(|source| CatalogError::Open {
            path: self.path.clone(),
            source,
        })?;

        let records = read_records(file).map_err(|source| CatalogError::Parse {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %self.path.display(),
            record_count = records.len(),
            "Loaded perfume catalog"
        );

        Ok(records)
    }
}

/// Catalog read once up front and served from memory afterwards
#[derive(Debug, Clone)]
pub struct PreloadedCatalog {
    records: Arc<[PerfumeRecord]>,
}

impl PreloadedCatalog {
    /// Reads `source` once and keeps the result
    pub fn from_source(source: &dyn CatalogSource) -> Result<Self, CatalogError> {
        Ok(Self::from(source.load()?))
    }
}

impl From<Vec<PerfumeRecord>> for PreloadedCatalog {
    fn from(records: Vec<PerfumeRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }
}

impl CatalogSource for PreloadedCatalog {
    fn load(&self) -> Result<Vec<PerfumeRecord>, CatalogError> {
        Ok(self.records.to_vec())
    }
}

/// Parses CSV text with a header row into records, preserving row order
///
/// Short rows are accepted; their missing trailing columns are simply absent
/// from the record. Values beyond the header width are dropped.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<PerfumeRecord>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(headers.iter().zip(row.iter()).collect::<PerfumeRecord>());
    }

    Ok(records)
}

/// Builds the catalog source selected by configuration
pub fn open_catalog(path: &str, preload: bool) -> Result<Arc<dyn CatalogSource>, CatalogError> {
    let csv = CsvCatalog::new(path);
    if preload {
        let catalog = PreloadedCatalog::from_source(&csv)?;
        tracing::info!(path = %path, "Catalog preloaded into memory");
        Ok(Arc::new(catalog))
    } else {
        tracing::info!(path = %path, "Catalog will be read on every request");
        Ok(Arc::new(csv))
    }
}
