//! Product catalog loaded from CSV.
//!
//! DESIGN
//! ======
//! The catalog is read once at start-up and never mutated. A product's `id`
//! is its zero-based row index, so ids are stable only for a given file.
//! Columns are kept open-ended: every header becomes a JSON field. Each column
//! gets one type from all of its cells: integer if every present cell is an
//! `i64`, float if every present cell is a finite float, otherwise text.
//! Missing cells (empty or an NA marker such as `NaN`) are null in any column.

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to open catalog {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: usize,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Load the catalog from a CSV file with a header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not valid CSV.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Open { path: path.to_owned(), source })?;
        Self::from_reader(file)
    }

    /// Parse CSV with a header row from any reader.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed CSV, including rows whose field count
    /// differs from the header.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        if headers.iter().any(|h| h == "id") {
            tracing::warn!("catalog column `id` is shadowed by the row index and will be dropped");
        }

        let records = rdr.records().collect::<Result<Vec<_>, _>>()?;
        let kinds: Vec<ColumnKind> =
            (0..headers.len()).map(|col| ColumnKind::infer(records.iter().filter_map(|r| r.get(col)))).collect();

        let products = records
            .iter()
            .enumerate()
            .map(|(id, record)| {
                let fields = headers
                    .iter()
                    .zip(record.iter())
                    .zip(&kinds)
                    .filter(|((header, _), _)| *header != "id")
                    .map(|((header, cell), kind)| (header.to_owned(), kind.convert(cell)))
                    .collect();
                Product { id, fields }
            })
            .collect();

        Ok(Self { products })
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&Product> {
        self.products.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

// =============================================================================
// COLUMN TYPING
// =============================================================================

/// Cell text read as a missing value, whatever the column type.
const NA_MARKERS: &[&str] = &["NaN", "nan", "-NaN", "-nan", "NA", "N/A", "n/a", "#N/A", "<NA>", "null", "NULL"];

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_MARKERS.contains(&cell)
}

fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|f| f.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut kind = Self::Integer;
        for cell in cells.map(str::trim).filter(|c| !is_missing(c)) {
            if kind == Self::Integer && cell.parse::<i64>().is_ok() {
                continue;
            }
            if parse_finite(cell).is_none() {
                return Self::Text;
            }
            kind = Self::Float;
        }
        kind
    }

    fn convert(self, raw: &str) -> Value {
        let cell = raw.trim();
        if is_missing(cell) {
            return Value::Null;
        }
        match self {
            Self::Integer => cell.parse::<i64>().map_or(Value::Null, Value::from),
            Self::Float => parse_finite(cell).and_then(Number::from_f64).map_or(Value::Null, Value::Number),
            Self::Text => Value::String(raw.to_owned()),
        }
    }
}
