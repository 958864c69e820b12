// Catalog ingestion
// Reads the cleaned product catalog CSV into normalized text documents,
// one per data row, ready for embedding and upsert.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::path::Path;

use itertools::Itertools;
use tracing::{debug, info, warn};

use crate::{ChatbotError, Result};

/// Normalized text + metadata unit produced from one catalog row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub text: String,
    pub metadata: BTreeMap<String, String>,
}

impl Document {
    /// Metadata row index, when present.
    #[inline]
    pub fn row(&self) -> Option<usize> {
        self.metadata.get("row").and_then(|r| r.parse().ok())
    }
}

/// Loader for the delimited product catalog.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load every data row of a comma-separated, double-quoted, UTF-8 catalog
    /// file into documents. The header row is required; each document's text
    /// is a `header: value` rendering of its row and the metadata carries the
    /// source path and the 0-based data-row index.
    ///
    /// Rows that fail to parse are skipped with a warning; the load only
    /// fails when the file is unreadable, has no header, or yields no
    /// documents at all.
    #[inline]
    pub fn load(path: &Path) -> Result<Vec<Document>> {
        info!("Loading catalog from {}", path.display());

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .quote(b'"')
            .flexible(false)
            .from_path(path)
            .map_err(|e| {
                ChatbotError::Ingestion(format!(
                    "Failed to open catalog {}: {}",
                    path.display(),
                    e
                ))
            })?;

        let headers = reader
            .headers()
            .map_err(|e| {
                ChatbotError::Ingestion(format!(
                    "Failed to read header row of {}: {}",
                    path.display(),
                    e
                ))
            })?
            .clone();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(ChatbotError::Ingestion(format!(
                "Catalog {} is empty or has no header row",
                path.display()
            )));
        }

        let source = path.display().to_string();
        let mut documents = Vec::new();

        for (row_index, record) in reader.records().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unparsable row {}: {}", row_index, e);
                    continue;
                }
            };

            let text = headers
                .iter()
                .zip(record.iter())
                .map(|(header, value)| format!("{}: {}", header.trim(), value.trim()))
                .join("\n");

            let mut metadata = BTreeMap::new();
            metadata.insert("source".to_string(), source.clone());
            metadata.insert("row".to_string(), row_index.to_string());

            documents.push(Document { text, metadata });
        }

        if documents.is_empty() {
            return Err(ChatbotError::Ingestion(format!(
                "No rows parsed from catalog {}",
                path.display()
            )));
        }

        debug!("Sample document: {:?}", documents.first());
        info!("Successfully loaded {} documents", documents.len());
        Ok(documents)
    }
}
