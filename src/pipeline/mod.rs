// Indexing pipeline
// Offline path: catalog CSV -> embeddings -> hosted vector index. Safe to
// re-run: record ids are derived from row indexes, so an upsert overwrites
// the previous run. Concurrent runs against one index name are not
// supported; the caller is the single writer.


use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::embeddings::EmbeddingProvider;
use crate::ingestion::{CatalogLoader, Document};
use crate::vectordb::{UpsertRecord, VectorIndex};
use crate::{ChatbotError, Result};

const READY_POLL_INITIAL_DELAY: Duration = Duration::from_millis(500);
const READY_POLL_MAX_DELAY: Duration = Duration::from_secs(5);
const UPSERT_CHUNK_SIZE: usize = 100;

/// What a pipeline run accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexingReport {
    pub documents: usize,
    pub vectors_before: u64,
    pub vectors_after: u64,
}

pub struct IndexingPipeline {
    embedder: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    ready_timeout: Duration,
}

impl IndexingPipeline {
    #[inline]
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
        ready_timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            index,
            ready_timeout,
        }
    }

    /// Run the whole pipeline: load, ensure the index exists and is ready,
    /// embed everything, upsert everything. Any provider failure aborts the
    /// run before anything is written; a failed upsert leaves no
    /// partial-success report.
    #[inline]
    pub async fn build(&self, catalog_path: &Path) -> Result<IndexingReport> {
        info!(
            "Starting indexing pipeline for {} into '{}'",
            catalog_path.display(),
            self.index.index_name()
        );

        let documents = CatalogLoader::load(catalog_path)?;

        self.index.create_index().await?;
        self.wait_until_ready().await?;

        let stats_before = self.index.describe().await?;
        debug!("Index stats before upload: {:?}", stats_before);

        let texts: Vec<String> = documents.iter().map(|doc| doc.text.clone()).collect();

        let spinner = progress_spinner(format!("Embedding {} documents", texts.len()));
        let vectors = self.embedder.embed_documents(&texts).await?;
        spinner.finish_and_clear();

        if vectors.len() != documents.len() {
            return Err(ChatbotError::Embedding(format!(
                "Embedded {} vectors for {} documents",
                vectors.len(),
                documents.len()
            )));
        }

        let records: Vec<UpsertRecord> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, values)| record_for(doc, values))
            .collect();

        let bar = progress_bar(records.len() as u64);
        for chunk in records.chunks(UPSERT_CHUNK_SIZE) {
            self.index.upsert(chunk.to_vec()).await?;
            bar.inc(chunk.len() as u64);
        }
        bar.finish_and_clear();

        let stats_after = self.index.describe().await?;
        debug!("Index stats after upload: {:?}", stats_after);

        info!(
            "Indexing pipeline completed: {} documents into '{}'",
            documents.len(),
            self.index.index_name()
        );

        Ok(IndexingReport {
            documents: documents.len(),
            vectors_before: stats_before.vector_count,
            vectors_after: stats_after.vector_count,
        })
    }

    /// Poll the index until it reports ready, backing off exponentially up
    /// to a fixed ceiling per step and an overall deadline. Dropping the
    /// future (e.g. on shutdown) cancels the poll between steps.
    pub async fn wait_until_ready(&self) -> Result<()> {
        let deadline = Instant::now() + self.ready_timeout;
        let mut delay = READY_POLL_INITIAL_DELAY;

        loop {
            let stats = self.index.describe().await?;
            if stats.ready {
                debug!("Index '{}' is ready", self.index.index_name());
                return Ok(());
            }

            if Instant::now() + delay > deadline {
                return Err(ChatbotError::IndexNotReady(
                    self.index.index_name().to_string(),
                    self.ready_timeout,
                ));
            }

            debug!(
                "Index '{}' not ready, retrying in {:?}",
                self.index.index_name(),
                delay
            );
            sleep(delay).await;
            delay = (delay * 2).min(READY_POLL_MAX_DELAY);
        }
    }
}

fn record_for(doc: &Document, values: Vec<f32>) -> UpsertRecord {
    let id = doc
        .row()
        .map(|row| format!("row-{row}"))
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    UpsertRecord {
        id,
        values,
        text: doc.text.clone(),
        metadata: doc.metadata.clone(),
    }
}

fn progress_spinner(message: String) -> ProgressBar {
    if console::user_attended_stderr() {
        ProgressBar::new_spinner()
            .with_style(ProgressStyle::with_template("{spinner} {msg}").expect("style template is valid"))
            .with_message(message)
    } else {
        ProgressBar::hidden()
    }
}

fn progress_bar(len: u64) -> ProgressBar {
    if console::user_attended_stderr() {
        ProgressBar::new(len).with_style(
            ProgressStyle::with_template("{bar:30} [{pos}/{len}] Upserting vectors")
                .expect("style template is valid"),
        )
    } else {
        ProgressBar::hidden()
    }
}
