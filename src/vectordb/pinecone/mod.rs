
use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{Config, IndexConfig};
use crate::net::{HttpError, RetryingAgent};
use crate::vectordb::{IndexStats, ScoredDocument, UpsertRecord, VectorIndex};
use crate::{ChatbotError, Result};

const UPSERT_BATCH_SIZE: usize = 100;
const TEXT_METADATA_KEY: &str = "text";

/// Client for a Pinecone serverless index. The control plane
/// (`api.pinecone.io`) creates and describes indexes; each index exposes its
/// own data-plane host for upserts and queries, discovered from the control
/// plane and cached after the first lookup.
pub struct PineconeClient {
    control_url: Url,
    index: IndexConfig,
    dimension: usize,
    api_key: String,
    agent: RetryingAgent,
    data_host: Mutex<Option<Url>>,
}

#[derive(Debug, Serialize)]
struct CreateIndexRequest<'a> {
    name: &'a str,
    dimension: usize,
    metric: &'a str,
    spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct IndexSpec<'a> {
    serverless: ServerlessSpec<'a>,
}

#[derive(Debug, Serialize)]
struct ServerlessSpec<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Debug, Deserialize)]
struct DescribeIndexResponse {
    dimension: usize,
    host: String,
    status: IndexStatus,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    ready: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IndexStatsResponse {
    #[serde(default)]
    total_vector_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Debug, Deserialize)]
struct QueryMatch {
    score: f32,
    #[serde(default)]
    metadata: serde_json::Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: serde_json::Map<String, Value>,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
}

impl PineconeClient {
    #[inline]
    pub fn new(config: &Config, api_key: &str) -> Result<Self> {
        let control_url = config.index_control_url()?;
        Ok(Self::from_parts(
            control_url,
            config.index.clone(),
            config.embedding.dimension as usize,
            api_key,
        ))
    }

    #[inline]
    pub fn from_parts(
        control_url: Url,
        index: IndexConfig,
        dimension: usize,
        api_key: &str,
    ) -> Self {
        Self {
            control_url,
            index,
            dimension,
            api_key: api_key.to_string(),
            agent: RetryingAgent::default(),
            data_host: Mutex::new(None),
        }
    }

    #[inline]
    pub fn with_agent(mut self, agent: RetryingAgent) -> Self {
        self.agent = agent;
        self
    }

    fn headers(&self) -> [(&str, &str); 1] {
        [("Api-Key", self.api_key.as_str())]
    }

    fn control_path(&self, path: &str) -> Result<Url> {
        self.control_url
            .join(path)
            .map_err(|e| ChatbotError::VectorDb(format!("Failed to build control URL: {e}")))
    }

    fn describe_raw(&self) -> Result<DescribeIndexResponse> {
        let url = self.control_path(&format!("/indexes/{}", self.index.name))?;
        let response_text = self.agent.get_json(&url, &self.headers()).map_err(|e| {
            ChatbotError::VectorDb(format!(
                "Failed to describe index '{}': {e}",
                self.index.name
            ))
        })?;

        serde_json::from_str(&response_text).map_err(|e| {
            ChatbotError::VectorDb(format!("Failed to parse describe response: {e}"))
        })
    }

    /// Data-plane host of the index, resolved via the control plane once and
    /// cached. Hosts are returned without a scheme; https is assumed.
    fn data_url(&self, path: &str) -> Result<Url> {
        {
            let cached = self
                .data_host
                .lock()
                .expect("data host lock is never poisoned");
            if let Some(host) = cached.as_ref() {
                return host.join(path).map_err(|e| {
                    ChatbotError::VectorDb(format!("Failed to build data URL: {e}"))
                });
            }
        }

        let described = self.describe_raw()?;
        let raw_host = if described.host.starts_with("http://")
            || described.host.starts_with("https://")
        {
            described.host
        } else {
            format!("https://{}", described.host)
        };
        let host = Url::parse(&raw_host).map_err(|e| {
            ChatbotError::VectorDb(format!("Invalid data-plane host '{raw_host}': {e}"))
        })?;

        debug!("Resolved data-plane host {} for '{}'", host, self.index.name);
        let mut cached = self
            .data_host
            .lock()
            .expect("data host lock is never poisoned");
        *cached = Some(host.clone());

        host.join(path)
            .map_err(|e| ChatbotError::VectorDb(format!("Failed to build data URL: {e}")))
    }

    fn vector_count(&self) -> Result<u64> {
        let url = self.data_url("/describe_index_stats")?;
        let response_text = self
            .agent
            .post_json(&url, &self.headers(), "{}")
            .map_err(|e| {
                ChatbotError::VectorDb(format!(
                    "Failed to fetch stats for index '{}': {e}",
                    self.index.name
                ))
            })?;

        let stats: IndexStatsResponse = serde_json::from_str(&response_text)
            .map_err(|e| ChatbotError::VectorDb(format!("Failed to parse index stats: {e}")))?;
        Ok(stats.total_vector_count)
    }

    fn upsert_batch(&self, records: &[UpsertRecord]) -> Result<()> {
        let url = self.data_url("/vectors/upsert")?;

        let vectors: Vec<UpsertVector<'_>> = records
            .iter()
            .map(|record| {
                let mut metadata = serde_json::Map::new();
                metadata.insert(
                    TEXT_METADATA_KEY.to_string(),
                    Value::String(record.text.clone()),
                );
                for (key, value) in &record.metadata {
                    metadata.insert(key.clone(), Value::String(value.clone()));
                }
                UpsertVector {
                    id: &record.id,
                    values: &record.values,
                    metadata,
                }
            })
            .collect();

        let request_json = serde_json::to_string(&UpsertRequest { vectors }).map_err(|e| {
            ChatbotError::Upsert(format!("Failed to serialize upsert request: {e}"))
        })?;

        self.agent
            .post_json(&url, &self.headers(), &request_json)
            .map_err(|e| {
                ChatbotError::Upsert(format!(
                    "Upsert of {} records into '{}' failed: {e}",
                    records.len(),
                    self.index.name
                ))
            })?;

        Ok(())
    }
}

#[async_trait]
impl VectorIndex for PineconeClient {
    async fn create_index(&self) -> Result<()> {
        let url = self.control_path("/indexes")?;
        let request = CreateIndexRequest {
            name: &self.index.name,
            dimension: self.dimension,
            metric: &self.index.metric,
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: &self.index.cloud,
                    region: &self.index.region,
                },
            },
        };
        let request_json = serde_json::to_string(&request).map_err(|e| {
            ChatbotError::VectorDb(format!("Failed to serialize create request: {e}"))
        })?;

        match self.agent.post_json(&url, &self.headers(), &request_json) {
            Ok(_) => {
                info!(
                    "Created index '{}' (dimension {}, metric {})",
                    self.index.name, self.dimension, self.index.metric
                );
                Ok(())
            }
            // 409 Conflict: the index already exists with this name.
            Err(HttpError::Status { status: 409, .. }) => {
                debug!("Index '{}' already exists", self.index.name);
                Ok(())
            }
            Err(e) => Err(ChatbotError::VectorDb(format!(
                "Failed to create index '{}': {e}",
                self.index.name
            ))),
        }
    }

    async fn describe(&self) -> Result<IndexStats> {
        let described = self.describe_raw()?;
        let ready = described.status.ready;

        let vector_count = if ready {
            match self.vector_count() {
                Ok(count) => count,
                Err(e) => {
                    warn!("Could not fetch vector count: {e}");
                    0
                }
            }
        } else {
            0
        };

        Ok(IndexStats {
            ready,
            dimension: described.dimension,
            vector_count,
        })
    }

    async fn upsert(&self, records: Vec<UpsertRecord>) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        for record in &records {
            if record.values.len() != self.dimension {
                return Err(ChatbotError::Upsert(format!(
                    "Vector dimension {} of record '{}' does not match index dimension {}",
                    record.values.len(),
                    record.id,
                    self.dimension
                )));
            }
        }

        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            self.upsert_batch(batch)?;
        }

        debug!(
            "Upserted {} records into '{}'",
            records.len(),
            self.index.name
        );
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        score_threshold: f32,
    ) -> Result<Vec<ScoredDocument>> {
        let url = self.data_url("/query")?;
        let request = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
        };
        let request_json = serde_json::to_string(&request).map_err(|e| {
            ChatbotError::VectorDb(format!("Failed to serialize query request: {e}"))
        })?;

        let response_text = self
            .agent
            .post_json(&url, &self.headers(), &request_json)
            .map_err(|e| {
                ChatbotError::VectorDb(format!(
                    "Query against index '{}' failed: {e}",
                    self.index.name
                ))
            })?;

        let response: QueryResponse = serde_json::from_str(&response_text)
            .map_err(|e| ChatbotError::VectorDb(format!("Failed to parse query response: {e}")))?;

        let documents = response
            .matches
            .into_iter()
            .filter(|hit| hit.score >= score_threshold)
            .map(|hit| {
                let mut metadata = BTreeMap::new();
                let mut text = String::new();
                for (key, value) in hit.metadata {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    if key == TEXT_METADATA_KEY {
                        text = value;
                    } else {
                        metadata.insert(key, value);
                    }
                }
                ScoredDocument {
                    text,
                    metadata,
                    score: hit.score,
                }
            })
            .collect();

        Ok(documents)
    }

    fn index_name(&self) -> &str {
        &self.index.name
    }
}
