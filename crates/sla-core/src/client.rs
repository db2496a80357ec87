//! Notion REST client: cursor-paginated database queries and SLA select writes.

use crate::config::{ApiConfig, Config, PropertyNames};
use crate::error::{Result, SlaError};
use crate::record::{Page, Record};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

// ---------------------------------------------------------------------------
// RecordStore
// ---------------------------------------------------------------------------

/// Remote collection the synchronizer reads from and writes back to.
#[async_trait]
pub trait RecordStore {
    /// Every record in the collection, in server order.
    async fn list_all(&self, collection_id: &str) -> Result<Vec<Record>>;

    /// Set the record's SLA select to `label_name`.
    async fn update_label(&self, record_id: &str, label_name: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_cursor: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Page>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// NotionClient
// ---------------------------------------------------------------------------

pub struct NotionClient {
    http: Client,
    token: String,
    api: ApiConfig,
    properties: PropertyNames,
}

impl NotionClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            token: config.token.clone(),
            api: config.api.clone(),
            properties: config.properties.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api.base_url, path)
    }

    /// Send an authenticated request. Any non-2xx status becomes [`SlaError::Api`];
    /// a 2xx body that is not the expected JSON becomes [`SlaError::Json`].
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = req
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.api.notion_version)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(SlaError::Api {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    async fn pause(&self) {
        if !self.api.request_delay.is_zero() {
            tokio::time::sleep(self.api.request_delay).await;
        }
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn list_all(&self, collection_id: &str) -> Result<Vec<Record>> {
        let url = self.url(&format!("databases/{collection_id}/query"));
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let payload = QueryRequest {
                page_size: self.api.page_size,
                start_cursor: cursor.as_deref(),
            };
            let page: QueryResponse = self.send(self.http.post(&url).json(&payload)).await?;

            debug!(
                fetched = page.results.len(),
                total = records.len() + page.results.len(),
                has_more = page.has_more,
                "fetched page"
            );
            records.extend(
                page.results
                    .iter()
                    .map(|p| Record::from_page(p, &self.properties)),
            );

            self.pause().await;

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }

    async fn update_label(&self, record_id: &str, label_name: &str) -> Result<()> {
        let mut properties = Map::new();
        properties.insert(
            self.properties.sla.clone(),
            json!({ "select": { "name": label_name } }),
        );
        let body = json!({ "properties": properties });

        let url = self.url(&format!("pages/{record_id}"));
        let _: Value = self.send(self.http.patch(&url).json(&body)).await?;
        self.pause().await;
        Ok(())
    }
}
