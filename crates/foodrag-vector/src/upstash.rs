use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use foodrag_core::config::UpstashConfig;
use foodrag_core::error::{Error, Result};
use foodrag_core::traits::VectorIndex;
use foodrag_core::types::{EnrichedDocument, IndexInfo, QueryMatch, SyncMarker};

use crate::wire::{Envelope, FetchRequest, FetchedEntry, InfoResult, MarkerUpsert, QueryData, UpsertData};

const SERVICE: &str = "Upstash Vector";
pub const MARKER_ID: &str = "dataset-marker";
const MARKER_DATA: &str = "foodrag dataset marker";

/// Client for an Upstash Vector index created with a built-in embedding
/// model, so upserts and queries send raw text.
#[derive(Debug, Clone)]
pub struct UpstashIndex {
    client: Client,
    base_url: String,
    token: String,
    marker_namespace: String,
}

impl UpstashIndex {
    pub fn new(config: &UpstashConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::http(SERVICE, e))?;
        Ok(Self {
            client,
            base_url: config.rest_url.trim_end_matches('/').to_string(),
            token: config.rest_token.clone(),
            marker_namespace: config.marker_namespace.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn call<T: DeserializeOwned>(&self, op: &str, request: RequestBuilder) -> Result<T> {
        tracing::debug!(op, "upstash request");
        let response = request.bearer_auth(&self.token).send().await.map_err(|e| {
            tracing::error!("Upstash {} request failed: {}", op, e);
            Error::http(SERVICE, e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::http(SERVICE, e))?;
        if !status.is_success() {
            let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
                .ok()
                .and_then(|env| env.error)
                .unwrap_or(body);
            tracing::error!("Upstash {} error: {} - {}", op, status, message);
            return Err(Error::Api { service: SERVICE, status: status.as_u16(), message });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body)
            .map_err(|e| Error::malformed(format!("Upstash {op} response: {e}")))?;
        match (envelope.result, envelope.error) {
            (Some(result), _) => Ok(result),
            (None, Some(message)) => Err(Error::Api { service: SERVICE, status: status.as_u16(), message }),
            (None, None) => Err(Error::malformed(format!("Upstash {op} response has no result"))),
        }
    }
}

impl VectorIndex for UpstashIndex {
    async fn info(&self) -> Result<IndexInfo> {
        let info: InfoResult = self.call("info", self.client.get(self.url("info"))).await?;
        Ok(info.into())
    }

    async fn upsert(&self, docs: &[EnrichedDocument]) -> Result<()> {
        if docs.is_empty() {
            return Ok(());
        }
        let payload: Vec<UpsertData<'_>> = docs
            .iter()
            .map(|d| UpsertData { id: &d.id, data: &d.text, metadata: &d.metadata })
            .collect();
        let _: String = self.call("upsert", self.client.post(self.url("upsert-data")).json(&payload)).await?;
        Ok(())
    }

    async fn query(&self, text: &str, top_k: usize, include_metadata: bool) -> Result<Vec<QueryMatch>> {
        let body = QueryData { data: text, top_k, include_metadata };
        self.call("query", self.client.post(self.url("query-data")).json(&body)).await
    }

    async fn reset(&self) -> Result<()> {
        let _: String = self.call("reset", self.client.delete(self.url("reset"))).await?;
        Ok(())
    }

    async fn read_marker(&self) -> Result<Option<SyncMarker>> {
        let body = FetchRequest { ids: vec![MARKER_ID], include_metadata: true };
        let url = self.url(&format!("fetch/{}", self.marker_namespace));
        let entries: Vec<Option<FetchedEntry>> = self.call("fetch", self.client.post(url).json(&body)).await?;
        let Some(metadata) = entries.into_iter().flatten().next().and_then(|e| e.metadata) else {
            return Ok(None);
        };
        match serde_json::from_value::<SyncMarker>(metadata) {
            Ok(marker) => Ok(Some(marker)),
            Err(e) => {
                tracing::warn!("ignoring unreadable dataset marker: {}", e);
                Ok(None)
            }
        }
    }

    async fn write_marker(&self, marker: &SyncMarker) -> Result<()> {
        let metadata = serde_json::to_value(marker).map_err(|e| Error::Operation(e.to_string()))?;
        let payload = [MarkerUpsert { id: MARKER_ID, data: MARKER_DATA, metadata }];
        let url = self.url(&format!("upsert-data/{}", self.marker_namespace));
        let _: String = self.call("upsert marker", self.client.post(url).json(&payload)).await?;
        Ok(())
    }
}
