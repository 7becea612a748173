// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP catalog adapter

use super::{CatalogAdapter, CatalogError};
use async_trait::async_trait;
use rl_core::CollectionId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct ExistsRequest<'a> {
    collection_ids: &'a [CollectionId],
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: Vec<bool>,
}

/// Catalog reached over HTTP.
///
/// POSTs `{"collection_ids": [...]}` to the configured URL and expects
/// `{"exists": [...]}` back, one boolean per id.
#[derive(Clone)]
pub struct HttpCatalogAdapter {
    url: String,
    agent: ureq::Agent,
}

impl HttpCatalogAdapter {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            url: url.into(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn check_blocking(&self, ids: &[CollectionId]) -> Result<Vec<bool>, CatalogError> {
        let body = serde_json::to_string(&ExistsRequest {
            collection_ids: ids,
        })
        .map_err(|e| CatalogError::Request(e.to_string()))?;

        let mut response = self
            .agent
            .post(&self.url)
            .header("content-type", "application/json")
            .send(body.as_str())
            .map_err(|e| CatalogError::Request(format!("POST {}: {}", self.url, e)))?;

        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| CatalogError::InvalidResponse(format!("failed to read body: {}", e)))?;

        parse_answers(&text, ids.len())
    }
}

/// Decode a catalog reply, insisting on one answer per id
fn parse_answers(text: &str, asked: usize) -> Result<Vec<bool>, CatalogError> {
    let reply: ExistsResponse =
        serde_json::from_str(text).map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;
    if reply.exists.len() != asked {
        return Err(CatalogError::InvalidResponse(format!(
            "asked about {} collections, got {} answers",
            asked,
            reply.exists.len()
        )));
    }
    Ok(reply.exists)
}

#[async_trait]
impl CatalogAdapter for HttpCatalogAdapter {
    async fn check_collections_exist(
        &self,
        ids: &[CollectionId],
    ) -> Result<Vec<bool>, CatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let adapter = self.clone();
        let ids = ids.to_vec();
        tokio::task::spawn_blocking(move || adapter.check_blocking(&ids))
            .await
            .map_err(|e| CatalogError::Request(format!("catalog task failed: {}", e)))?
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
