// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! PostgREST client for the hosted `financial_transactions` table.

use anyhow::Result;
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::config::RemoteConfig;
use crate::errors::{StoreError, StoreResult};
use crate::models::{Transaction, TransactionDraft, TransactionFilters, TransactionPatch};
use crate::store::TransactionStore;
use crate::utils::http_client;

const TABLE: &str = "financial_transactions";

const EMBED: &str = "*,patient:patients(id,full_name),appointment:appointments(id,date,time,type),attachments:transaction_attachments(id,name,url)";

pub struct RestStore {
    http: Client,
    base: String,
    api_key: String,
    access_token: Option<String>,
    professional_id: Option<String>,
}

#[derive(Serialize)]
struct InsertRow<'a> {
    #[serde(flatten)]
    draft: &'a TransactionDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    professional_id: Option<&'a str>,
}

#[derive(Deserialize)]
struct ApiError {
    message: Option<String>,
    details: Option<String>,
    hint: Option<String>,
}

impl RestStore {
    pub fn new(cfg: &RemoteConfig, professional_id: Option<String>) -> Result<Self> {
        Ok(RestStore {
            http: http_client()?,
            base: cfg.url.trim_end_matches('/').to_string(),
            api_key: cfg.api_key.clone(),
            access_token: cfg.access_token.clone(),
            professional_id,
        })
    }

    fn url(&self) -> String {
        format!("{}/rest/v1/{}", self.base, TABLE)
    }

    fn authed(&self, rb: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.api_key);
        rb.header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .header("Accept", "application/json")
    }

    fn send(&self, rb: RequestBuilder) -> StoreResult<Response> {
        let resp = self.authed(rb).send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().unwrap_or_default();
        Err(classify_failure(status, &body))
    }

    fn single(&self, resp: Response, id: &str) -> StoreResult<Transaction> {
        let mut rows: Vec<Transaction> = resp.json()?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(rows.swap_remove(0))
    }
}

/// PostgREST query parameters for a filtered, embedded, newest-first select.
pub fn fetch_query(filters: &TransactionFilters) -> Vec<(String, String)> {
    let mut q = vec![("select".to_string(), EMBED.to_string())];
    if let Some(start) = filters.start_date {
        q.push(("date".into(), format!("gte.{}", start)));
    }
    if let Some(end) = filters.end_date {
        q.push(("date".into(), format!("lte.{}", end)));
    }
    if let Some(kind) = filters.kind {
        q.push(("type".into(), format!("eq.{}", kind)));
    }
    if let Some(ref cat) = filters.category {
        q.push(("category".into(), format!("eq.{}", cat)));
    }
    if let Some(status) = filters.status {
        q.push(("status".into(), format!("eq.{}", status)));
    }
    if let Some(ref needle) = filters.search {
        let needle = needle.replace([',', '(', ')'], " ");
        q.push((
            "or".into(),
            format!(
                "(description.ilike.*{0}*,reference_number.ilike.*{0}*)",
                needle.trim()
            ),
        ));
    }
    q.push(("order".into(), "date.desc".into()));
    q
}

/// Maps a non-2xx answer onto the store taxonomy, keeping the server's
/// message verbatim for validation failures.
pub fn classify_failure(status: StatusCode, body: &str) -> StoreError {
    let message = serde_json::from_str::<ApiError>(body)
        .ok()
        .and_then(|e| {
            let mut parts: Vec<String> = Vec::new();
            parts.extend(e.message);
            parts.extend(e.details);
            parts.extend(e.hint);
            if parts.is_empty() { None } else { Some(parts.join(" ")) }
        })
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Validation(message)
        }
        StatusCode::NOT_FOUND | StatusCode::NOT_ACCEPTABLE => StoreError::NotFound(message),
        other => StoreError::Fetch(format!("HTTP {}: {}", other.as_u16(), message)),
    }
}

impl TransactionStore for RestStore {
    fn fetch(&self, filters: &TransactionFilters) -> StoreResult<Vec<Transaction>> {
        let resp = self.send(self.http.get(self.url()).query(&fetch_query(filters)))?;
        let rows: Vec<Transaction> = resp.json()?;
        tracing::debug!(rows = rows.len(), base = %self.base, "rest fetch");
        Ok(rows)
    }

    fn insert(&self, draft: &TransactionDraft) -> StoreResult<Transaction> {
        let body = [InsertRow {
            draft,
            professional_id: self.professional_id.as_deref(),
        }];
        let rb = self
            .http
            .post(self.url())
            .query(&[("select", EMBED)])
            .header("Prefer", "return=representation")
            .json(&body);
        let resp = self.send(rb)?;
        self.single(resp, "(new)")
    }

    fn update(&self, id: &str, patch: &TransactionPatch) -> StoreResult<Transaction> {
        let rb = self
            .http
            .patch(self.url())
            .query(&[("id", format!("eq.{}", id)), ("select", EMBED.to_string())])
            .header("Prefer", "return=representation")
            .json(patch);
        let resp = self.send(rb)?;
        self.single(resp, id)
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        let rb = self
            .http
            .delete(self.url())
            .query(&[("id", format!("eq.{}", id)), ("select", "id".to_string())])
            .header("Prefer", "return=representation");
        let resp = self.send(rb)?;
        let rows: Vec<serde_json::Value> = resp.json()?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
