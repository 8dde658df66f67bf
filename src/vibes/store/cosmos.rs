//! # Cosmos DB Backend
//!
//! [`CosmosStore`] keeps vibes in an Azure Cosmos DB (SQL API) container, talking to
//! the account's REST endpoint with a blocking HTTP client. The local emulator is
//! the usual target, which is why TLS verification can be switched off.
//!
//! ## Session Lifecycle
//!
//! [`CosmosStore::connect`] is the only way to get a store:
//!
//! 1. `GET /dbs` proves the endpoint is reachable and the key is accepted.
//! 2. The database is created when missing (`POST /dbs`).
//! 3. The container is created when missing (`POST /dbs/{db}/colls`), partitioned
//!    by `/id`.
//!
//! Both creations send `x-ms-offer-throughput: 400` and treat `409 Conflict` as
//! "already there". The store is released when dropped.
//!
//! ## Operations
//!
//! | Operation | Request |
//! |-----------|---------|
//! | create | `POST /dbs/{db}/colls/{coll}/docs` |
//! | list | query `SELECT * FROM c WHERE c.type = @type`, cross-partition, paged |
//! | delete | `DELETE /dbs/{db}/colls/{coll}/docs/{id}` |
//!
//! Document requests carry the partition key header `["<id>"]`.
//!
//! ## Failure Mapping
//!
//! - Transport failures (refused, timeout, TLS) and `401`/`403`/`503` →
//!   [`VibesError::StoreUnavailable`]
//! - `404` on delete → [`VibesError::NotFound`]
//! - `409` on create → [`VibesError::AlreadyExists`]
//! - anything else → [`VibesError::Backend`]
//!
//! Throttled requests (`429`) are retried a few times after the server's
//! `x-ms-retry-after-ms`. Nothing else is retried.

use super::auth::{http_date, MasterKey};
use super::VibeStore;
use crate::config::VibesConfig;
use crate::error::{Result, VibesError};
use crate::model::{Vibe, VIBE_KIND};
use chrono::Utc;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

const API_VERSION: &str = "2018-12-31";
const OFFER_THROUGHPUT: &str = "400";
const PARTITION_KEY_PATH: &str = "/id";
const PARTITION_KEY_HEADER: &str = "x-ms-documentdb-partitionkey";
const CONTINUATION_HEADER: &str = "x-ms-continuation";
const RETRY_AFTER_HEADER: &str = "x-ms-retry-after-ms";
const LIST_QUERY: &str = "SELECT * FROM c WHERE c.type = @type";

const MAX_THROTTLE_RETRIES: u32 = 3;
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);
const MAX_RETRY_AFTER: Duration = Duration::from_secs(5);

/// A REST resource: what gets signed, and where the request goes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Resource {
    kind: &'static str,
    link: String,
    path: String,
}

impl Resource {
    fn databases() -> Self {
        Self {
            kind: "dbs",
            link: String::new(),
            path: "/dbs".to_string(),
        }
    }

    fn collections(db: &str) -> Self {
        let link = format!("dbs/{}", db);
        Self {
            kind: "colls",
            path: format!("/{}/colls", link),
            link,
        }
    }

    /// The document feed of a container: target of creates and queries.
    fn documents(db: &str, coll: &str) -> Self {
        let link = format!("dbs/{}/colls/{}", db, coll);
        Self {
            kind: "docs",
            path: format!("/{}/docs", link),
            link,
        }
    }

    fn document(db: &str, coll: &str, id: &Uuid) -> Self {
        let link = format!("dbs/{}/colls/{}/docs/{}", db, coll, id);
        Self {
            kind: "docs",
            path: format!("/{}", link),
            link,
        }
    }
}

/// Documents stay untyped here so one malformed record cannot sink the listing.
#[derive(Deserialize)]
struct QueryPage {
    #[serde(rename = "Documents")]
    documents: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

pub struct CosmosStore {
    client: Client,
    endpoint: String,
    key: MasterKey,
    database: String,
    container: String,
}

impl CosmosStore {
    /// Opens a session: checks reachability, then ensures database and container exist.
    pub fn connect(config: &VibesConfig) -> Result<Self> {
        let key = MasterKey::new(config.require_key()?)?;

        if config.disable_ssl_verification {
            warn!("TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .connect_timeout(config.request_timeout())
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.disable_ssl_verification)
            .build()
            .map_err(|e| VibesError::StoreUnavailable(error_chain(&e)))?;

        let store = Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key,
            database: config.database_name.clone(),
            container: config.container_name.clone(),
        };
        store.bootstrap()?;
        Ok(store)
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    fn bootstrap(&self) -> Result<()> {
        info!(endpoint = %self.endpoint, "connecting to Cosmos DB");
        let response = self.send(Method::GET, &Resource::databases(), |r| r)?;
        if !response.status().is_success() {
            return Err(error_from(response));
        }

        let created = self.create_if_absent(Resource::databases(), json!({ "id": self.database }))?;
        debug!(database = %self.database, created, "database ready");

        let created = self.create_if_absent(
            Resource::collections(&self.database),
            json!({
                "id": self.container,
                "partitionKey": { "paths": [PARTITION_KEY_PATH], "kind": "Hash" },
            }),
        )?;
        debug!(container = %self.container, created, "container ready");
        Ok(())
    }

    /// Returns whether the resource was created (false: it already existed).
    fn create_if_absent(&self, resource: Resource, body: serde_json::Value) -> Result<bool> {
        let response = self.send(Method::POST, &resource, |r| {
            r.header("x-ms-offer-throughput", OFFER_THROUGHPUT).json(&body)
        })?;
        match response.status() {
            s if s.is_success() => Ok(true),
            StatusCode::CONFLICT => Ok(false),
            _ => Err(error_from(response)),
        }
    }

    fn send<F>(&self, method: Method, resource: &Resource, decorate: F) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let url = format!("{}{}", self.endpoint, resource.path);
        let mut attempt = 0;
        loop {
            let date = http_date(Utc::now());
            let authorization =
                self.key
                    .authorization(method.as_str(), resource.kind, &resource.link, &date);
            let request = self
                .client
                .request(method.clone(), &url)
                .header("authorization", authorization)
                .header("x-ms-date", &date)
                .header("x-ms-version", API_VERSION)
                .header(ACCEPT, "application/json");

            let response = decorate(request)
                .send()
                .map_err(|e| VibesError::StoreUnavailable(error_chain(&e)))?;
            let status = response.status();
            debug!(%method, path = %resource.path, status = status.as_u16(), "cosmos request");

            if status == StatusCode::TOO_MANY_REQUESTS && attempt < MAX_THROTTLE_RETRIES {
                attempt += 1;
                let wait = retry_after(response.headers());
                warn!(
                    attempt,
                    wait_ms = wait.as_millis() as u64,
                    "request throttled, retrying"
                );
                std::thread::sleep(wait);
                continue;
            }
            return Ok(response);
        }
    }
}

impl VibeStore for CosmosStore {
    fn create(&mut self, vibe: &Vibe) -> Result<()> {
        let resource = Resource::documents(&self.database, &self.container);
        let response = self.send(Method::POST, &resource, |r| {
            r.header(PARTITION_KEY_HEADER, partition_key(&vibe.id))
                .json(vibe)
        })?;
        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(VibesError::AlreadyExists(vibe.id)),
            _ => Err(error_from(response)),
        }
    }

    fn list(&self) -> Result<Vec<Vibe>> {
        let resource = Resource::documents(&self.database, &self.container);
        let query = json!({
            "query": LIST_QUERY,
            "parameters": [{ "name": "@type", "value": VIBE_KIND }],
        })
        .to_string();

        let mut vibes = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let response = self.send(Method::POST, &resource, |r| {
                let r = r
                    .header(CONTENT_TYPE, "application/query+json")
                    .header("x-ms-documentdb-isquery", "True")
                    .header("x-ms-documentdb-query-enablecrosspartition", "True")
                    .body(query.clone());
                match &continuation {
                    Some(token) => r.header(CONTINUATION_HEADER, token.as_str()),
                    None => r,
                }
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(error_from(response));
            }
            let next = response
                .headers()
                .get(CONTINUATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            let page: QueryPage = response.json().map_err(|e| VibesError::Backend {
                status: status.as_u16(),
                message: format!("malformed query response: {}", error_chain(&e)),
            })?;
            vibes.extend(decode_documents(page.documents));

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }
        Ok(vibes)
    }

    fn delete(&mut self, id: &Uuid) -> Result<()> {
        let resource = Resource::document(&self.database, &self.container, id);
        let response = self.send(Method::DELETE, &resource, |r| {
            r.header(PARTITION_KEY_HEADER, partition_key(id))
        })?;
        match response.status() {
            s if s.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(VibesError::NotFound(*id)),
            _ => Err(error_from(response)),
        }
    }
}

impl Drop for CosmosStore {
    fn drop(&mut self) {
        debug!(endpoint = %self.endpoint, "released Cosmos DB session");
    }
}

/// Partition key header value: a JSON array holding the id.
fn partition_key(id: &Uuid) -> String {
    json!([id.to_string()]).to_string()
}

/// Keeps the documents that are well-formed vibes, logging the rest.
fn decode_documents(documents: Vec<serde_json::Value>) -> Vec<Vibe> {
    documents
        .into_iter()
        .filter_map(|doc| {
            let id = doc.get("id").and_then(|v| v.as_str()).unwrap_or("?").to_string();
            match serde_json::from_value::<Vibe>(doc) {
                Ok(vibe) => Some(vibe),
                Err(e) => {
                    warn!(id = %id, error = %e, "skipping malformed vibe document");
                    None
                }
            }
        })
        .collect()
}

fn retry_after(headers: &HeaderMap) -> Duration {
    headers
        .get(RETRY_AFTER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_RETRY_AFTER)
        .min(MAX_RETRY_AFTER)
}

fn error_from(response: Response) -> VibesError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    classify(status, &body)
}

/// Maps a failed response with no operation-specific meaning to an error.
fn classify(status: StatusCode, body: &str) -> VibesError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::SERVICE_UNAVAILABLE => {
            VibesError::StoreUnavailable(format!(
                "request rejected with status {}: {}",
                status.as_u16(),
                message
            ))
        }
        _ => VibesError::Backend {
            status: status.as_u16(),
            message,
        },
    }
}

/// reqwest hides the interesting part (refused, TLS, ...) in the source chain.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
