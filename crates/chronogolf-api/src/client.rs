//! Request executor
//!
//! Sends one logical request to the partner API with a bearer token
//! attached. A 401 clears the rejected token and the request is sent once
//! more with a fresh one; every other failure is returned to the caller.

use std::sync::Arc;
use std::time::Duration;

use chronogolf_auth::{Authenticator, DEFAULT_TIMEOUT};
use reqwest::Method;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};

/// Attempts per logical request: the first send plus one re-authenticated retry.
pub const MAX_AUTH_ATTEMPTS: u32 = 2;

/// One API call: method, path relative to the base URL, optional JSON body
/// and optional query parameters.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    body: Option<Value>,
    query: Option<Vec<(String, String)>>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body. Only POST and PUT send it.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach query parameters. An empty list leaves the query unset.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = if query.is_empty() { None } else { Some(query) };
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn query(&self) -> Option<&[(String, String)]> {
        self.query.as_deref()
    }

    fn sends_body(&self) -> bool {
        self.method == Method::POST || self.method == Method::PUT
    }
}

/// Flatten a serializable parameter struct into query pairs.
///
/// `None` fields are skipped; strings are passed unquoted. Pairs are sorted
/// by key so the query string is stable.
pub fn query_pairs<T: Serialize>(params: &T) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(params)
        .map_err(|e| Error::Validation(format!("invalid query parameters: {e}")))?;
    let Value::Object(map) = value else {
        return Err(Error::Validation(
            "query parameters must serialize to an object".into(),
        ));
    };
    let mut pairs: Vec<(String, String)> = map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect();
    pairs.sort();
    Ok(pairs)
}

/// Partner API client. Holds the shared `Authenticator`; no other state.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    auth: Arc<Authenticator>,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, auth: Arc<Authenticator>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
            auth,
        }
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute `request` and return the decoded JSON body.
    ///
    /// Bounded to `MAX_AUTH_ATTEMPTS`: a 401 on the first attempt clears the
    /// token and retries; a 401 on the second attempt is returned.
    #[instrument(skip_all, fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, request: RequestDescriptor) -> Result<Value> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let token = self.auth.get_token().await?;

            match self.send(&request, &token).await {
                Err(e) if e.is_unauthorized() && attempt < MAX_AUTH_ATTEMPTS => {
                    warn!(attempt, "access token rejected, re-authenticating");
                    self.auth.invalidate(&token).await;
                }
                result => return result,
            }
        }
    }

    async fn send(&self, request: &RequestDescriptor, token: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, request.path);

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .timeout(self.timeout)
            .bearer_auth(token)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");

        if let Some(query) = &request.query {
            builder = builder.query(query);
        }
        if request.sends_body() {
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }
        }

        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "request failed before a response was received");
            Error::transport(&e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::transport(&e))?;
        debug!(status = status.as_u16(), bytes = body.len(), "response received");

        if !status.is_success() {
            return Err(Error::from_status(status.as_u16(), &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| Error::decode(status.as_u16(), e))
    }
}
