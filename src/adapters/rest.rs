use crate::domain::ports::{ContentBackend, Query};
use crate::utils::error::{CmsError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// Connection to the hosted backend shared by the table, storage and auth adapters.
///
/// Requests carry the project's anon key; once a session is active its access
/// token replaces the key in the `Authorization` header.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: Url,
    api_key: String,
    access_token: Arc<RwLock<Option<String>>>,
}

impl RestClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            access_token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    pub fn set_access_token(&self, token: Option<String>) {
        if let Ok(mut current) = self.access_token.write() {
            *current = token;
        }
    }

    pub fn access_token(&self) -> Option<String> {
        self.access_token.read().ok().and_then(|token| token.clone())
    }

    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let bearer = self.access_token().unwrap_or_else(|| self.api_key.clone());
        self.request_with_token(method, url, &bearer)
    }

    pub fn request_with_token(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(token)
    }

    /// Passes successful responses through and turns everything else into a `BackendError`.
    pub async fn check(response: Response, operation: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| {
                ["message", "error_description", "msg", "error"]
                    .iter()
                    .find_map(|key| json.get(*key).and_then(Value::as_str).map(str::to_string))
            })
            .unwrap_or(body);

        Err(CmsError::BackendError {
            operation: operation.to_string(),
            status: status.as_u16(),
            message,
        })
    }
}

fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for (column, value) in &query.filters {
        params.push((column.clone(), format!("eq.{}", value)));
    }
    if let Some((column, ascending)) = &query.order {
        let direction = if *ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", column, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

fn first_row(rows: Value, fallback: Value) -> Value {
    match rows {
        Value::Array(mut rows) if !rows.is_empty() => rows.swap_remove(0),
        Value::Object(_) => rows,
        _ => fallback,
    }
}

/// Table operations over the PostgREST-style `/rest/v1` API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    http: RestClient,
}

impl RestBackend {
    pub fn new(http: RestClient) -> Self {
        Self { http }
    }

    fn table_url(&self, table: &str) -> Result<Url> {
        self.http.endpoint(&format!("rest/v1/{}", table))
    }
}

#[async_trait]
impl ContentBackend for RestBackend {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>> {
        let url = self.table_url(table)?;
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .http
            .request(Method::GET, url)
            .query(&query_params(query))
            .send()
            .await?;
        let response = RestClient::check(response, &format!("select {}", table)).await?;

        match response.json::<Value>().await? {
            Value::Array(rows) => Ok(rows),
            other => Ok(vec![other]),
        }
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value> {
        let url = self.table_url(table)?;
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;
        let response = RestClient::check(response, &format!("insert {}", table)).await?;

        Ok(first_row(response.json().await?, row))
    }

    async fn update(&self, table: &str, id: &str, patch: Value) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("PATCH {} id={}", url, id);

        let response = self
            .http
            .request(Method::PATCH, url)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()
            .await?;
        let response = RestClient::check(response, &format!("update {}", table)).await?;

        // An empty representation means no row matched (deleted or hidden by policy).
        match response.json::<Value>().await? {
            Value::Array(rows) if rows.is_empty() => Err(CmsError::NotFound {
                table: table.to_string(),
                id: id.to_string(),
            }),
            _ => Ok(()),
        }
    }

    async fn delete(&self, table: &str, id: &str) -> Result<()> {
        let url = self.table_url(table)?;
        tracing::debug!("DELETE {} id={}", url, id);

        let response = self
            .http
            .request(Method::DELETE, url)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        RestClient::check(response, &format!("delete {}", table)).await?;
        Ok(())
    }

    async fn upsert(&self, table: &str, row: Value) -> Result<Value> {
        let url = self.table_url(table)?;
        tracing::debug!("POST (upsert) {}", url);

        let response = self
            .http
            .request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&row)
            .send()
            .await?;
        let response = RestClient::check(response, &format!("upsert {}", table)).await?;

        Ok(first_row(response.json().await?, row))
    }
}
