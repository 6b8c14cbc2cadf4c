//! Plain HTTP request layer
//!
//! One call, one request: no retry, no backoff and no transport caching.
//! Every request carries JSON `Accept`/`Content-Type` headers; failures are
//! normalized into [`ApiError`].

use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE, PRAGMA};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::error::{request_error, ApiError};

const JSON: &str = "application/json";
const JSON_UTF8: &str = "application/json; charset=utf-8";

/// Request data: query parameters for GET, JSON body for everything else
pub type Params = Map<String, Value>;

/// HTTP verbs the API uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Whether a response body is parsed unless the caller says otherwise
    pub fn returns_data_by_default(self) -> bool {
        matches!(self, Method::Get)
    }

    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// Everything needed to issue one request
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Absolute URL without the query string
    pub url: String,
    /// Query parameters (GET) or body (POST/PUT/DELETE)
    pub data: Value,
    /// Parse and return the response body
    pub returns_data: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: Value::Object(Map::new()),
            returns_data: method.returns_data_by_default(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    /// Replaces the request data
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Adds one parameter, turning non-object data into an object first
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if !self.data.is_object() {
            self.data = Value::Object(Map::new());
        }
        if let Value::Object(map) = &mut self.data {
            map.insert(key.into(), value.into());
        }
        self
    }

    pub fn returns_data(mut self, returns_data: bool) -> Self {
        self.returns_data = returns_data;
        self
    }

    /// Query pairs encoded from the request data
    ///
    /// Strings go through as-is, other scalars use their JSON text and
    /// nested values are JSON-encoded. Non-object data yields no pairs.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match &self.data {
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| {
                    let v = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), v)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// The URL actually requested: query string attached for GET
    pub fn full_url(&self) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.url)?;
        if self.method == Method::Get {
            let pairs = self.query_pairs();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }
        Ok(url)
    }
}

/// Decodes a JSON document into a typed record
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

/// HTTP client bound to one API root
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    api_root: String,
}

impl ApiClient {
    /// Creates a client with default transport settings
    pub fn new(api_root: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_root)
    }

    /// Creates a client whose requests give up after `timeout`
    pub fn with_timeout(api_root: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, api_root))
    }

    /// Creates a client around an existing reqwest client
    pub fn with_client(http: Client, api_root: impl Into<String>) -> Self {
        let api_root = api_root.into().trim_end_matches('/').to_string();
        Self { http, api_root }
    }

    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Absolute URL for a resource path under the API root
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_root, path.trim_start_matches('/'))
    }

    /// Issues exactly one request
    ///
    /// # Returns
    /// * `Ok(Some(json))` for a success response when `returns_data` is set
    /// * `Ok(None)` for a success response otherwise
    /// * `Err(ApiError::Request)` for a non-success status
    /// * `Err(ApiError::Transport)` if the request never completed
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Option<Value>, ApiError> {
        let url = request.full_url()?;
        debug!(method = %request.method, url = %url, "Sending request");

        let mut builder = self
            .http
            .request(request.method.as_reqwest(), url)
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON_UTF8)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache");

        if request.method != Method::Get {
            builder = builder.body(serde_json::to_vec(&request.data)?);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = request_error(status, &body);
            warn!(method = %request.method, url = %request.url, "{}", err);
            return Err(err);
        }

        if !request.returns_data {
            return Ok(None);
        }

        let bytes = response.bytes().await?;
        let value = serde_json::from_slice(&bytes).map_err(|e| ApiError::MalformedBody(e.to_string()))?;
        Ok(Some(value))
    }

    /// GET `url` with `params` as the query string, returning the JSON body
    pub async fn get(&self, url: &str, params: Params) -> Result<Value, ApiError> {
        let request = RequestDescriptor::get(url).with_data(Value::Object(params));
        Ok(self.send(&request).await?.unwrap_or(Value::Null))
    }

    /// POST `data` as the JSON body, discarding the response body
    pub async fn post(&self, url: &str, data: Value) -> Result<(), ApiError> {
        self.send(&RequestDescriptor::post(url).with_data(data)).await?;
        Ok(())
    }

    /// PUT `data` as the JSON body, discarding the response body
    pub async fn put(&self, url: &str, data: Value) -> Result<(), ApiError> {
        self.send(&RequestDescriptor::put(url).with_data(data)).await?;
        Ok(())
    }

    /// DELETE with `data` as the JSON body, discarding the response body
    pub async fn delete(&self, url: &str, data: Value) -> Result<(), ApiError> {
        self.send(&RequestDescriptor::delete(url).with_data(data)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_returns_data_defaults() {
        assert!(RequestDescriptor::get("https://h/x").returns_data);
        assert!(!RequestDescriptor::post("https://h/x").returns_data);
        assert!(!RequestDescriptor::put("https://h/x").returns_data);
        assert!(!RequestDescriptor::delete("https://h/x").returns_data);
        assert!(RequestDescriptor::post("https://h/x").returns_data(true).returns_data);
    }

    #[test]
    fn test_full_url_without_params_has_no_query() {
        let request = RequestDescriptor::get("https://localhost:7215/api/v1/People");
        assert_eq!(
            request.full_url().unwrap().as_str(),
            "https://localhost:7215/api/v1/People"
        );
    }

    #[test]
    fn test_full_url_encodes_get_params() {
        let request = RequestDescriptor::get("https://host/api/v1/People")
            .with_param("name", "Ada Lovelace")
            .with_param("page", 2)
            .with_param("active", true);

        let url = request.full_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://host/api/v1/People?active=true&name=Ada+Lovelace&page=2"
        );
    }

    #[test]
    fn test_full_url_ignores_data_for_mutations() {
        let request = RequestDescriptor::post("https://host/api/v1/People").with_param("name", "x");
        assert_eq!(request.full_url().unwrap().query(), None);
    }

    #[test]
    fn test_query_pairs_encode_null_and_nested_as_json() {
        let request = RequestDescriptor::get("https://h/x")
            .with_data(json!({"a": null, "b": [1, 2], "c": "plain"}));

        assert_eq!(
            request.query_pairs(),
            vec![
                ("a".to_string(), "null".to_string()),
                ("b".to_string(), "[1,2]".to_string()),
                ("c".to_string(), "plain".to_string()),
            ]
        );
    }

    #[test]
    fn test_with_param_replaces_non_object_data() {
        let request = RequestDescriptor::get("https://h/x")
            .with_data(json!(null))
            .with_param("k", "v");
        assert_eq!(request.data, json!({"k": "v"}));
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let err = RequestDescriptor::get("not a url").full_url().unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn test_endpoint_joins_root_and_path() {
        let client = ApiClient::new("https://localhost:7215/api/v1/");
        assert_eq!(client.api_root(), "https://localhost:7215/api/v1");
        assert_eq!(client.endpoint("People"), "https://localhost:7215/api/v1/People");
        assert_eq!(client.endpoint("/People/3"), "https://localhost:7215/api/v1/People/3");
    }

    #[test]
    fn test_decode_reports_malformed_body() {
        let err = decode::<Vec<u32>>(json!({"not": "a list"})).unwrap_err();
        assert!(matches!(err, ApiError::MalformedBody(_)));
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }
}
