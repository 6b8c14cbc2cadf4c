//! Cached GET orchestration
//!
//! Connectivity is checked on every call:
//! - offline: answer from the cache (or nothing) without touching the network
//! - online: fetch, refresh the cache with the response, return it
//!
//! A failed fetch leaves the cache untouched and propagates the error.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::client::{decode, ApiClient, Method, Params, RequestDescriptor};
use super::connectivity::{Connectivity, NetworkState};
use super::error::ApiError;
use crate::cache::CacheStore;

/// How a request maps to a cache key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheKeyPolicy {
    /// URL plus encoded query string; distinct parameterizations never share
    /// an entry
    #[default]
    FullRequest,
    /// URL without the query string. Different parameters for the same
    /// endpoint overwrite each other's entry.
    UrlOnly,
}

impl CacheKeyPolicy {
    pub fn key_for(self, request: &RequestDescriptor) -> Result<String, ApiError> {
        match self {
            CacheKeyPolicy::FullRequest => Ok(request.full_url()?.to_string()),
            CacheKeyPolicy::UrlOnly => Ok(request.url.clone()),
        }
    }
}

/// API client that keeps the last good GET response for offline use
#[derive(Debug, Clone)]
pub struct CachedClient {
    inner: ApiClient,
    cache: Arc<CacheStore>,
    connectivity: Arc<dyn Connectivity>,
    key_policy: CacheKeyPolicy,
}

impl CachedClient {
    pub fn new(inner: ApiClient, cache: Arc<CacheStore>, connectivity: Arc<dyn Connectivity>) -> Self {
        Self {
            inner,
            cache,
            connectivity,
            key_policy: CacheKeyPolicy::default(),
        }
    }

    pub fn with_key_policy(mut self, key_policy: CacheKeyPolicy) -> Self {
        self.key_policy = key_policy;
        self
    }

    /// The uncached client underneath
    pub fn inner(&self) -> &ApiClient {
        &self.inner
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn key_policy(&self) -> CacheKeyPolicy {
        self.key_policy
    }

    /// Current network state as reported by the connectivity capability
    pub async fn network_state(&self) -> NetworkState {
        self.connectivity.fetch().await
    }

    /// When the cached response for `request` was stored, if one is fresh
    pub fn cached_at(&self, request: &RequestDescriptor) -> Option<DateTime<Utc>> {
        let key = self.key_policy.key_for(request).ok()?;
        self.cache.get_entry(&key).map(|entry| entry.stored_at)
    }

    /// GET `url` with `params`, falling back to the cache while offline
    ///
    /// # Returns
    /// * `Ok(Some(json))` - fresh response (online) or cached response (offline)
    /// * `Ok(None)` - offline and nothing fresh is cached
    /// * `Err(ApiError)` - online and the request failed
    pub async fn get(&self, url: &str, params: Params) -> Result<Option<Value>, ApiError> {
        let request = RequestDescriptor::get(url).with_data(Value::Object(params));
        self.fetch(&request).await
    }

    /// Like [`get`](Self::get), decoding the document into `T`
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, ApiError> {
        let state = self.network_state().await;
        self.get_json_in(url, state).await
    }

    /// Like [`get_json`](Self::get_json) for an already known network state
    pub async fn get_json_in<T: DeserializeOwned>(
        &self,
        url: &str,
        state: NetworkState,
    ) -> Result<Option<T>, ApiError> {
        match self.fetch_in(&RequestDescriptor::get(url), state).await? {
            Some(value) => decode(value).map(Some),
            None => Ok(None),
        }
    }

    /// Runs `request` through the cache policy. Only GET requests are cached;
    /// anything else is sent straight through.
    pub async fn fetch(&self, request: &RequestDescriptor) -> Result<Option<Value>, ApiError> {
        if request.method != Method::Get {
            return self.inner.send(request).await;
        }
        let state = self.network_state().await;
        self.fetch_in(request, state).await
    }

    /// Like [`fetch`](Self::fetch), trusting `state` instead of asking the
    /// connectivity capability
    pub async fn fetch_in(
        &self,
        request: &RequestDescriptor,
        state: NetworkState,
    ) -> Result<Option<Value>, ApiError> {
        if request.method != Method::Get {
            return self.inner.send(request).await;
        }

        let key = self.key_policy.key_for(request)?;

        if !state.is_connected {
            info!(key = %key, "Offline, loading from cache");
            let cached = self.cache.get(&key);
            if cached.is_none() {
                debug!(key = %key, "Nothing cached");
            }
            return Ok(cached);
        }

        // Always read the body so the cache can be refreshed
        let value = self
            .inner
            .send(&request.clone().returns_data(true))
            .await?
            .unwrap_or(Value::Null);

        info!(key = %key, "Updating cache");
        if let Err(e) = self.cache.set(&key, &value) {
            warn!(key = %key, error = %e, "Failed to update cache");
        }

        Ok(request.returns_data.then_some(value))
    }
}
