//! HTTP access to the HR API
//!
//! `ApiClient` issues single JSON requests and normalizes failures into
//! [`ApiError`]. `CachedClient` layers the offline cache on top, choosing
//! between network and cache from the current [`NetworkState`].

mod cached;
mod client;
mod connectivity;
mod error;

pub use cached::{CacheKeyPolicy, CachedClient};
pub(crate) use client::decode;
pub use client::{ApiClient, Method, Params, RequestDescriptor};
pub use connectivity::{Connectivity, FixedConnectivity, NetworkState, TcpProbe};
pub use error::ApiError;
