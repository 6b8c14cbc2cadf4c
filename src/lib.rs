//! ROI HR client library
//!
//! HTTP access to the ROI HR management API with a TTL response cache that
//! keeps reads working while the network is down.

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod display;
