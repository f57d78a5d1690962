//! HTTP/1.1 client for embedded systems.
//!
//! This module provides a lightweight, streaming HTTP client designed for
//! `no_std` environments. Response bodies are never buffered whole: the
//! incremental [`ResponseParser`] dispatches status, body-fragment and
//! message-complete events as bytes arrive off the wire, and the
//! [`Client`] relays them to an application-supplied [`ResponseHandler`].
//!
//! # Features
//!
//! - Synchronous request/response model over a single connection per request
//! - Fixed-size buffers for predictable memory usage
//! - `Content-Length`, chunked and read-until-close body framing
//! - GET and POST method support
//! - Storage-backed [`download::download`] helper with optional CRC32
//!   verification
//!
//! # Usage
//!
//! The main entry point is the [`client::Client`], which works with any
//! platform stack implementing [`crate::network::TcpStack`]. A request
//! succeeds only if the server answered 200 and the response body arrived
//! complete; everything the application needs beyond that verdict is
//! observable through its handler.

/// HTTP client implementation: the request driver and its callbacks.
pub mod client;

/// Persisting response bodies into storage destinations.
pub mod download;

/// Incremental HTTP/1.1 response parsing.
pub mod response;

/// URL parsing.
pub mod url;

pub use client::{Client, Method};
pub use download::{Destination, StorageDestination, download, download_verified};
pub use response::{ParseError, ResponseHandler, ResponseParser};
pub use url::Url;
