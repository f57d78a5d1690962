//! # Application layer protocols
//!
//! Protocol implementations built on the core network traits. Each protocol
//! is generic over the platform's [`TcpStack`](crate::network::TcpStack)
//! implementation and follows the same principles:
//!
//! - **Stack agnostic**: any TCP/IP stack that satisfies the socket traits
//! - **No-std compatible**: fixed-size buffers, no heap allocation
//! - **Synchronous**: every operation blocks until completion, timeout or
//!   error

/// HTTP/1.1 client implementation.
///
/// Provides a streaming HTTP client suitable for embedded systems,
/// supporting GET and POST with callback-based response delivery.
pub mod http;
