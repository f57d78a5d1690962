//! # libhttpc - minimal HTTP client for embedded devices
//!
//! A small, synchronous HTTP/1.1 client designed for constrained devices. The
//! library owns the protocol work — buffered transport, incremental response
//! parsing, request orchestration — and leaves the raw socket primitives to
//! the platform, which plugs in through a pair of small traits. It supports
//! `no_std` environments and performs no heap allocation.
//!
//! ## Features
//!
//! - **Buffered transport**: callers read with buffers of any size; bytes the
//!   network stack delivered in larger units are carried over to the next read
//! - **Streaming responses**: body bytes are handed to the application as they
//!   arrive, without ever buffering the full message
//! - **Push parser**: incremental HTTP/1.1 response parsing with
//!   `Content-Length`, chunked and read-until-close framing
//! - **Download helper**: persist a response body straight into a storage
//!   device, with optional CRC32 verification
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libhttpc = "0.1.0"
//! ```
//!
//! Implement [`network::TcpStack`] and [`network::TcpSocket`] for your
//! platform's network stack, then drive requests through
//! [`network::application::http::Client`]:
//!
//! ```rust,no_run
//! use libhttpc::network::application::http::{Client, ResponseHandler};
//! # use libhttpc::network::{TcpSocket, TcpStack, error::Error};
//! # use core::net::{IpAddr, Ipv4Addr, SocketAddr};
//! # struct MockSocket;
//! # impl TcpSocket for MockSocket {
//! #     type Buffer = [u8; 0];
//! #     fn recv(&mut self, _timeout_ms: u32) -> Result<Self::Buffer, Error> {
//! #         Err(Error::ConnectionClosed)
//! #     }
//! #     fn send(&mut self, data: &[u8], _timeout_ms: u32) -> Result<usize, Error> {
//! #         Ok(data.len())
//! #     }
//! #     fn close(self) -> Result<(), Error> { Ok(()) }
//! # }
//! # struct MockStack;
//! # impl TcpStack for MockStack {
//! #     type Socket = MockSocket;
//! #     fn resolve(&mut self, _hostname: &str) -> Result<IpAddr, Error> {
//! #         Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
//! #     }
//! #     fn open(&mut self, _remote: SocketAddr) -> Result<MockSocket, Error> { Ok(MockSocket) }
//! # }
//!
//! struct BodyCounter {
//!     received: usize,
//! }
//!
//! impl ResponseHandler for BodyCounter {
//!     fn on_body(&mut self, data: &[u8]) -> bool {
//!         self.received += data.len();
//!         true
//!     }
//! }
//!
//! let mut client = Client::new(MockStack);
//! let mut counter = BodyCounter { received: 0 };
//!
//! if client.get("http://example.com/sensor/config", &mut counter) {
//!     // counter.received bytes arrived and the server answered 200
//! }
//! ```
//!
//! ## Platform support
//!
//! This library is designed to work on:
//! - Embedded microcontrollers (ARM Cortex-M, RISC-V, etc.) with any TCP/IP
//!   stack that can satisfy the two socket traits
//! - Linux-based devices, via `std::net` adapters
//! - Any platform supporting Rust's `core` library
//!
//! ## Optional features
//!
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: Enable defmt formatting of error types for embedded debugging

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Network abstraction layer: socket primitive traits, the buffered transport
/// stream, and the HTTP client built on top of them.
pub mod network;

/// Storage abstraction layer used by the download helper to persist response
/// bodies onto flash, EEPROM or RAM-backed devices.
pub mod storage;
