//! A network abstraction layer for embedded HTTP clients
//!
//! This module defines the seam between the library and the platform's TCP/IP
//! stack. The platform implements two small traits — [`TcpStack`] for name
//! resolution and connection setup, [`TcpSocket`] for timed receive/send on an
//! established connection — and everything above them (buffered streaming,
//! HTTP parsing, request orchestration) is portable library code.
//!
//! The receive side deliberately mirrors how embedded stacks hand out data:
//! [`TcpSocket::recv`] yields one buffer at whatever granularity the stack
//! produced it (a packet, a segment, an internal pool buffer). The
//! [`transport::Stream`] layered on top lets callers read in units of their
//! own choosing without losing the remainder of an oversized receive.

#![allow(missing_docs)]
#![deny(unsafe_code)]

use core::net::{IpAddr, SocketAddr};

use error::Error;

/// Common error types for network operations
pub mod error;

/// Buffered stream over a raw socket
pub mod transport;

/// Protocol implementations built on the core traits
pub mod application;

/// Re-exports of common traits
pub mod prelude {
    pub use super::{TcpSocket, TcpStack};
}

/// A connected TCP socket as the platform's network stack exposes it.
///
/// All operations block the caller. Receive and send take an explicit
/// per-call timeout in milliseconds; the value is always positive by the time
/// it reaches an implementation (the transport layer normalizes non-positive
/// caller timeouts before calling down).
pub trait TcpSocket {
    /// One unit of received data, at the granularity the stack produced it.
    type Buffer: AsRef<[u8]>;

    /// Perform one blocking receive bounded by `timeout_ms`.
    ///
    /// Returns the next run of bytes the stack has for this connection.
    /// Implementations must return [`Error::Timeout`] when the timeout
    /// expires with nothing to deliver, and [`Error::ConnectionClosed`] once
    /// the peer has closed the connection and all data has been drained.
    fn recv(&mut self, timeout_ms: u32) -> Result<Self::Buffer, Error>;

    /// Send a prefix of `data`, blocking for at most `timeout_ms`.
    ///
    /// Returns the number of bytes the stack accepted. Implementations must
    /// either accept at least one byte or return an error; a zero-byte
    /// success would stall the transmit loop above this trait.
    fn send(&mut self, data: &[u8], timeout_ms: u32) -> Result<usize, Error>;

    /// Close the connection, releasing any resources held by the stack.
    fn close(self) -> Result<(), Error>;
}

/// Entry points into the platform's TCP/IP stack: name resolution and
/// connection establishment.
pub trait TcpStack {
    /// The socket type produced by [`TcpStack::open`].
    type Socket: TcpSocket;

    /// Resolve a hostname to an address.
    ///
    /// Returns [`Error::DnsError`] when the name cannot be resolved.
    fn resolve(&mut self, hostname: &str) -> Result<IpAddr, Error>;

    /// Open a new socket and connect it to `remote`, in blocking mode.
    ///
    /// Implementations are responsible for whatever connect timeout the
    /// underlying stack enforces; this trait does not add one. Failures
    /// (allocation, refused connection, unreachable host) are reported as
    /// [`Error::ConnectionRefused`].
    fn open(&mut self, remote: SocketAddr) -> Result<Self::Socket, Error>;
}
