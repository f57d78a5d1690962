//! A buffered, timed stream over one TCP connection.
//!
//! Network stacks deliver received data at their own granularity, which
//! rarely matches the buffer a protocol layer wants to fill. [`Stream`]
//! bridges the two: when an underlying receive yields more bytes than the
//! caller asked for, the remainder is kept as a pending chunk and consumed by
//! later reads before the socket is touched again. No byte is ever dropped or
//! delivered twice, regardless of how read sizes relate to receive sizes.

use crate::network::error::Error;
use crate::network::{TcpSocket, TcpStack};
use core::net::SocketAddr;

/// Timeout applied when the caller passes a non-positive value, in ms.
pub const DEFAULT_TIMEOUT_MS: u32 = 100;

/// The condition that ended a [`Stream::read`] call.
///
/// Bytes may have been copied in every case; the status tells the caller why
/// the call stopped, not whether anything arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadStatus {
    /// The requested length was fully copied.
    Complete,
    /// The timeout expired before the requested length arrived. The
    /// connection is still usable.
    Timeout,
    /// The peer closed the connection.
    Closed,
    /// The socket reported a failure other than timeout or closure.
    Failed,
}

/// The unread remainder of the most recent underlying receive.
///
/// Owned by the stream; created when a receive outsizes the caller's buffer,
/// released once fully drained or on disconnect.
struct Pending<B> {
    buffer: B,
    offset: usize,
}

/// A single TCP connection with cross-call leftover buffering.
///
/// One `Stream` serves one connection. After [`disconnect`](Stream::disconnect)
/// it can be connected again, but the usual pattern is one stream per
/// request/response exchange.
pub struct Stream<S: TcpSocket> {
    socket: Option<S>,
    pending: Option<Pending<S::Buffer>>,
    connected: bool,
}

impl<S: TcpSocket> Stream<S> {
    /// Creates a new stream in the disconnected state.
    pub fn new() -> Self {
        Self {
            socket: None,
            pending: None,
            connected: false,
        }
    }

    /// Resolves `host` and connects to it on `port`.
    ///
    /// On failure the stream is left disconnected with no partial state, and
    /// the error identifies which step failed: [`Error::DnsError`] for
    /// resolution, [`Error::ConnectionRefused`] for connection setup.
    pub fn connect<T>(&mut self, stack: &mut T, host: &str, port: u16) -> Result<(), Error>
    where
        T: TcpStack<Socket = S>,
    {
        self.disconnect();

        let addr = stack.resolve(host)?;
        let socket = stack.open(SocketAddr::new(addr, port))?;

        self.socket = Some(socket);
        self.connected = true;
        Ok(())
    }

    /// Copies up to `buf.len()` bytes into `buf`, returning the number of
    /// bytes copied and the condition that ended the call.
    ///
    /// A pending chunk from an earlier receive is consumed before the socket
    /// is read again. A timeout is not fatal: the bytes copied so far
    /// (possibly zero) are returned and the connection stays usable. Peer
    /// closure marks the stream dead. `timeout_ms <= 0` is treated as
    /// [`DEFAULT_TIMEOUT_MS`].
    pub fn read(&mut self, buf: &mut [u8], timeout_ms: i32) -> (usize, ReadStatus) {
        let timeout = normalize_timeout(timeout_ms);
        let Some(socket) = self.socket.as_mut() else {
            return (0, ReadStatus::Closed);
        };

        let mut copied = 0;

        while copied < buf.len() {
            let (chunk, offset) = match self.pending.take() {
                Some(pending) => (pending.buffer, pending.offset),
                None => match socket.recv(timeout) {
                    Ok(buffer) => (buffer, 0),
                    Err(Error::Timeout) => return (copied, ReadStatus::Timeout),
                    Err(Error::ConnectionClosed) => {
                        self.connected = false;
                        return (copied, ReadStatus::Closed);
                    }
                    Err(_) => return (copied, ReadStatus::Failed),
                },
            };

            let data = chunk.as_ref();
            let n = (data.len() - offset).min(buf.len() - copied);
            buf[copied..copied + n].copy_from_slice(&data[offset..offset + n]);
            copied += n;

            if offset + n < data.len() {
                // Caller's buffer filled up mid-chunk; keep the cursor for
                // the next read.
                self.pending = Some(Pending {
                    buffer: chunk,
                    offset: offset + n,
                });
            }
        }

        (copied, ReadStatus::Complete)
    }

    /// Writes all of `data`, looping over partial sends.
    ///
    /// Atomic from the caller's perspective: either every byte was accepted
    /// by the socket or an error is returned. `timeout_ms` bounds each
    /// underlying send, with the same non-positive normalization as
    /// [`read`](Stream::read). A [`Error::ConnectionClosed`] failure marks
    /// the stream dead.
    pub fn write(&mut self, data: &[u8], timeout_ms: i32) -> Result<(), Error> {
        let timeout = normalize_timeout(timeout_ms);
        let Some(socket) = self.socket.as_mut() else {
            return Err(Error::NotOpen);
        };

        let mut sent = 0;
        while sent < data.len() {
            match socket.send(&data[sent..], timeout) {
                Ok(n) => sent += n,
                Err(e) => {
                    if e == Error::ConnectionClosed {
                        self.connected = false;
                    }
                    return Err(e);
                }
            }
        }

        Ok(())
    }

    /// Closes the connection and releases any pending chunk.
    ///
    /// Idempotent: safe to call repeatedly, and on a stream whose connect
    /// failed. Always leaves the stream disconnected.
    pub fn disconnect(&mut self) {
        if let Some(socket) = self.socket.take() {
            let _ = socket.close();
        }
        self.pending = None;
        self.connected = false;
    }

    /// The last liveness observation recorded by read/write error paths.
    ///
    /// This is not an active probe: a peer that went away unnoticed still
    /// reads as connected until an operation observes the closure.
    pub fn is_connected(&self) -> bool {
        self.connected
    }
}

impl<S: TcpSocket> Default for Stream<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TcpSocket> Drop for Stream<S> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

fn normalize_timeout(timeout_ms: i32) -> u32 {
    if timeout_ms <= 0 {
        DEFAULT_TIMEOUT_MS
    } else {
        timeout_ms as u32
    }
}
