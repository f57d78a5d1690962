//! Persisting a response body into storage.
//!
//! [`download`] fetches a URL and streams the body into a [`Destination`]:
//! the destination is opened when the server answers 200, each body fragment
//! is appended in bounded increments as it arrives, and the destination is
//! finalized on message completion. On any failure after opening — a short
//! body, an append error, a checksum mismatch — the partial output is
//! discarded, so a destination only ever ends up complete or absent.
//!
//! [`StorageDestination`] adapts a region of any [`Storage`] device into a
//! destination, which is the typical arrangement on firmware-update style
//! flows: fetch an image over HTTP, land it in a staging area of flash.

use crate::network::TcpStack;
use crate::network::application::http::client::Client;
use crate::network::application::http::response::ResponseHandler;
use crate::storage::error::Error as StorageError;
use crate::storage::{BlockingErase, ReadStorage, Region, Storage};

/// Largest slice handed to [`Destination::append`] in one call.
const WRITE_CHUNK: usize = 512;

/// Somewhere a downloaded resource can be persisted.
///
/// The helper drives the lifecycle: `open` exactly once (on status 200),
/// `append` zero or more times in increments of at most 512 bytes, then
/// either `finalize` (complete transfer) or `discard` (any failure).
pub trait Destination {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Prepare the destination for a fresh download.
    fn open(&mut self) -> Result<(), Self::Error>;

    /// Append the next run of body bytes.
    fn append(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Mark the download complete.
    fn finalize(&mut self) -> Result<(), Self::Error>;

    /// Remove whatever partial content was written.
    fn discard(&mut self) -> Result<(), Self::Error>;
}

/// Streams body fragments into the destination as the exchange progresses.
struct Sink<'a, D: Destination> {
    dest: &'a mut D,
    hasher: crc32fast::Hasher,
    expected_crc32: Option<u32>,
    opened: bool,
    finalized: bool,
}

impl<D: Destination> ResponseHandler for Sink<'_, D> {
    fn on_status(&mut self, code: u16) -> bool {
        if code != 200 {
            // Nothing worth storing is coming; stop the exchange early.
            return false;
        }
        match self.dest.open() {
            Ok(()) => {
                self.opened = true;
                true
            }
            Err(_) => false,
        }
    }

    fn on_body(&mut self, data: &[u8]) -> bool {
        for piece in data.chunks(WRITE_CHUNK) {
            if self.dest.append(piece).is_err() {
                return false;
            }
            if self.expected_crc32.is_some() {
                self.hasher.update(piece);
            }
        }
        true
    }

    fn on_message_complete(&mut self) -> bool {
        if let Some(expected) = self.expected_crc32 {
            if self.hasher.clone().finalize() != expected {
                return false;
            }
        }
        match self.dest.finalize() {
            Ok(()) => {
                self.finalized = true;
                true
            }
            Err(_) => false,
        }
    }
}

/// Downloads `url` into `dest` with a GET request.
///
/// Returns `true` iff the server answered 200, the body arrived complete,
/// and the destination was finalized. Partial output is discarded on every
/// failure path; a non-200 answer leaves the destination untouched.
pub fn download<T, D>(client: &mut Client<T>, url: &str, dest: &mut D) -> bool
where
    T: TcpStack,
    D: Destination,
{
    run(client, url, dest, None)
}

/// Like [`download`], additionally requiring the body's CRC32 to match
/// `expected_crc32`. A mismatch discards the output and fails.
pub fn download_verified<T, D>(
    client: &mut Client<T>,
    url: &str,
    dest: &mut D,
    expected_crc32: u32,
) -> bool
where
    T: TcpStack,
    D: Destination,
{
    run(client, url, dest, Some(expected_crc32))
}

fn run<T, D>(client: &mut Client<T>, url: &str, dest: &mut D, expected_crc32: Option<u32>) -> bool
where
    T: TcpStack,
    D: Destination,
{
    let mut sink = Sink {
        dest,
        hasher: crc32fast::Hasher::new(),
        expected_crc32,
        opened: false,
        finalized: false,
    };
    let ok = client.get(url, &mut sink);

    if sink.opened && !sink.finalized {
        let _ = sink.dest.discard();
        return false;
    }
    ok && sink.finalized
}

/// A [`Destination`] writing sequentially into the `[start, end)` region of
/// a storage device.
///
/// `open` erases the region (flash convention: erase before program),
/// `append` programs forward from `start`, `discard` erases the region
/// again. The written length is available afterwards via
/// [`written`](StorageDestination::written).
pub struct StorageDestination<'a, S>
where
    S: ReadStorage<Error = StorageError> + Storage + BlockingErase,
{
    storage: &'a mut S,
    start: u32,
    end: u32,
    written: u32,
}

impl<'a, S> StorageDestination<'a, S>
where
    S: ReadStorage<Error = StorageError> + Storage + BlockingErase,
{
    /// Creates a destination over `storage[start..end)`.
    pub fn new(storage: &'a mut S, start: u32, end: u32) -> Self {
        Self {
            storage,
            start,
            end,
            written: 0,
        }
    }

    /// Number of bytes appended since the last `open`/`discard`.
    pub fn written(&self) -> u32 {
        self.written
    }
}

impl<S> Region for StorageDestination<'_, S>
where
    S: ReadStorage<Error = StorageError> + Storage + BlockingErase,
{
    fn start(&self) -> u32 {
        self.start
    }

    fn end(&self) -> u32 {
        self.end
    }
}

impl<S> Destination for StorageDestination<'_, S>
where
    S: ReadStorage<Error = StorageError> + Storage + BlockingErase,
{
    type Error = StorageError;

    fn open(&mut self) -> Result<(), Self::Error> {
        self.storage.erase(self.start, self.end)?;
        self.written = 0;
        Ok(())
    }

    fn append(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }
        let offset = self.start + self.written;
        let last = offset as u64 + data.len() as u64 - 1;
        if last > u32::MAX as u64 || !self.contains(last as u32) {
            return Err(StorageError::OutOfBounds);
        }
        self.storage.write(offset, data)?;
        self.written += data.len() as u32;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn discard(&mut self) -> Result<(), Self::Error> {
        self.written = 0;
        self.storage.erase(self.start, self.end)
    }
}
