//! # Storage abstraction layer
//!
//! A small set of traits over byte-addressable storage devices — flash,
//! EEPROM, FRAM, RAM buffers — sufficient for landing downloaded content on
//! a device. The traits are technology agnostic and compile down to direct
//! hardware calls; implementations live with the platform, mirroring how the
//! network side plugs in through socket traits.
//!
//! The download helper consumes these through
//! [`StorageDestination`](crate::network::application::http::download::StorageDestination),
//! which turns a `[start, end)` region of any erasable device into a
//! sequential write target.

#![allow(missing_docs)]
#![deny(unsafe_code)]

/// Common error types for storage operations
pub mod error;


/// Re-exports of common traits for convenient importing
pub mod prelude {
    pub use super::{BlockingErase, ReadStorage, Region, Storage};
}

/// A contiguous memory region with start and end boundaries.
///
/// Used to describe valid address ranges, protected areas, or logical
/// partitions such as a download staging area.
pub trait Region {
    /// Start address of the region (inclusive).
    fn start(&self) -> u32;

    /// End address of the region (exclusive).
    fn end(&self) -> u32;

    /// Check if an address falls within `[start(), end())`.
    fn contains(&self, address: u32) -> bool {
        (address >= self.start()) && (address < self.end())
    }
}

/// Trait for reading data from storage devices.
pub trait ReadStorage {
    /// Associated error type
    type Error: core::fmt::Debug;

    /// Read `bytes.len()` bytes starting at `offset`.
    ///
    /// The entire buffer is filled unless an error occurs.
    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error>;

    /// Total capacity of the device in bytes.
    fn capacity(&self) -> usize;
}

/// Trait for storage devices that support both read and write operations.
///
/// Whether a location can be rewritten without an erase depends on the
/// technology; flash implementations typically require
/// [`BlockingErase::erase`] first.
pub trait Storage: ReadStorage {
    /// Write `bytes` starting at `offset`.
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error>;
}

/// Trait for storage devices that require explicit erase operations.
pub trait BlockingErase: Storage {
    /// Erase the address range `[from, to)`.
    ///
    /// Erased bytes read back as `0xFF` (flash memory convention). Devices
    /// may impose alignment requirements on the range.
    fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error>;
}
