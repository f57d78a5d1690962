//! Common error types for network operations

/// A common error type for network operations.
///
/// This enum defines a set of common errors that can occur when working with
/// network sockets and streams. It is designed to be simple and portable for
/// `no_std` environments.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// An operation was attempted on a connection that is not open.
    NotOpen,
    /// An error occurred during a write operation.
    WriteError,
    /// An error occurred during a read operation.
    ReadError,
    /// A connection attempt was refused or could not be established.
    ConnectionRefused,
    /// A timeout occurred.
    Timeout,
    /// The connection was closed by the peer.
    ConnectionClosed,
    /// An invalid or malformed address/URL was provided.
    InvalidAddress,
    /// A hostname could not be resolved.
    DnsError,
    /// A protocol-specific error occurred.
    ProtocolError,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::NotOpen => defmt::write!(f, "NotOpen"),
            Error::WriteError => defmt::write!(f, "WriteError"),
            Error::ReadError => defmt::write!(f, "ReadError"),
            Error::ConnectionRefused => defmt::write!(f, "ConnectionRefused"),
            Error::Timeout => defmt::write!(f, "Timeout"),
            Error::ConnectionClosed => defmt::write!(f, "ConnectionClosed"),
            Error::InvalidAddress => defmt::write!(f, "InvalidAddress"),
            Error::DnsError => defmt::write!(f, "DnsError"),
            Error::ProtocolError => defmt::write!(f, "ProtocolError"),
        }
    }
}
