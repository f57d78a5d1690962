//! Minimal URL parsing for `http://` targets.

use crate::network::error::Error;

/// Port used when the URL does not specify one.
pub const DEFAULT_PORT: u16 = 80;

/// A parsed `http://` URL.
///
/// All fields borrow from the input string; nothing is copied or mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Url<'a> {
    /// Host name or address literal.
    pub host: &'a str,
    /// Explicit port, if the URL carried one.
    pub port: Option<u16>,
    /// Absolute path, `/` when the URL has none.
    pub path: &'a str,
    /// Query string without the leading `?`, if present and non-empty.
    pub query: Option<&'a str>,
}

impl<'a> Url<'a> {
    /// Parses `http://host[:port][/path][?query][#fragment]`.
    ///
    /// The fragment is discarded. Other schemes (including `https`), an
    /// empty host, and unparseable ports are rejected with
    /// [`Error::InvalidAddress`].
    pub fn parse(input: &'a str) -> Result<Self, Error> {
        let rest = input.strip_prefix("http://").ok_or(Error::InvalidAddress)?;
        let rest = match rest.split_once('#') {
            Some((before, _fragment)) => before,
            None => rest,
        };

        let (authority, after) = match rest.find(['/', '?']) {
            Some(i) => rest.split_at(i),
            None => (rest, ""),
        };

        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => {
                let port = port.parse::<u16>().map_err(|_| Error::InvalidAddress)?;
                if port == 0 {
                    return Err(Error::InvalidAddress);
                }
                (host, Some(port))
            }
            None => (authority, None),
        };
        if host.is_empty() {
            return Err(Error::InvalidAddress);
        }

        let (path, query) = match after.split_once('?') {
            Some((path, query)) => (path, if query.is_empty() { None } else { Some(query) }),
            None => (after, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        Ok(Self {
            host,
            port,
            path,
            query,
        })
    }

    /// The port to connect to: the explicit one, or [`DEFAULT_PORT`].
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }
}
