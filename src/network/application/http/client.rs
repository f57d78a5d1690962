//! The HTTP request driver.
//!
//! [`Client`] orchestrates one request/response exchange at a time: parse the
//! target, connect, send the request, pump received bytes into the
//! incremental parser, flush, disconnect. The outcome is collapsed into a
//! single `bool`; anything finer-grained — the status code, the body, how far
//! the transfer got — is observable through the caller's
//! [`ResponseHandler`] and [`Client::status_code`].

use crate::network::application::http::response::{ResponseHandler, ResponseParser};
use crate::network::application::http::url::Url;
use crate::network::transport::{ReadStatus, Stream};
use crate::network::{TcpSocket, TcpStack};
use core::fmt::Write;
use heapless::String;

/// Size of the request formatting buffer and of the receive buffer.
const BUFFER_SIZE: usize = 1024;

/// Timeout for each transport operation during an exchange, in ms.
const EXCHANGE_TIMEOUT_MS: i32 = 5000;

/// HTTP request methods supported by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A synchronous HTTP/1.1 client.
///
/// One connection serves exactly one request and is closed afterwards, on
/// every path, including early failures. A request succeeds iff the server
/// answered 200 and the response body arrived complete; any other status is
/// a deliberate failure even when the body transferred fully — callers that
/// care about other codes inspect them via their handler or
/// [`status_code`](Client::status_code).
pub struct Client<T: TcpStack> {
    stack: T,
    status_code: u16,
}

/// Bridges parser events to the caller's handler while recording the status
/// code the final verdict needs.
struct StatusRecorder<'a, H: ResponseHandler> {
    handler: &'a mut H,
    status_code: &'a mut u16,
}

impl<H: ResponseHandler> ResponseHandler for StatusRecorder<'_, H> {
    fn on_status(&mut self, code: u16) -> bool {
        *self.status_code = code;
        self.handler.on_status(code)
    }

    fn on_body(&mut self, data: &[u8]) -> bool {
        self.handler.on_body(data)
    }

    fn on_message_complete(&mut self) -> bool {
        self.handler.on_message_complete()
    }
}

impl<T: TcpStack> Client<T> {
    /// Creates a client on top of the platform's network stack.
    pub fn new(stack: T) -> Self {
        Self {
            stack,
            status_code: 0,
        }
    }

    /// Performs a GET request.
    pub fn get<H: ResponseHandler>(&mut self, url: &str, handler: &mut H) -> bool {
        self.request(Method::Get, url, handler)
    }

    /// Performs a POST request.
    pub fn post<H: ResponseHandler>(&mut self, url: &str, handler: &mut H) -> bool {
        self.request(Method::Post, url, handler)
    }

    /// The status code of the last exchange, 0 until a status line was seen.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Performs one request/response exchange against `url`.
    ///
    /// Returns `true` iff the response framing was resolved with no body
    /// bytes outstanding and the status code was 200. A malformed URL fails
    /// immediately with no network activity.
    pub fn request<H: ResponseHandler>(&mut self, method: Method, url: &str, handler: &mut H) -> bool {
        self.status_code = 0;

        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(_) => return false,
        };

        let mut stream = Stream::new();
        if stream.connect(&mut self.stack, url.host, url.port()).is_err() {
            return false;
        }

        let mut recorder = StatusRecorder {
            handler,
            status_code: &mut self.status_code,
        };
        let transferred = exchange(&mut stream, method, &url, &mut recorder);
        stream.disconnect();

        transferred && self.status_code == 200
    }
}

/// Formats the request line, `Host` header and terminating blank line.
fn format_request(request: &mut String<BUFFER_SIZE>, method: Method, url: &Url) -> core::fmt::Result {
    write!(request, "{} {}", method.as_str(), url.path)?;
    if let Some(query) = url.query {
        write!(request, "?{}", query)?;
    }
    write!(request, " HTTP/1.1\r\nHost: {}\r\n\r\n", url.host)
}

/// Sends the request and receives the response over a connected stream.
/// Returns whether the response message completed. The caller disconnects.
fn exchange<S, H>(stream: &mut Stream<S>, method: Method, url: &Url, handler: &mut H) -> bool
where
    S: TcpSocket,
    H: ResponseHandler,
{
    let mut request: String<BUFFER_SIZE> = String::new();
    if format_request(&mut request, method, url).is_err() {
        // Overflowing the bounded request buffer is fatal.
        return false;
    }

    let mut parser = ResponseParser::new();
    let sent = stream.write(request.as_bytes(), EXCHANGE_TIMEOUT_MS).is_ok();

    if sent {
        let mut buf = [0u8; BUFFER_SIZE];
        loop {
            let (n, status) = stream.read(&mut buf, EXCHANGE_TIMEOUT_MS);
            if parser.feed(&buf[..n], handler).is_err() {
                return false;
            }
            if status != ReadStatus::Complete {
                // Terminal transport condition; resolve framing below.
                break;
            }
        }
    }

    // The flush runs even after a failed send, so a message framed purely by
    // closure is still resolved before the verdict.
    let complete = matches!(parser.finish(handler), Ok(true));
    sent && complete
}
