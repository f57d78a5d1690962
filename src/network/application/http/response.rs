//! Incremental HTTP/1.1 response parsing.
//!
//! [`ResponseParser`] is a push parser: it consumes response bytes in runs of
//! arbitrary size, keeps its state across calls, and dispatches structural
//! events to a [`ResponseHandler`] as they are recognized — without ever
//! holding the full message. Status and header lines are accumulated in a
//! small internal buffer so they may be split across receives; body bytes
//! pass through to the handler without copying.
//!
//! Messages framed by stream closure rather than an explicit length are
//! resolved by calling [`ResponseParser::finish`] once the transport reports
//! end of input. Feeding an empty run is a no-op and does not stand in for
//! `finish`; the two conditions are deliberately distinct.

use heapless::Vec;

/// Longest status, header or chunk-size line the parser accepts.
const MAX_LINE: usize = 256;

/// Events emitted while a response is parsed.
///
/// Every method has a no-op default, so implementations override only what
/// they need. Returning `false` from any method aborts parsing: the parser
/// reports [`ParseError::Aborted`] and refuses further input.
pub trait ResponseHandler {
    /// The status line was recognized.
    fn on_status(&mut self, code: u16) -> bool {
        let _ = code;
        true
    }

    /// A run of body bytes arrived. Runs may be arbitrarily small and the
    /// full body is never available at once.
    fn on_body(&mut self, data: &[u8]) -> bool {
        let _ = data;
        true
    }

    /// The message framing is resolved: a declared length was exhausted, the
    /// chunked terminator was seen, or the stream ended for a message framed
    /// by closure.
    fn on_message_complete(&mut self) -> bool {
        true
    }
}

/// The all-defaults handler, for callers interested only in the verdict.
impl ResponseHandler for () {}

/// Errors reported by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A status, header or chunk-size line exceeded the internal buffer.
    LineTooLong,
    /// The response violated the HTTP/1.1 grammar.
    Malformed,
    /// A handler returned `false`.
    Aborted,
}

#[cfg(feature = "defmt")]
impl defmt::Format for ParseError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ParseError::LineTooLong => defmt::write!(f, "LineTooLong"),
            ParseError::Malformed => defmt::write!(f, "Malformed"),
            ParseError::Aborted => defmt::write!(f, "Aborted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StatusLine,
    Headers,
    /// Body with a declared `Content-Length`.
    FixedBody,
    /// Body framed by connection closure.
    UnboundedBody,
    ChunkSize,
    ChunkData,
    /// CRLF that terminates a chunk's payload.
    ChunkDataEnd,
    ChunkTrailer,
    Complete,
}

/// Push parser for one HTTP/1.1 response.
///
/// Feed bytes with [`feed`](ResponseParser::feed); signal end of input with
/// [`finish`](ResponseParser::finish). Errors latch: after the first failure
/// every later call reports it again.
#[derive(Debug)]
pub struct ResponseParser {
    state: State,
    line: Vec<u8, MAX_LINE>,
    content_length: Option<u64>,
    remaining: u64,
    chunked: bool,
    chunk_remaining: u64,
    status_code: u16,
    failed: Option<ParseError>,
}

impl ResponseParser {
    /// Creates a parser positioned at the start of a response.
    pub fn new() -> Self {
        Self {
            state: State::StatusLine,
            line: Vec::new(),
            content_length: None,
            remaining: 0,
            chunked: false,
            chunk_remaining: 0,
            status_code: 0,
            failed: None,
        }
    }

    /// Consumes one run of response bytes, dispatching events as complete
    /// tokens are recognized. An empty run is a no-op.
    pub fn feed<H: ResponseHandler>(
        &mut self,
        data: &[u8],
        handler: &mut H,
    ) -> Result<(), ParseError> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        let result = self.advance(data, handler);
        if let Err(e) = result {
            self.failed = Some(e);
        }
        result
    }

    /// Signals that no further input is coming.
    ///
    /// Resolves messages framed by stream closure (firing
    /// `on_message_complete`) and returns whether the message completed:
    /// `Ok(false)` means body bytes or framing are still outstanding —
    /// a declared length was not reached, a chunked terminator was never
    /// seen, or the headers were cut short.
    pub fn finish<H: ResponseHandler>(&mut self, handler: &mut H) -> Result<bool, ParseError> {
        if let Some(e) = self.failed {
            return Err(e);
        }
        match self.state {
            State::Complete => Ok(true),
            State::UnboundedBody => {
                if let Err(e) = self.finish_message(handler) {
                    self.failed = Some(e);
                    return Err(e);
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Whether the message framing has been resolved.
    pub fn is_complete(&self) -> bool {
        self.state == State::Complete
    }

    /// The parsed status code, 0 until the status line has been seen.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    fn advance<H: ResponseHandler>(
        &mut self,
        mut data: &[u8],
        handler: &mut H,
    ) -> Result<(), ParseError> {
        while !data.is_empty() {
            match self.state {
                State::StatusLine => {
                    if !accumulate_line(&mut self.line, &mut data)? {
                        continue;
                    }
                    let line = core::mem::take(&mut self.line);
                    let code = parse_status_line(&line)?;
                    self.status_code = code;
                    self.state = State::Headers;
                    if !handler.on_status(code) {
                        return Err(ParseError::Aborted);
                    }
                }
                State::Headers => {
                    if !accumulate_line(&mut self.line, &mut data)? {
                        continue;
                    }
                    let line = core::mem::take(&mut self.line);
                    if line.is_empty() {
                        self.select_framing(handler)?;
                    } else {
                        self.parse_header(&line)?;
                    }
                }
                State::FixedBody => {
                    let n = self.remaining.min(data.len() as u64) as usize;
                    let (run, rest) = data.split_at(n);
                    data = rest;
                    self.remaining -= n as u64;
                    if !handler.on_body(run) {
                        return Err(ParseError::Aborted);
                    }
                    if self.remaining == 0 {
                        self.finish_message(handler)?;
                    }
                }
                State::UnboundedBody => {
                    let run = data;
                    data = &[];
                    if !handler.on_body(run) {
                        return Err(ParseError::Aborted);
                    }
                }
                State::ChunkSize => {
                    if !accumulate_line(&mut self.line, &mut data)? {
                        continue;
                    }
                    let line = core::mem::take(&mut self.line);
                    let size = parse_chunk_size(&line)?;
                    if size == 0 {
                        self.state = State::ChunkTrailer;
                    } else {
                        self.chunk_remaining = size;
                        self.state = State::ChunkData;
                    }
                }
                State::ChunkData => {
                    let n = self.chunk_remaining.min(data.len() as u64) as usize;
                    let (run, rest) = data.split_at(n);
                    data = rest;
                    self.chunk_remaining -= n as u64;
                    if !handler.on_body(run) {
                        return Err(ParseError::Aborted);
                    }
                    if self.chunk_remaining == 0 {
                        self.state = State::ChunkDataEnd;
                    }
                }
                State::ChunkDataEnd => {
                    if !accumulate_line(&mut self.line, &mut data)? {
                        continue;
                    }
                    let line = core::mem::take(&mut self.line);
                    if !line.is_empty() {
                        return Err(ParseError::Malformed);
                    }
                    self.state = State::ChunkSize;
                }
                State::ChunkTrailer => {
                    if !accumulate_line(&mut self.line, &mut data)? {
                        continue;
                    }
                    let line = core::mem::take(&mut self.line);
                    if line.is_empty() {
                        self.finish_message(handler)?;
                    }
                    // Trailer headers are consumed and ignored.
                }
                State::Complete => {
                    // Anything past the message end is discarded.
                    data = &[];
                }
            }
        }
        Ok(())
    }

    fn select_framing<H: ResponseHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        if self.chunked {
            self.state = State::ChunkSize;
        } else if bodyless(self.status_code) {
            self.finish_message(handler)?;
        } else {
            match self.content_length {
                Some(0) => self.finish_message(handler)?,
                Some(n) => {
                    self.remaining = n;
                    self.state = State::FixedBody;
                }
                None => self.state = State::UnboundedBody,
            }
        }
        Ok(())
    }

    fn parse_header(&mut self, line: &[u8]) -> Result<(), ParseError> {
        let text = core::str::from_utf8(line).map_err(|_| ParseError::Malformed)?;
        // Lines without a colon are tolerated and skipped.
        let Some((name, value)) = text.split_once(':') else {
            return Ok(());
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-length") {
            let n = value.parse::<u64>().map_err(|_| ParseError::Malformed)?;
            self.content_length = Some(n);
        } else if name.eq_ignore_ascii_case("transfer-encoding")
            && value
                .split(',')
                .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
        {
            self.chunked = true;
        }
        Ok(())
    }

    fn finish_message<H: ResponseHandler>(&mut self, handler: &mut H) -> Result<(), ParseError> {
        self.state = State::Complete;
        if handler.on_message_complete() {
            Ok(())
        } else {
            Err(ParseError::Aborted)
        }
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Appends bytes up to the next LF into `line`. Returns `true` when a full
/// line (CR and LF stripped) is buffered, `false` when `data` was exhausted
/// first.
fn accumulate_line(line: &mut Vec<u8, MAX_LINE>, data: &mut &[u8]) -> Result<bool, ParseError> {
    match data.iter().position(|&b| b == b'\n') {
        Some(i) => {
            line.extend_from_slice(&data[..i])
                .map_err(|_| ParseError::LineTooLong)?;
            *data = &data[i + 1..];
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            Ok(true)
        }
        None => {
            line.extend_from_slice(data)
                .map_err(|_| ParseError::LineTooLong)?;
            *data = &[];
            Ok(false)
        }
    }
}

/// `HTTP/1.x <code> [reason]`
fn parse_status_line(line: &[u8]) -> Result<u16, ParseError> {
    let text = core::str::from_utf8(line).map_err(|_| ParseError::Malformed)?;
    let mut parts = text.splitn(3, ' ');
    let version = parts.next().ok_or(ParseError::Malformed)?;
    if !version.starts_with("HTTP/") {
        return Err(ParseError::Malformed);
    }
    parts
        .next()
        .ok_or(ParseError::Malformed)?
        .parse::<u16>()
        .map_err(|_| ParseError::Malformed)
}

fn parse_chunk_size(line: &[u8]) -> Result<u64, ParseError> {
    let text = core::str::from_utf8(line).map_err(|_| ParseError::Malformed)?;
    // Chunk extensions after ';' are ignored.
    let hex = text.split(';').next().unwrap_or(text).trim();
    u64::from_str_radix(hex, 16).map_err(|_| ParseError::Malformed)
}

/// Statuses that carry no body regardless of headers.
fn bodyless(code: u16) -> bool {
    code == 204 || code == 304
}
