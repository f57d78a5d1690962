use core::net::{IpAddr, SocketAddr};
use std::io::{ErrorKind, Read as _, Write as _};
use std::net::{Shutdown, TcpListener, TcpStream, ToSocketAddrs};
use std::rc::Rc;
use std::thread;
use std::time::Duration;

use libhttpc::network::application::http::{Client, Method};
use libhttpc::network::error::Error;
use libhttpc::network::{TcpSocket, TcpStack};

use super::{Recorder, client_with_response};
use crate::{MockSocket, MockStack, Recv, Send as SendStep, SocketLog};

const OK_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello";

#[test]
fn get_succeeds_on_200_with_complete_body() {
    let (mut client, log) = client_with_response(&[OK_RESPONSE], true);
    let mut rec = Recorder::default();

    assert!(client.get("http://device.local/state", &mut rec));
    assert_eq!(client.status_code(), 200);
    assert_eq!(rec.statuses, vec![200]);
    assert_eq!(rec.body, b"hello");
    assert_eq!(rec.completions, 1);

    assert_eq!(
        log.sent.borrow().as_slice(),
        b"GET /state HTTP/1.1\r\nHost: device.local\r\n\r\n"
    );
    // The connection is torn down even on success.
    assert_eq!(log.closes.get(), 1);
}

#[test]
fn request_line_carries_query_and_post_method() {
    let (mut client, log) = client_with_response(&[OK_RESPONSE], true);

    assert!(client.post("http://device.local:8080/cmd?reboot=1&delay=5", &mut ()));
    assert_eq!(
        log.sent.borrow().as_slice(),
        b"POST /cmd?reboot=1&delay=5 HTTP/1.1\r\nHost: device.local\r\n\r\n"
    );
    assert_eq!(
        log.opens.borrow().as_slice(),
        &[SocketAddr::new("127.0.0.1".parse::<IpAddr>().unwrap(), 8080)]
    );
}

#[test]
fn default_port_is_80() {
    let (mut client, log) = client_with_response(&[OK_RESPONSE], true);
    client.request(Method::Get, "http://device.local", &mut ());
    assert_eq!(log.opens.borrow()[0].port(), 80);
}

#[test]
fn body_is_identical_however_the_network_splits_it() {
    let response = b"HTTP/1.1 200 OK\r\nContent-Length: 26\r\n\r\nabcdefghijklmnopqrstuvwxyz";

    for step in [1usize, 2, 3, 7, 11, response.len()] {
        let chunks: Vec<&[u8]> = response.chunks(step).collect();
        let (mut client, _log) = client_with_response(&chunks, true);
        let mut rec = Recorder::default();

        assert!(client.get("http://device.local/alphabet", &mut rec), "step {step}");
        assert_eq!(rec.body, b"abcdefghijklmnopqrstuvwxyz", "step {step}");
        assert_eq!(rec.completions, 1, "step {step}");
    }
}

#[test]
fn truncated_body_fails_but_streams_what_arrived() {
    // Declared 10, delivered 7, then the peer goes away.
    let (mut client, _log) = client_with_response(
        &[b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n7 bytes" as &[u8]],
        true,
    );
    let mut rec = Recorder::default();

    assert!(!client.get("http://device.local/fw.bin", &mut rec));
    assert_eq!(rec.body, b"7 bytes");
    assert_eq!(rec.completions, 0);
}

#[test]
fn non_200_status_fails_even_with_a_complete_body() {
    let (mut client, _log) = client_with_response(
        &[b"HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\n\r\nnot found" as &[u8]],
        true,
    );
    let mut rec = Recorder::default();

    assert!(!client.get("http://device.local/missing", &mut rec));
    // The body still streamed and framing resolved; only the verdict differs.
    assert_eq!(rec.statuses, vec![404]);
    assert_eq!(rec.body, b"not found");
    assert_eq!(rec.completions, 1);
    assert_eq!(client.status_code(), 404);
}

#[test]
fn close_framed_body_succeeds() {
    let (mut client, _log) = client_with_response(
        &[b"HTTP/1.1 200 OK\r\n\r\n" as &[u8], b"first ", b"second"],
        true,
    );
    let mut rec = Recorder::default();

    assert!(client.get("http://device.local/stream", &mut rec));
    assert_eq!(rec.body, b"first second");
    assert_eq!(rec.completions, 1);
}

#[test]
fn chunked_body_succeeds() {
    let (mut client, _log) = client_with_response(
        &[
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n" as &[u8],
            b"4\r\nWiki\r\n5\r\npedia\r\n",
            b"0\r\n\r\n",
        ],
        true,
    );
    let mut rec = Recorder::default();

    assert!(client.get("http://device.local/wiki", &mut rec));
    assert_eq!(rec.body, b"Wikipedia");
    assert_eq!(rec.completions, 1);
}

#[test]
fn keep_alive_response_resolves_via_timeout() {
    // Complete response, but the server leaves the connection open; the
    // exchange ends on the read timeout instead of closure.
    let (mut client, _log) = client_with_response(&[OK_RESPONSE], false);
    let mut rec = Recorder::default();

    assert!(client.get("http://device.local/state", &mut rec));
    assert_eq!(rec.body, b"hello");
}

#[test]
fn malformed_url_fails_without_network_activity() {
    let (mut client, log) = client_with_response(&[OK_RESPONSE], true);

    for url in ["", "device.local/state", "https://device.local/", "http://:80/x"] {
        assert!(!client.get(url, &mut ()), "url {url:?}");
    }
    assert!(log.resolves.borrow().is_empty());
    assert!(log.opens.borrow().is_empty());
    assert!(log.sent.borrow().is_empty());
}

#[test]
fn resolution_failure_fails_the_request() {
    let (mut client, _log) = {
        let log = Rc::new(SocketLog::default());
        let socket = MockSocket::new(vec![], &log);
        let mut stack = MockStack::new(socket, &log);
        stack.resolve_error = Some(Error::DnsError);
        (Client::new(stack), log)
    };

    assert!(!client.get("http://nowhere.invalid/", &mut ()));
    assert_eq!(client.status_code(), 0);
}

#[test]
fn connect_failure_fails_the_request() {
    let log = Rc::new(SocketLog::default());
    let socket = MockSocket::new(vec![], &log);
    let mut stack = MockStack::new(socket, &log);
    stack.open_error = Some(Error::ConnectionRefused);
    let mut client = Client::new(stack);

    assert!(!client.get("http://device.local/", &mut ()));
}

#[test]
fn send_failure_fails_before_any_parsing() {
    let log = Rc::new(SocketLog::default());
    let mut socket = MockSocket::new(vec![Recv::Data(OK_RESPONSE.to_vec())], &log);
    socket.send_script = [SendStep::Error(Error::WriteError)].into_iter().collect();
    let stack = MockStack::new(socket, &log);
    let mut client = Client::new(stack);
    let mut rec = Recorder::default();

    assert!(!client.get("http://device.local/state", &mut rec));
    assert!(rec.statuses.is_empty());
    assert!(rec.body.is_empty());
    // Cleanup still ran.
    assert_eq!(log.closes.get(), 1);
}

#[test]
fn handler_refusal_aborts_the_exchange() {
    let (mut client, _log) = client_with_response(&[OK_RESPONSE], true);
    let mut rec = Recorder {
        refuse_status: true,
        ..Recorder::default()
    };

    assert!(!client.get("http://device.local/state", &mut rec));
    assert_eq!(rec.statuses, vec![200]);
    // Aborted before any body was delivered.
    assert!(rec.body.is_empty());
    assert_eq!(rec.completions, 0);
}

#[test]
fn status_code_resets_between_exchanges() {
    let (mut client, _log) = client_with_response(
        &[b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n" as &[u8]],
        true,
    );
    assert!(!client.get("http://device.local/missing", &mut ()));
    assert_eq!(client.status_code(), 404);

    // The socket was consumed by the first exchange; the second fails at
    // connect with the status reset.
    assert!(!client.get("http://device.local/missing", &mut ()));
    assert_eq!(client.status_code(), 0);
}

// ---------------------------------------------------------------------------
// Loopback end-to-end over std::net
// ---------------------------------------------------------------------------

struct StdStack;

struct StdSocket {
    stream: TcpStream,
}

impl TcpSocket for StdSocket {
    type Buffer = Vec<u8>;

    fn recv(&mut self, timeout_ms: u32) -> Result<Vec<u8>, Error> {
        self.stream
            .set_read_timeout(Some(Duration::from_millis(u64::from(timeout_ms))))
            .map_err(|_| Error::ReadError)?;
        let mut buf = [0u8; 512];
        match self.stream.read(&mut buf) {
            Ok(0) => Err(Error::ConnectionClosed),
            Ok(n) => Ok(buf[..n].to_vec()),
            Err(e) if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut => {
                Err(Error::Timeout)
            }
            Err(_) => Err(Error::ReadError),
        }
    }

    fn send(&mut self, data: &[u8], _timeout_ms: u32) -> Result<usize, Error> {
        self.stream.write(data).map_err(|_| Error::WriteError)
    }

    fn close(self) -> Result<(), Error> {
        let _ = self.stream.shutdown(Shutdown::Both);
        Ok(())
    }
}

impl TcpStack for StdStack {
    type Socket = StdSocket;

    fn resolve(&mut self, hostname: &str) -> Result<IpAddr, Error> {
        (hostname, 0u16)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .map(|addr| addr.ip())
            .ok_or(Error::DnsError)
    }

    fn open(&mut self, remote: SocketAddr) -> Result<StdSocket, Error> {
        TcpStream::connect(remote)
            .map(|stream| StdSocket { stream })
            .map_err(|_| Error::ConnectionRefused)
    }
}

#[test]
fn loopback_get_end_to_end() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let server = thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut req = [0u8; 1024];
        let n = conn.read(&mut req).unwrap();
        let request = String::from_utf8_lossy(&req[..n]).into_owned();

        // Split the response so the client sees at least two receives.
        conn.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 12\r\n\r\nhello ")
            .unwrap();
        conn.flush().unwrap();
        thread::sleep(Duration::from_millis(50));
        conn.write_all(b"device").unwrap();
        request
    });

    let mut client = Client::new(StdStack);
    let mut rec = Recorder::default();
    let url = format!("http://127.0.0.1:{port}/greeting");

    assert!(client.get(&url, &mut rec));
    assert_eq!(rec.body, b"hello device");
    assert_eq!(rec.completions, 1);

    let request = server.join().unwrap();
    assert!(request.starts_with("GET /greeting HTTP/1.1\r\n"));
    assert!(request.contains("Host: 127.0.0.1"));
}
