//! Fetch a URL over plain HTTP and store the body in a local file.
//!
//! The host stands in for an embedded platform: `std::net` plays the role of
//! the device's TCP/IP stack, a file plays the role of a flash staging
//! region.
//!
//! ```text
//! host-demo http://example.com/image.bin image.bin
//! ```

use core::net::{IpAddr, SocketAddr};
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use libhttpc::network::application::http::{Client, Destination, download};
use libhttpc::network::error::Error;
use libhttpc::network::{TcpSocket, TcpStack};

struct HostStack;

struct HostSocket {
    stream: TcpStream,
}

impl TcpSocket for HostSocket {
    type Buffer = Vec<u8>;

    fn recv(&mut self, timeout_ms: u32) -> Result<Vec<u8>, Error> {
        self.stream
            .set_read_timeout(Some(Duration::from_millis(u64::from(timeout_ms))))
            .map_err(|_| Error::ReadError)?;
        let mut buf = [0u8; 1536];
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

impl TcpStack for HostStack {
    type Socket = HostSocket;

    fn resolve(&mut self, hostname: &str) -> Result<IpAddr, Error> {
        (hostname, 0u16)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .map(|addr| addr.ip())
            .ok_or(Error::DnsError)
    }

    fn open(&mut self, remote: SocketAddr) -> Result<HostSocket, Error> {
        TcpStream::connect(remote)
            .map(|stream| HostSocket { stream })
            .map_err(|_| Error::ConnectionRefused)
    }
}

struct FileDestination {
    path: PathBuf,
    file: Option<File>,
}

impl Destination for FileDestination {
    type Error = std::io::Error;

    fn open(&mut self) -> Result<(), Self::Error> {
        self.file = Some(File::create(&self.path)?);
        Ok(())
    }

    fn append(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        match self.file.as_mut() {
            Some(file) => file.write_all(data),
            None => Err(ErrorKind::NotFound.into()),
        }
    }

    fn finalize(&mut self) -> Result<(), Self::Error> {
        match self.file.take() {
            Some(file) => file.sync_all(),
            None => Err(ErrorKind::NotFound.into()),
        }
    }

    fn discard(&mut self) -> Result<(), Self::Error> {
        self.file = None;
        fs::remove_file(&self.path)
    }
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let (Some(url), Some(path)) = (args.next(), args.next()) else {
        eprintln!("usage: host-demo <http-url> <output-file>");
        return ExitCode::FAILURE;
    };

    let mut client = Client::new(HostStack);
    let mut dest = FileDestination {
        path: PathBuf::from(&path),
        file: None,
    };

    if download(&mut client, &url, &mut dest) {
        println!("saved {url} -> {path}");
        ExitCode::SUCCESS
    } else {
        eprintln!("download failed (status {})", client.status_code());
        ExitCode::FAILURE
    }
}
