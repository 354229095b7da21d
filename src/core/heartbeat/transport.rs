//! Transport session: TCP connection, optionally wrapped in TLS
//!
//! A [`Session`] owns the socket and, for HTTPS, the TLS connection state.
//! Everything acquired while opening a session is owned by a local value, so
//! any early return or unwind drops it; a fully opened session tears itself
//! down in `Drop`. Nothing is shared between sessions.
//!
//! Every blocking step is bounded by the session timeout: the connect call
//! uses `connect_timeout`, and read/write timeouts are installed on the socket
//! before the TLS handshake so the handshake, the request write and the
//! response read are each limited individually.

use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use super::error::HeartbeatError;

static LIVE_SOCKETS: AtomicUsize = AtomicUsize::new(0);

/// Number of sockets currently held by open or half-open sessions
///
/// Instrumentation for leak checks; it goes up when a TCP connection is
/// established and down when that socket is released.
pub fn live_sockets() -> usize {
    LIVE_SOCKETS.load(Ordering::SeqCst)
}

struct SocketToken;

impl SocketToken {
    fn acquire() -> Self {
        LIVE_SOCKETS.fetch_add(1, Ordering::SeqCst);
        SocketToken
    }
}

impl Drop for SocketToken {
    fn drop(&mut self) {
        LIVE_SOCKETS.fetch_sub(1, Ordering::SeqCst);
    }
}

enum Stream {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

/// Single-use byte stream to the heartbeat endpoint
pub struct Session {
    // Field order matters: the stream is dropped before the token.
    stream: Stream,
    peer: SocketAddr,
    _token: SocketToken,
}

impl Session {
    /// Resolve, connect and (if `tls`) complete the TLS handshake
    pub fn open(host: &str, port: u16, tls: bool, timeout: Duration) -> Result<Self, HeartbeatError> {
        let tls_config = if tls { Some(tls_client_config()?) } else { None };
        Self::open_with(host, port, tls_config, timeout)
    }

    /// Like [`Session::open`], with the TLS client config supplied by the caller
    pub(crate) fn open_with(
        host: &str,
        port: u16,
        tls_config: Option<Arc<ClientConfig>>,
        timeout: Duration,
    ) -> Result<Self, HeartbeatError> {
        let peer = resolve_ipv4(host, port)?;

        let tcp = TcpStream::connect_timeout(&peer, timeout).map_err(|source| {
            HeartbeatError::ConnectionFailure {
                addr: peer.to_string(),
                source,
            }
        })?;
        let token = SocketToken::acquire();

        tcp.set_read_timeout(Some(timeout))
            .and_then(|_| tcp.set_write_timeout(Some(timeout)))
            .map_err(|source| HeartbeatError::ConnectionFailure {
                addr: peer.to_string(),
                source,
            })?;

        let stream = match tls_config {
            Some(config) => Stream::Tls(Box::new(handshake(host, tcp, config)?)),
            None => Stream::Plain(tcp),
        };

        Ok(Self {
            stream,
            peer,
            _token: token,
        })
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_tls(&self) -> bool {
        matches!(self.stream, Stream::Tls(_))
    }
}

impl Read for Session {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.stream {
            Stream::Plain(tcp) => tcp.read(buf),
            Stream::Tls(tls) => tls.read(buf),
        }
    }
}

impl Write for Session {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.stream {
            Stream::Plain(tcp) => tcp.write(buf),
            Stream::Tls(tls) => tls.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.stream {
            Stream::Plain(tcp) => tcp.flush(),
            Stream::Tls(tls) => tls.flush(),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Best-effort close_notify; the socket itself closes when dropped.
        if let Stream::Tls(tls) = &mut self.stream {
            let tls = &mut **tls;
            tls.conn.send_close_notify();
            while tls.conn.wants_write() {
                match tls.conn.write_tls(&mut tls.sock) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
        }
    }
}

fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddr, HeartbeatError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|e| HeartbeatError::ResolutionFailure {
            host: host.to_string(),
            reason: e.to_string(),
        })?;

    addrs
        .find(SocketAddr::is_ipv4)
        .ok_or_else(|| HeartbeatError::ResolutionFailure {
            host: host.to_string(),
            reason: "no IPv4 address returned".to_string(),
        })
}

/// Client config with the bundled Mozilla roots and default cipher suites
fn tls_client_config() -> Result<Arc<ClientConfig>, HeartbeatError> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| HeartbeatError::TlsSetup(e.to_string()))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(Arc::new(config))
}

fn handshake(
    host: &str,
    mut tcp: TcpStream,
    config: Arc<ClientConfig>,
) -> Result<StreamOwned<ClientConnection, TcpStream>, HeartbeatError> {
    let server_name = ServerName::try_from(host)
        .map(|name| name.to_owned())
        .map_err(|e| HeartbeatError::TlsSetup(format!("invalid server name {host}: {e}")))?;

    let mut conn = ClientConnection::new(config, server_name)
        .map_err(|e| HeartbeatError::TlsSetup(e.to_string()))?;

    let handshake_failure = |reason: String| HeartbeatError::HandshakeFailure {
        host: host.to_string(),
        reason,
    };

    while conn.is_handshaking() {
        match conn.complete_io(&mut tcp) {
            Ok((0, 0)) => return Err(handshake_failure("connection closed by peer".to_string())),
            Ok(_) => {}
            Err(e) => return Err(handshake_failure(e.to_string())),
        }
    }

    Ok(StreamOwned::new(conn, tcp))
}
