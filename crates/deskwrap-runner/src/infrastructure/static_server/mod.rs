//! Loopback static file server: accept loop and per-connection tasks.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the loopback interface with an OS-assigned
//!    port, and reporting the port that was actually bound.
//! 2. Accepting connections from the embedded browser view.
//! 3. Reading HTTP/1.x request heads, answering each one from the
//!    [`StaticSite`], and reusing the connection while the client allows it.
//! 4. Stopping the accept loop when the owning [`ServerHandle`] is shut down
//!    or dropped.
//!
//! The server lives exactly as long as its [`ServerHandle`].  The launch
//! sequence keeps the handle for the whole lifetime of the window.

mod site;

pub use site::{StaticSite, INDEX_FILE};

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use deskwrap_core::{EntryDocument, ResolvedAddress};
use thiserror::Error;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::domain::ServerConfig;
use crate::infrastructure::http::{Body, Method, Reply, Request, RequestError, StatusCode};

/// How often the accept loop re-checks the running flag when idle.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

/// After the final response, unread input is discarded for at most this long
/// (and at most [`LINGER_BYTES`]) so the peer sees a clean close instead of a
/// reset.
const LINGER: Duration = Duration::from_millis(250);
const LINGER_BYTES: u64 = 64 * 1024;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors that prevent the local content server from starting.
///
/// All of them are fatal for a local target: without a server there is
/// nothing for the window to show.
#[derive(Debug, Error)]
pub enum ServeError {
    /// The listener could not be bound.
    #[error("failed to bind local content server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The bound port could not be queried.
    #[error("failed to read local content server address: {0}")]
    LocalAddr(#[source] io::Error),

    /// The serving root does not exist or is not a directory.
    #[error("serving root is not a directory: {}", .0.display())]
    MissingRoot(PathBuf),
}

// ── Handle ────────────────────────────────────────────────────────────────────

/// Owner of a running local content server.
///
/// Dropping the handle stops the accept loop.  Connections already in flight
/// finish their current response.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    address: ResolvedAddress,
    running: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl ServerHandle {
    /// The address the browser view should navigate to,
    /// `http://localhost:<port>`.
    pub fn address(&self) -> &ResolvedAddress {
        &self.address
    }

    /// The OS-assigned port.
    pub fn port(&self) -> u16 {
        self.local_addr.port()
    }

    /// The socket address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Asks the accept loop to stop.  Returns immediately.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Stops the accept loop and waits for it to exit.
    pub async fn stopped(mut self) {
        self.shutdown();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("local content server task ended abnormally: {e}");
            }
        }
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

/// Serves the files under a directory to the embedded browser view.
pub struct LocalContentServer;

impl LocalContentServer {
    /// Binds the listener and spawns the accept loop.
    ///
    /// Must be called from within a Tokio runtime.  The returned handle
    /// already knows the bound port, so the address can be handed to the
    /// browser view straight away.
    ///
    /// # Parameters
    ///
    /// - `config` – Bind address, port, and per-connection limits.
    /// - `root`   – Directory whose contents are served at `/`.
    /// - `entry`  – Document that `/` redirects to, when it is not the root
    ///   `index.html`.
    ///
    /// # Errors
    ///
    /// - [`ServeError::MissingRoot`] if `root` is not a directory.
    /// - [`ServeError::Bind`] if the listener cannot be bound.
    /// - [`ServeError::LocalAddr`] if the bound port cannot be queried.
    pub async fn start(
        config: &ServerConfig,
        root: PathBuf,
        entry: Option<EntryDocument>,
    ) -> Result<ServerHandle, ServeError> {
        match tokio::fs::metadata(&root).await {
            Ok(m) if m.is_dir() => {}
            _ => return Err(ServeError::MissingRoot(root)),
        }

        let bind_addr = SocketAddr::new(config.bind_ip, config.port);
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: bind_addr,
                source,
            })?;
        let local_addr = listener.local_addr().map_err(ServeError::LocalAddr)?;
        let address = ResolvedAddress::local(local_addr.port());

        info!("local server started at: {address}");
        debug!("serving {} on {local_addr}", root.display());

        let running = Arc::new(AtomicBool::new(true));
        let site = Arc::new(StaticSite::new(root, entry));
        let task = tokio::spawn(accept_loop(
            listener,
            site,
            config.clone(),
            Arc::clone(&running),
        ));

        Ok(ServerHandle {
            local_addr,
            address,
            running,
            task: Some(task),
        })
    }
}

/// Accepts connections until `running` is cleared.
async fn accept_loop(
    listener: TcpListener,
    site: Arc<StaticSite>,
    config: ServerConfig,
    running: Arc<AtomicBool>,
) {
    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("local content server stopping");
            break;
        }

        // Bounded wait so the running flag is observed even with no traffic.
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("connection from {peer_addr}");
                let site = Arc::clone(&site);
                let config = Arc::clone(&config);
                tokio::spawn(async move {
                    handle_connection(stream, peer_addr, site, config).await;
                });
            }
            Ok(Err(e)) => {
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }
}

// ── Per-connection handler ────────────────────────────────────────────────────

async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    site: Arc<StaticSite>,
    config: Arc<ServerConfig>,
) {
    match serve_connection(stream, peer_addr, &site, &config).await {
        Ok(()) => debug!("connection {peer_addr} closed"),
        Err(e) => warn!("connection {peer_addr} closed with error: {e:#}"),
    }
}

/// Answers requests on one connection until the client closes it, goes idle
/// past the keep-alive timeout, or sends something that forces a close.
async fn serve_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    site: &StaticSite,
    config: &ServerConfig,
) -> anyhow::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    loop {
        let head = match timeout(
            config.keep_alive_timeout,
            read_head(&mut reader, config.max_head_bytes),
        )
        .await
        {
            Err(_) => return Ok(()),
            Ok(result) => result.with_context(|| format!("reading request from {peer_addr}"))?,
        };

        let head = match head {
            HeadRead::Closed => return Ok(()),
            HeadRead::TooLarge => {
                let reply = Reply::text(
                    StatusCode::RequestHeaderFieldsTooLarge,
                    "431 Request Header Fields Too Large",
                );
                return close_with(&mut reader, &mut write_half, reply).await;
            }
            HeadRead::Head(bytes) => bytes,
        };

        let request = match std::str::from_utf8(&head)
            .map_err(|_| RequestError::MalformedRequestLine)
            .and_then(Request::parse)
        {
            Ok(request) => request,
            Err(RequestError::UnsupportedVersion(v)) => {
                debug!("{peer_addr}: unsupported version {v}");
                let reply = Reply::text(
                    StatusCode::HttpVersionNotSupported,
                    "505 HTTP Version Not Supported",
                );
                return close_with(&mut reader, &mut write_half, reply).await;
            }
            Err(e) => {
                debug!("{peer_addr}: bad request: {e}");
                return close_with(&mut reader, &mut write_half, Reply::bad_request()).await;
            }
        };

        let keep_alive = request.wants_keep_alive() && !request.has_body();
        let mut reply = site.respond(&request).await;
        debug!(
            "{peer_addr}: {} {} -> {}",
            request.method.as_str(),
            request.path,
            reply.head.status.code()
        );
        if !keep_alive {
            reply.head.push_header("Connection", "close");
        }

        write_reply(&mut write_half, reply, request.method == Method::Head)
            .await
            .with_context(|| format!("writing response to {peer_addr}"))?;

        if !keep_alive {
            write_half.shutdown().await?;
            linger(&mut reader).await;
            return Ok(());
        }
    }
}

/// Outcome of reading one request head.
#[derive(Debug, PartialEq, Eq)]
enum HeadRead {
    /// The bytes up to and including the blank line.
    Head(Vec<u8>),
    /// The peer closed the connection before a complete head arrived.
    Closed,
    /// The head exceeded the configured limit.
    TooLarge,
}

/// Reads a request head of at most `limit` bytes.  Blank lines before the
/// request line are skipped.
async fn read_head<R>(reader: &mut R, limit: usize) -> io::Result<HeadRead>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        let remaining = limit.saturating_sub(buf.len()) as u64;
        if remaining == 0 {
            return Ok(HeadRead::TooLarge);
        }

        let line_start = buf.len();
        let n = (&mut *reader)
            .take(remaining)
            .read_until(b'\n', &mut buf)
            .await?;

        if !buf.ends_with(b"\n") {
            return Ok(if n > 0 && buf.len() >= limit {
                HeadRead::TooLarge
            } else {
                HeadRead::Closed
            });
        }

        let line = &buf[line_start..];
        let blank = line == b"\r\n" || line == b"\n";
        if blank && line_start == 0 {
            buf.clear();
            continue;
        }
        if blank {
            return Ok(HeadRead::Head(buf));
        }
    }
}

async fn write_reply<W>(writer: &mut W, reply: Reply, head_only: bool) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(&reply.head.encode()).await?;
    if !head_only {
        match reply.body {
            Body::Empty => {}
            Body::Bytes(bytes) => writer.write_all(&bytes).await?,
            Body::File { file, len } => {
                let copied = tokio::io::copy(&mut file.take(len), &mut *writer).await?;
                if copied != len {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("file shrank while sending: {copied} of {len} bytes"),
                    ));
                }
            }
        }
    }
    writer.flush().await
}

/// Writes an error reply and ends the connection.
async fn close_with<R, W>(reader: &mut R, writer: &mut W, mut reply: Reply) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    reply.head.push_header("Connection", "close");
    write_reply(writer, reply, false).await?;
    writer.shutdown().await?;
    linger(reader).await;
    Ok(())
}

/// Discards whatever the peer still sends, until EOF or the linger bounds.
async fn linger<R>(reader: &mut R)
where
    R: AsyncRead + Unpin,
{
    let mut discard = (&mut *reader).take(LINGER_BYTES);
    let _ = timeout(LINGER, tokio::io::copy(&mut discard, &mut tokio::io::sink())).await;
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScratchDir;

    fn test_config() -> ServerConfig {
        ServerConfig {
            keep_alive_timeout: Duration::from_millis(500),
            max_head_bytes: 1024,
            ..ServerConfig::default()
        }
    }

    /// Sends `request` on a fresh connection and reads until the server
    /// closes it.
    async fn exchange(handle: &ServerHandle, request: &str) -> String {
        let mut stream = TcpStream::connect(handle.local_addr()).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();
        String::from_utf8_lossy(&out).into_owned()
    }

    // ── read_head ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_read_head_stops_at_blank_line() {
        let mut input: &[u8] = b"GET / HTTP/1.1\r\nHost: x\r\n\r\nGET /next";
        let head = read_head(&mut input, 1024).await.unwrap();
        assert_eq!(head, HeadRead::Head(b"GET / HTTP/1.1\r\nHost: x\r\n\r\n".to_vec()));
        assert_eq!(input, b"GET /next");
    }

    #[tokio::test]
    async fn test_read_head_skips_leading_blank_lines() {
        let mut input: &[u8] = b"\r\nGET / HTTP/1.1\r\n\r\n";
        let head = read_head(&mut input, 1024).await.unwrap();
        assert_eq!(head, HeadRead::Head(b"GET / HTTP/1.1\r\n\r\n".to_vec()));
    }

    #[tokio::test]
    async fn test_read_head_reports_eof() {
        let mut empty: &[u8] = b"";
        let mut partial: &[u8] = b"GET / HTTP/1.1\r\nHost";
        assert_eq!(read_head(&mut empty, 1024).await.unwrap(), HeadRead::Closed);
        assert_eq!(read_head(&mut partial, 1024).await.unwrap(), HeadRead::Closed);
    }

    #[tokio::test]
    async fn test_read_head_enforces_limit() {
        let long = format!("GET /{} HTTP/1.1\r\n\r\n", "a".repeat(100));
        let mut input = long.as_bytes();
        assert_eq!(read_head(&mut input, 32).await.unwrap(), HeadRead::TooLarge);
    }

    // ── start ─────────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_start_reports_localhost_address_with_bound_port() {
        // Arrange
        let dir = ScratchDir::new();
        dir.write("index.html", "<h1>hi</h1>");

        // Act
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .expect("start");

        // Assert
        assert_ne!(handle.port(), 0);
        assert!(handle.local_addr().ip().is_loopback());
        assert_eq!(
            handle.address().as_str(),
            format!("http://localhost:{}", handle.port())
        );
        assert_eq!(handle.address().local_port(), Some(handle.port()));
    }

    #[tokio::test]
    async fn test_start_rejects_missing_root() {
        let dir = ScratchDir::new();
        let missing = dir.path().join("absent");

        let result = LocalContentServer::start(&test_config(), missing.clone(), None).await;

        assert!(matches!(result, Err(ServeError::MissingRoot(p)) if p == missing));
    }

    #[tokio::test]
    async fn test_start_fails_when_port_is_taken() {
        // Arrange: occupy a port, then ask for exactly that port
        let dir = ScratchDir::new();
        let blocker = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let taken = blocker.local_addr().unwrap().port();
        let config = ServerConfig {
            port: taken,
            ..test_config()
        };

        // Act
        let result = LocalContentServer::start(&config, dir.path().to_path_buf(), None).await;

        // Assert
        assert!(matches!(result, Err(ServeError::Bind { .. })));
    }

    // ── connection handling ───────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_returns_file_and_closes_on_request() {
        let dir = ScratchDir::new();
        dir.write("index.html", "<h1>hi</h1>");
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();

        let response = exchange(
            &handle,
            "GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
        assert!(response.contains("Connection: close\r\n"));
        assert!(response.ends_with("\r\n\r\n<h1>hi</h1>"));
    }

    #[tokio::test]
    async fn test_head_sends_headers_only() {
        let dir = ScratchDir::new();
        dir.write("index.html", "<h1>hi</h1>");
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();

        let response = exchange(&handle, "HEAD /index.html HTTP/1.0\r\n\r\n").await;

        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(response.contains("Content-Length: 11\r\n"));
        assert!(response.ends_with("\r\n\r\n"));
    }

    #[tokio::test]
    async fn test_keep_alive_serves_two_requests_on_one_connection() {
        // Arrange
        let dir = ScratchDir::new();
        dir.write("a.txt", "A");
        dir.write("b.txt", "B");
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();

        // Act: pipeline two requests, the second asking to close
        let response = exchange(
            &handle,
            "GET /a.txt HTTP/1.1\r\n\r\nGET /b.txt HTTP/1.1\r\nConnection: close\r\n\r\n",
        )
        .await;

        // Assert
        assert_eq!(response.matches("HTTP/1.1 200 OK").count(), 2, "{response}");
        assert!(response.contains("\r\n\r\nA"));
        assert!(response.ends_with("\r\n\r\nB"));
    }

    #[tokio::test]
    async fn test_idle_keep_alive_connection_is_closed_after_timeout() {
        // Arrange
        let dir = ScratchDir::new();
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();
        let mut stream = TcpStream::connect(handle.local_addr()).await.unwrap();

        // Act: send nothing and wait for the server to hang up
        let mut buf = [0u8; 16];
        let read = timeout(Duration::from_secs(3), stream.read(&mut buf)).await;

        // Assert: EOF well before the outer timeout (idle limit is 500 ms)
        let n = read.expect("server kept the idle connection open").unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn test_garbage_request_gets_400() {
        let dir = ScratchDir::new();
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();

        let response = exchange(&handle, "NONSENSE\r\n\r\n").await;

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");
    }

    #[tokio::test]
    async fn test_http2_preface_version_gets_505() {
        let dir = ScratchDir::new();
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();

        let response = exchange(&handle, "GET / HTTP/2.0\r\n\r\n").await;

        assert!(response.starts_with("HTTP/1.1 505 "), "{response}");
    }

    #[tokio::test]
    async fn test_oversized_head_gets_431() {
        let dir = ScratchDir::new();
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();
        let request = format!("GET / HTTP/1.1\r\nX-Big: {}\r\n\r\n", "x".repeat(4096));

        let response = exchange(&handle, &request).await;

        assert!(response.starts_with("HTTP/1.1 431 "), "{response}");
    }

    #[tokio::test]
    async fn test_stopped_handle_refuses_new_connections() {
        // Arrange
        let dir = ScratchDir::new();
        let handle = LocalContentServer::start(&test_config(), dir.path().to_path_buf(), None)
            .await
            .unwrap();
        let addr = handle.local_addr();

        // Act
        handle.stopped().await;

        // Assert: the listener was dropped with the accept loop
        assert!(TcpStream::connect(addr).await.is_err());
    }
}
