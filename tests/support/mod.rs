//! Test support: a scripted fake webkit_server.
//!
//! `FakeServer` binds a local TCP port and speaks the server side of the
//! wire protocol: it decodes command frames exactly as the real server does
//! (length prefixes authoritative, no escaping) and answers each command
//! from a queue of canned replies, capturing the raw decoded frames for
//! assertions.
//!
//! `fake_binary` writes a small shell script that stands in for the real
//! webkit_server binary: it prints the startup line and parks, so process
//! supervision and port discovery run the genuine code path.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Initialize tracing output for test runs, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .try_init()
        .ok();
}

/// One decoded command frame, as received on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedCommand {
    pub name: String,
    pub args: Vec<Vec<u8>>,
}

impl CapturedCommand {
    /// Arguments as UTF-8 strings, for assertion convenience.
    pub fn text_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| String::from_utf8_lossy(a).into_owned())
            .collect()
    }
}

/// A canned response: status line plus payload.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: String,
    pub payload: Vec<u8>,
}

impl Reply {
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "ok".to_string(),
            payload: payload.into(),
        }
    }

    pub fn error(payload: impl Into<Vec<u8>>) -> Self {
        Self {
            status: "error".to_string(),
            payload: payload.into(),
        }
    }
}

/// A scripted single-connection fake server.
pub struct FakeServer {
    listener: TcpListener,
    port: u16,
}

impl FakeServer {
    pub async fn bind() -> Result<Self> {
        init_logging();
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind fake server")?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Accepts one connection and answers each command from `replies`,
    /// falling back to empty-payload `ok` once the queue is exhausted.
    ///
    /// Resolves with the captured frames when the client disconnects.
    pub fn spawn(self, replies: Vec<Reply>) -> JoinHandle<Result<Vec<CapturedCommand>>> {
        tokio::spawn(async move {
            let (stream, _) = self.listener.accept().await.context("accept")?;
            serve_connection(stream, replies).await
        })
    }
}

async fn serve_connection(
    stream: TcpStream,
    replies: Vec<Reply>,
) -> Result<Vec<CapturedCommand>> {
    let mut stream = BufReader::new(stream);
    let mut replies = replies.into_iter();
    let mut captured = Vec::new();

    loop {
        let name = match read_line(&mut stream).await? {
            Some(line) => line,
            None => return Ok(captured),
        };

        let count: usize = read_line(&mut stream)
            .await?
            .context("argument count")?
            .parse()
            .context("parse argument count")?;

        let mut args = Vec::with_capacity(count);
        for _ in 0..count {
            let length: usize = read_line(&mut stream)
                .await?
                .context("argument length")?
                .parse()
                .context("parse argument length")?;
            let mut arg = vec![0u8; length];
            stream.read_exact(&mut arg).await.context("argument bytes")?;
            args.push(arg);
        }

        captured.push(CapturedCommand { name, args });

        let reply = replies.next().unwrap_or_else(|| Reply::ok(""));
        stream
            .write_all(format!("{}\n{}\n", reply.status, reply.payload.len()).as_bytes())
            .await?;
        stream.write_all(&reply.payload).await?;
        stream.flush().await?;
    }
}

async fn read_line(stream: &mut BufReader<TcpStream>) -> Result<Option<String>> {
    let mut line = String::new();
    let read = stream.read_line(&mut line).await?;
    if read == 0 {
        return Ok(None);
    }
    match line.strip_suffix('\n') {
        Some(stripped) => Ok(Some(stripped.to_string())),
        None => bail!("unterminated header line: {line:?}"),
    }
}

/// Writes an executable stand-in for webkit_server into `dir`.
///
/// The script prints the given startup line and then parks so the child
/// stays alive until the supervisor kills it.
#[cfg(unix)]
pub fn fake_binary(dir: &Path, startup_line: &str) -> Result<PathBuf> {
    use std::os::unix::fs::PermissionsExt;

    init_logging();
    let path = dir.join("webkit_server");
    let script = format!("#!/bin/sh\necho \"{startup_line}\"\nexec sleep 60\n");
    std::fs::write(&path, script).context("write fake binary")?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .context("chmod fake binary")?;
    Ok(path)
}

/// `fake_binary` for a server announcing `port`.
#[cfg(unix)]
pub fn fake_binary_for_port(dir: &Path, port: u16) -> Result<PathBuf> {
    fake_binary(dir, &format!("listening on port: {port}"))
}
