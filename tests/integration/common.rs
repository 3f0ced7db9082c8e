//! Common test harness: a scriptable fake Docker daemon.

use std::sync::{Arc, Once};
use std::time::Duration;

use dockerdaemon::DockerClient;
use parking_lot::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Notify;

/// Registry used by every test client.
pub const TEST_REGISTRY: &str = "localhost:5367";

/// Upper bound for any single operation in these tests.
pub const TEST_DEADLINE: Duration = Duration::from_secs(10);

static TRACING: Once = Once::new();

/// Installs a test subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// How the fake daemon answers each request.
#[derive(Clone)]
pub enum Behavior {
    /// Fixed status and body, sent with a content length.
    Respond { status: u16, body: String },
    /// 200 with a chunked body: `first` immediately, then `rest` and the
    /// terminating chunk once `release` is notified.
    Stream {
        first: String,
        rest: String,
        release: Arc<Notify>,
    },
    /// 200 advertising more body bytes than are sent before closing.
    Truncated,
    /// Error status advertising more body bytes than are sent before closing.
    TruncatedStatus(u16),
    /// Reads the request and never answers.
    Hang,
}

impl Behavior {
    pub fn ok(body: &str) -> Self {
        Behavior::Respond {
            status: 200,
            body: body.to_string(),
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Behavior::Respond {
            status,
            body: body.to_string(),
        }
    }
}

/// A request as the fake daemon saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    /// Request line, e.g. `POST /v1.24/images/create?... HTTP/1.1`.
    pub request_line: String,
    /// Header lines, lowercased.
    pub headers: Vec<String>,
}

impl Recorded {
    #[allow(dead_code)]
    pub fn has_header(&self, name: &str, value: &str) -> bool {
        let expected = format!("{}: {}", name.to_lowercase(), value.to_lowercase());
        self.headers.iter().any(|h| *h == expected)
    }
}

/// Shared log of requests received by a fake daemon.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<Recorded>>>);

impl RequestLog {
    pub fn all(&self) -> Vec<Recorded> {
        self.0.lock().clone()
    }

    #[allow(dead_code)]
    pub fn first(&self) -> Recorded {
        self.all().into_iter().next().unwrap()
    }
}

/// Starts a fake daemon on a loopback TCP port.
///
/// Returns the `tcp://` host string and the request log.
pub async fn start_tcp_daemon(behavior: Behavior) -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log = RequestLog::default();

    let accept_log = log.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve(stream, behavior.clone(), accept_log.clone()));
        }
    });

    (format!("tcp://{}", addr), log)
}

/// Starts a fake daemon on a fresh Unix socket under the temp directory.
///
/// Returns the `unix://` host string and the request log.
#[cfg(unix)]
#[allow(dead_code)]
pub async fn start_unix_daemon(behavior: Behavior) -> (String, RequestLog) {
    let path = std::env::temp_dir().join(format!("dd-it-{}.sock", uuid::Uuid::new_v4().simple()));
    let listener = tokio::net::UnixListener::bind(&path).unwrap();
    let log = RequestLog::default();

    let accept_log = log.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve(stream, behavior.clone(), accept_log.clone()));
        }
    });

    (format!("unix://{}", path.display()), log)
}

/// Returns a `tcp://` address nothing is listening on.
#[allow(dead_code)]
pub async fn unused_tcp_host() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("tcp://{}", addr)
}

/// Builds a client for `host` with the test registry.
pub fn client(host: &str, version: &str) -> DockerClient {
    DockerClient::builder()
        .host(host)
        .registry(TEST_REGISTRY)
        .version(version)
        .build()
        .unwrap()
}

async fn serve<S>(mut stream: S, behavior: Behavior, log: RequestLog)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let Some(recorded) = read_request(&mut stream).await else {
        return;
    };
    log.0.lock().push(recorded);

    let _ = respond(&mut stream, behavior).await;
}

async fn read_request<S>(stream: &mut S) -> Option<Recorded>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers: Vec<String> = lines.map(|l| l.to_lowercase()).collect();

    let content_length = headers
        .iter()
        .find_map(|h| h.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    let mut body_read = buf.len() - (head_end + 4);
    while body_read < content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        body_read += n;
    }

    Some(Recorded {
        request_line,
        headers,
    })
}

async fn respond<S>(stream: &mut S, behavior: Behavior) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    match behavior {
        Behavior::Respond { status, body } => {
            let response = format!(
                "HTTP/1.1 {} Fake\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await?;
        },
        Behavior::Stream {
            first,
            rest,
            release,
        } => {
            stream
                .write_all(
                    b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nTransfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
                )
                .await?;
            write_chunk(stream, &first).await?;
            stream.flush().await?;

            release.notified().await;

            write_chunk(stream, &rest).await?;
            stream.write_all(b"0\r\n\r\n").await?;
        },
        Behavior::Truncated => {
            stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\nConnection: close\r\n\r\n{\"status\":")
                .await?;
        },
        Behavior::TruncatedStatus(status) => {
            let head = format!(
                "HTTP/1.1 {} Fake\r\nContent-Length: 1000\r\nConnection: close\r\n\r\nno such",
                status
            );
            stream.write_all(head.as_bytes()).await?;
        },
        Behavior::Hang => {
            std::future::pending::<()>().await;
        },
    }
    stream.flush().await?;
    stream.shutdown().await
}

async fn write_chunk<S>(stream: &mut S, data: &str) -> std::io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    stream
        .write_all(format!("{:x}\r\n{}\r\n", data.len(), data).as_bytes())
        .await
}
