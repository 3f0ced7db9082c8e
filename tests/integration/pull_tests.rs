//! Image pull tests against the fake daemon.

use std::sync::Arc;
use std::time::Duration;

use dockerdaemon::ErrorKind;
use test_case::test_case;
use tokio::sync::Notify;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::common::{
    Behavior, TEST_DEADLINE, client, init_tracing, start_tcp_daemon, unused_tcp_host,
};

const PROGRESS_FIRST: &str = "{\"status\":\"Pulling from library/redis\",\"id\":\"7.2\"}\n";
const PROGRESS_REST: &str = "{\"status\":\"Digest: sha256:0123\"}\n{\"status\":\"Status: Downloaded newer image\"}\n";

#[tokio::test]
async fn test_pull_waits_for_end_of_stream() {
    init_tracing();
    let release = Arc::new(Notify::new());
    let (host, log) = start_tcp_daemon(Behavior::Stream {
        first: PROGRESS_FIRST.to_string(),
        rest: PROGRESS_REST.to_string(),
        release: release.clone(),
    })
    .await;

    let client = client(&host, "1.24");
    let handle = tokio::spawn(async move {
        let cancel = CancellationToken::new();
        client.image_pull(&cancel, "library/redis", "7.2").await
    });

    // Status and first progress line are out; the pull must still be pending.
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!handle.is_finished(), "pull returned before the body was drained");
    assert_eq!(log.all().len(), 1);

    release.notify_one();

    let result = timeout(TEST_DEADLINE, handle).await.unwrap().unwrap();
    assert!(result.is_ok(), "pull failed: {:?}", result);
}

#[test_case("1.24", "/v1.24/images/create" ; "versioned")]
#[test_case("v1.24", "/v1.24/images/create" ; "leading v stripped")]
#[test_case("", "/images/create" ; "unversioned")]
#[tokio::test]
async fn test_pull_request_line(version: &str, expected_path: &str) {
    init_tracing();
    let (host, log) = start_tcp_daemon(Behavior::ok(PROGRESS_FIRST)).await;

    client(&host, version)
        .image_pull(&CancellationToken::new(), "library/redis", "7.2")
        .await
        .unwrap();

    let request = log.first();
    assert_eq!(
        request.request_line,
        format!(
            "POST {}?fromImage=localhost%3A5367%2Flibrary%2Fredis&tag=7.2 HTTP/1.1",
            expected_path
        )
    );
    assert!(request.has_header("host", "docker"));
    assert!(request.headers.iter().any(|h| h.starts_with("x-registry-auth:")));
}

#[tokio::test]
async fn test_pull_daemon_error() {
    init_tracing();
    let (host, _log) =
        start_tcp_daemon(Behavior::status(500, "{\"message\":\"no such image\"}")).await;

    let err = client(&host, "1.24")
        .image_pull(&CancellationToken::new(), "library/missing", "latest")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Daemon);
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.path(), Some("/images/create"));
    assert_eq!(err.message(), "no such image");
    assert!(err.is_retriable());
}

#[test_case(201 ; "created")]
#[test_case(204 ; "no content")]
#[test_case(404 ; "not found")]
#[tokio::test]
async fn test_pull_non_200_is_error(status: u16) {
    init_tracing();
    let (host, _log) = start_tcp_daemon(Behavior::status(status, "")).await;

    let err = client(&host, "1.24")
        .image_pull(&CancellationToken::new(), "library/redis", "7.2")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Daemon);
    assert_eq!(err.status(), Some(status));
}

#[tokio::test]
async fn test_pull_cancelled_while_waiting() {
    init_tracing();
    let (host, log) = start_tcp_daemon(Behavior::Hang).await;
    let client = client(&host, "1.24");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let err = timeout(TEST_DEADLINE, client.image_pull(&cancel, "library/redis", "7.2"))
        .await
        .unwrap()
        .unwrap_err();

    assert!(err.is_cancelled());
    assert!(!err.is_retriable());
    assert_eq!(log.all().len(), 1);
}

#[tokio::test]
async fn test_pull_cancelled_mid_stream() {
    init_tracing();
    let release = Arc::new(Notify::new());
    let (host, _log) = start_tcp_daemon(Behavior::Stream {
        first: PROGRESS_FIRST.to_string(),
        rest: PROGRESS_REST.to_string(),
        release,
    })
    .await;
    let client = client(&host, "1.24");

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let err = timeout(TEST_DEADLINE, client.image_pull(&cancel, "library/redis", "7.2"))
        .await
        .unwrap()
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
}

#[tokio::test]
async fn test_pull_truncated_body() {
    init_tracing();
    let (host, _log) = start_tcp_daemon(Behavior::Truncated).await;

    let err = timeout(
        TEST_DEADLINE,
        client(&host, "1.24").image_pull(&CancellationToken::new(), "library/redis", "7.2"),
    )
    .await
    .unwrap()
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResponseRead);
}

#[tokio::test]
async fn test_pull_truncated_error_body() {
    init_tracing();
    let (host, _log) = start_tcp_daemon(Behavior::TruncatedStatus(500)).await;

    let err = timeout(
        TEST_DEADLINE,
        client(&host, "1.24").image_pull(&CancellationToken::new(), "library/redis", "7.2"),
    )
    .await
    .unwrap()
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ResponseRead);
    assert!(err.status().is_none());
    assert_eq!(err.path(), Some("/images/create"));
}

#[tokio::test]
async fn test_pull_unreachable_daemon() {
    init_tracing();
    let host = unused_tcp_host().await;

    let err = timeout(
        TEST_DEADLINE,
        client(&host, "1.24").image_pull(&CancellationToken::new(), "library/redis", "7.2"),
    )
    .await
    .unwrap()
    .unwrap_err();

    assert!(err.kind().is_transport(), "unexpected kind {:?}", err.kind());
    assert!(err.is_retriable());
}

#[tokio::test]
async fn test_concurrent_pulls_share_client() {
    init_tracing();
    let (host, log) = start_tcp_daemon(Behavior::ok(PROGRESS_FIRST)).await;
    let client = client(&host, "1.24");

    let mut handles = Vec::new();
    for tag in ["6", "7", "7.2", "latest"] {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .image_pull(&CancellationToken::new(), "library/redis", tag)
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(log.all().len(), 4);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use crate::common::start_unix_daemon;

    #[tokio::test]
    async fn test_pull_over_unix_socket() {
        init_tracing();
        let release = Arc::new(Notify::new());
        let (host, log) = start_unix_daemon(Behavior::Stream {
            first: PROGRESS_FIRST.to_string(),
            rest: PROGRESS_REST.to_string(),
            release: release.clone(),
        })
        .await;

        let client = client(&host, "1.24");
        assert!(client.address().is_unix());

        let handle = tokio::spawn(async move {
            client
                .image_pull(&CancellationToken::new(), "library/redis", "7.2")
                .await
        });

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!handle.is_finished());
        release.notify_one();

        timeout(TEST_DEADLINE, handle).await.unwrap().unwrap().unwrap();

        let request = log.first();
        assert!(request.request_line.starts_with("POST /v1.24/images/create?"));
        assert!(request.has_header("host", "docker"));
    }

    #[tokio::test]
    async fn test_pull_missing_socket() {
        init_tracing();
        let path = std::env::temp_dir()
            .join(format!("dd-missing-{}.sock", uuid::Uuid::new_v4().simple()));
        let client = client(&format!("unix://{}", path.display()), "1.24");

        let err = timeout(
            TEST_DEADLINE,
            client.image_pull(&CancellationToken::new(), "library/redis", "7.2"),
        )
        .await
        .unwrap()
        .unwrap_err();

        assert!(err.kind().is_transport(), "unexpected kind {:?}", err.kind());
    }
}
