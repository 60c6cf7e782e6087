//! Integration tests for the download module.
//!
//! These tests drive the full flow (connect, request, header, redirects, body)
//! against scripted HTTP servers on localhost.

mod support;

use std::time::Duration;

use http_get::download::{
    ChunkPolicy, DownloadConfig, DownloadError, Downloader, LengthCheck, ProgressReporter,
    ProgressUpdate,
};
use support::http_server::{Reply, TestServer, patterned_body};

/// Routes `/r/N` to a redirect to `/r/N-1`, and `/r/0` to a small body.
fn redirect_chain(path: &str) -> Reply {
    match path.strip_prefix("/r/").and_then(|n| n.parse::<u32>().ok()) {
        Some(0) => Reply::ok(b"end of chain"),
        Some(n) => Reply::redirect("302 Found", &format!("/r/{}", n - 1)),
        None => Reply::status("404 Not Found"),
    }
}

#[derive(Default)]
struct CountingReporter {
    updates: Vec<ProgressUpdate>,
    finished: bool,
}

impl ProgressReporter for CountingReporter {
    fn report(&mut self, update: &ProgressUpdate) {
        self.updates.push(update.clone());
    }

    fn finish(&mut self, _report: &http_get::DownloadReport) {
        self.finished = true;
    }
}

#[test]
fn test_download_full_flow_preserves_content() {
    let content = b"This is the complete file content for testing.\nLine 2.\nLine 3.";
    let Some(server) = TestServer::start(move |_| Reply::ok(content)) else {
        return;
    };

    let (body, report) = Downloader::new()
        .fetch_to_vec(&server.url("/document.txt"))
        .expect("download should succeed");

    assert_eq!(body, content);
    assert_eq!(report.bytes_received, content.len() as u64);
    assert_eq!(report.expected_bytes, Some(content.len() as u64));
    assert_eq!(report.length_check(), LengthCheck::Matched);
    assert_eq!(report.redirects, 0);
    assert_eq!(server.requests(), vec!["/document.txt".to_string()]);
}

#[test]
fn test_download_large_body_streams_byte_for_byte() {
    let content = patterned_body(3 * 1024 * 1024 + 17);
    let served = content.clone();
    let Some(server) = TestServer::start(move |_| Reply::ok(&served)) else {
        return;
    };

    let mut sink = Vec::new();
    let mut reporter = CountingReporter::default();
    let report = Downloader::new()
        .download(&server.url("/big.bin"), &mut sink, &mut reporter)
        .expect("download should succeed");

    assert_eq!(sink.len(), content.len());
    assert!(sink == content, "body differs from what the server sent");
    assert!(report.verify().is_ok());
    assert!(reporter.finished);
}

#[test]
fn test_download_without_content_length_reads_to_close() {
    let Some(server) = TestServer::start(|_| {
        Reply::Raw(b"HTTP/1.0 200 OK\r\nServer: test\r\n\r\nuntil close".to_vec())
    }) else {
        return;
    };

    let (body, report) = Downloader::new().fetch_to_vec(&server.url("/")).unwrap();

    assert_eq!(body, b"until close");
    assert_eq!(report.length_check(), LengthCheck::Unknown);
    assert!(report.verify().is_ok());
}

#[test]
fn test_download_empty_path_requests_root() {
    let Some(server) = TestServer::start(|_| Reply::ok(b"root")) else {
        return;
    };

    let (body, _) = Downloader::new()
        .fetch_to_vec(&format!("127.0.0.1:{}", server.port()))
        .unwrap();

    assert_eq!(body, b"root");
    assert_eq!(server.requests(), vec!["/".to_string()]);
}

#[test]
fn test_download_follows_ten_redirects() {
    let Some(server) = TestServer::start(redirect_chain) else {
        return;
    };

    let (body, report) = Downloader::new()
        .fetch_to_vec(&server.url("/r/10"))
        .expect("ten hops are within the limit");

    assert_eq!(body, b"end of chain");
    assert_eq!(report.redirects, 10);
    assert_eq!(report.final_url, server.url("/r/0"));
    assert_eq!(server.requests().len(), 11);
}

#[test]
fn test_download_eleventh_redirect_is_loop_error() {
    let Some(server) = TestServer::start(redirect_chain) else {
        return;
    };

    let result = Downloader::new().fetch_to_vec(&server.url("/r/11"));

    assert!(
        matches!(result, Err(DownloadError::RedirectLoop { max: 10, .. })),
        "expected RedirectLoop, got {result:?}"
    );
    // The eleventh redirect target is never requested.
    assert_eq!(server.requests().len(), 11);
}

#[test]
fn test_download_redirect_limit_is_configurable() {
    let Some(server) = TestServer::start(redirect_chain) else {
        return;
    };
    let downloader = Downloader::with_config(DownloadConfig::default().with_max_redirects(2));

    assert!(downloader.fetch_to_vec(&server.url("/r/2")).is_ok());
    assert!(matches!(
        downloader.fetch_to_vec(&server.url("/r/3")),
        Err(DownloadError::RedirectLoop { max: 2, .. })
    ));
}

#[test]
fn test_download_absolute_redirect_is_followed() {
    let Some(target) = TestServer::start(|_| Reply::ok(b"moved here")) else {
        return;
    };
    let location = target.url("/new");
    let Some(origin) =
        TestServer::start(move |_| Reply::redirect("301 Moved Permanently", &location))
    else {
        return;
    };

    let (body, report) = Downloader::new().fetch_to_vec(&origin.url("/old")).unwrap();

    assert_eq!(body, b"moved here");
    assert_eq!(report.redirects, 1);
    assert_eq!(target.requests(), vec!["/new".to_string()]);
}

#[test]
fn test_download_redirect_without_location_is_redirect_error() {
    let Some(server) = TestServer::start(|_| Reply::status("302 Found")) else {
        return;
    };

    let result = Downloader::new().fetch_to_vec(&server.url("/"));

    assert!(
        matches!(result, Err(DownloadError::Redirect { ref status, .. }) if status == "302 Found"),
        "expected Redirect error, got {result:?}"
    );
}

#[test]
fn test_download_not_found_is_http_status_error() {
    let Some(server) = TestServer::start(|_| Reply::status("404 Not Found")) else {
        return;
    };

    let result = Downloader::new().fetch_to_vec(&server.url("/missing"));

    match result {
        Err(DownloadError::HttpStatus { status, url }) => {
            assert_eq!(status, "404 Not Found");
            assert!(url.ends_with("/missing"), "url was {url}");
        }
        other => panic!("expected HttpStatus, got {other:?}"),
    }
}

#[test]
fn test_download_short_body_reports_length_mismatch() {
    let Some(server) = TestServer::start(|_| {
        let mut raw = b"HTTP/1.0 200 OK\r\nContent-Length: 100\r\n\r\n".to_vec();
        raw.extend_from_slice(&[b'x'; 90]);
        Reply::Raw(raw)
    }) else {
        return;
    };

    let (body, report) = Downloader::new().fetch_to_vec(&server.url("/short")).unwrap();

    assert_eq!(body.len(), 90);
    assert_eq!(
        report.length_check(),
        LengthCheck::Mismatch {
            expected: 100,
            actual: 90
        }
    );
    let err = report.verify().unwrap_err();
    assert!(err.is_length_mismatch());
}

#[test]
fn test_download_invalid_content_length_is_error() {
    let Some(server) = TestServer::start(|_| {
        Reply::Raw(b"HTTP/1.0 200 OK\r\nContent-Length: many\r\n\r\nbody".to_vec())
    }) else {
        return;
    };

    let result = Downloader::new().fetch_to_vec(&server.url("/"));

    assert!(matches!(
        result,
        Err(DownloadError::InvalidContentLength { ref value, .. }) if value == "many"
    ));
}

#[test]
fn test_download_header_stall_is_incomplete_header() {
    let Some(server) = TestServer::start(|_| Reply::Stall(Duration::from_secs(3))) else {
        return;
    };
    let downloader =
        Downloader::with_config(DownloadConfig::default().with_deadline(Duration::from_millis(500)));

    let result = downloader.fetch_to_vec(&server.url("/slow"));

    match result {
        Err(DownloadError::IncompleteHeader {
            received: 0,
            source: Some(source),
            ..
        }) => {
            assert!(source.is_timeout(), "expected timeout cause, got {source}");
        }
        other => panic!("expected IncompleteHeader after stall, got {other:?}"),
    }
}

#[test]
fn test_download_connection_closed_in_header_is_incomplete() {
    let Some(server) = TestServer::start(|_| Reply::Raw(b"HTTP/1.0 200 OK\r\nContent-Le".to_vec()))
    else {
        return;
    };

    let result = Downloader::new().fetch_to_vec(&server.url("/"));

    assert!(matches!(
        result,
        Err(DownloadError::IncompleteHeader {
            received: 27,
            source: None,
            ..
        })
    ));
}

#[test]
fn test_download_https_is_rejected_without_connecting() {
    let result = Downloader::new().fetch_to_vec("https://127.0.0.1:1/secure");

    assert!(matches!(
        result,
        Err(DownloadError::Protocol { ref protocol, .. }) if protocol == "https"
    ));
}

#[test]
fn test_download_with_inverted_or_zero_chunk_bounds_still_completes() {
    let Some(server) = TestServer::start(|_| Reply::ok(b"tiny")) else {
        return;
    };

    for policy in [
        ChunkPolicy {
            min: 4096,
            max: 1024,
            ..ChunkPolicy::default()
        },
        ChunkPolicy {
            min: 0,
            initial: 0,
            ..ChunkPolicy::default()
        },
    ] {
        let downloader =
            Downloader::with_config(DownloadConfig::default().with_chunk_policy(policy.clone()));
        let (body, report) = downloader
            .fetch_to_vec(&server.url("/"))
            .unwrap_or_else(|e| panic!("policy {policy:?} failed: {e}"));
        assert_eq!(body, b"tiny");
        assert_eq!(report.length_check(), LengthCheck::Matched);
    }
}
