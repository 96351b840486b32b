//! Integration tests for the upload client against a mock transport and a
//! local HTTP listener.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use serde_json::{Value, json};

use hwmd::collector::mock::MockRunner;
use hwmd::snapshot::{Snapshot, SnapshotBuilder};
use hwmd::upload::mock::MockTransport;
use hwmd::upload::{
    ConnectivityProbe, HttpTransport, SkipReason, TransportError, UploadClient, UploadOutcome,
};

use crate::common::fixtures::{created_body, fixed_session, validation_error_body};
use crate::common::init_test_logging;

const URL: &str = "https://inventory.example.org/api/inventory/";
const TOKEN: &str = "dXNlcjpzZWNyZXQ=";

fn snapshot() -> Snapshot {
    SnapshotBuilder::new(MockRunner::healthy()).build(&fixed_session())
}

fn client(transport: &MockTransport) -> UploadClient<&MockTransport> {
    UploadClient::new(transport, Some(URL.into()), Some(TOKEN.into())).with_probe(None)
}

#[test]
fn test_created_surfaces_device_unmodified() {
    init_test_logging();
    let transport = MockTransport::replying(201, &created_body("O48N2"));
    let outcome = client(&transport).upload(&snapshot());

    let device = outcome.device().expect("uploaded");
    assert_eq!(device.dhid, "O48N2");
    assert_eq!(device.url, "https://inventory.example.org/devices/O48N2");
    assert_eq!(device.public_url, "https://inventory.example.org/public/devices/O48N2");
}

#[test]
fn test_request_carries_snapshot_and_token() {
    let transport = MockTransport::replying(201, &created_body("O48N2"));
    let snapshot = snapshot();
    client(&transport).upload(&snapshot);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, URL);
    assert_eq!(requests[0].token, TOKEN);
    assert_eq!(requests[0].body, serde_json::to_value(&snapshot).unwrap());
}

#[test]
fn test_unprocessable_yields_server_code() {
    let transport = MockTransport::replying(422, &validation_error_body(422));
    let outcome = client(&transport).upload(&snapshot());

    assert!(!outcome.is_success());
    assert!(outcome.was_attempted());
    assert_eq!(outcome.server_code(), Some(422));
    match outcome {
        UploadOutcome::Failed { error: Some(err), .. } => {
            assert_eq!(err.kind.as_deref(), Some("ValidationError"));
            assert!(err.message_text().contains("Missing data"));
        }
        other => panic!("Expected Failed with server error, got {other:?}"),
    }
}

#[test]
fn test_bad_request_is_rejected_without_retry() {
    let transport = MockTransport::replying(400, &validation_error_body(422));
    let outcome = client(&transport).upload(&snapshot());

    match &outcome {
        UploadOutcome::Rejected {
            http_status, body, ..
        } => {
            assert_eq!(*http_status, 400);
            assert!(body.contains("ValidationError"));
        }
        other => panic!("Expected Rejected, got {other:?}"),
    }
    assert_eq!(outcome.server_code(), Some(422));
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_missing_url_or_token_makes_no_request() {
    let transport = MockTransport::replying(201, &created_body("O48N2"));
    let snapshot = snapshot();

    for (url, token) in [
        (None, Some(TOKEN.to_string())),
        (Some(URL.to_string()), None),
        (Some(String::new()), Some(TOKEN.to_string())),
        (None, None),
    ] {
        let outcome = UploadClient::new(&transport, url, token)
            .with_probe(None)
            .upload(&snapshot);
        assert_eq!(
            outcome,
            UploadOutcome::Skipped {
                reason: SkipReason::MissingSettings
            }
        );
    }
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_transport_failure_is_an_outcome() {
    let transport = MockTransport::failing(TransportError::Timeout("after 60s".into()));
    let outcome = client(&transport).upload(&snapshot());

    match outcome {
        UploadOutcome::TransportError { message } => assert!(message.contains("after 60s")),
        other => panic!("Expected TransportError, got {other:?}"),
    }
}

#[test]
fn test_created_without_device_fields() {
    let transport = MockTransport::replying(201, &json!({"status": "ok"}));
    let outcome = client(&transport).upload(&snapshot());
    assert!(matches!(outcome, UploadOutcome::InvalidResponse { http_status: 201, .. }));
}

#[test]
fn test_html_error_page() {
    let transport = MockTransport::replying_text(503, "<html>Service Unavailable</html>");
    let outcome = client(&transport).upload(&snapshot());
    assert_eq!(outcome.http_status(), Some(503));
    assert_eq!(outcome.server_code(), None);
}

/// Request head (lines up to the blank line) and body seen by the listener.
struct ReceivedRequest {
    head: Vec<String>,
    body: Vec<u8>,
}

impl ReceivedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.head.iter().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim())
        })
    }
}

/// Accept one connection, record the request and answer with `status` and
/// a JSON `body`.
fn serve_once(
    listener: TcpListener,
    status: &'static str,
    body: Value,
) -> JoinHandle<ReceivedRequest> {
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);

        let mut head = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            head.push(line);
        }
        let mut request = ReceivedRequest { head, body: Vec::new() };
        let length: usize = request
            .header("content-length")
            .map_or(0, |v| v.parse().unwrap());
        request.body = vec![0; length];
        reader.read_exact(&mut request.body).unwrap();

        let payload = body.to_string();
        let reply = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
             content-length: {}\r\nconnection: close\r\n\r\n{payload}",
            payload.len()
        );
        let mut stream = reader.into_inner();
        stream.write_all(reply.as_bytes()).unwrap();
        stream.flush().unwrap();
        request
    })
}

#[test]
fn test_http_transport_posts_to_local_server() {
    init_test_logging();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/", listener.local_addr().unwrap());
    let server = serve_once(listener, "201 Created", created_body("O48N2"));

    // Nothing listens on a port just released, so the check fails fast
    let closed = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let check = ConnectivityProbe {
        addr: closed,
        timeout: Duration::from_millis(500),
    };

    let snapshot = snapshot();
    let outcome = UploadClient::new(HttpTransport::new().unwrap(), Some(url), Some(TOKEN.into()))
        .with_probe(Some(check))
        .upload(&snapshot);

    assert!(outcome.is_success(), "Expected Uploaded, got {outcome:?}");
    assert_eq!(outcome.device().unwrap().dhid, "O48N2");

    let request = server.join().unwrap();
    assert_eq!(request.head[0], "POST /api/ HTTP/1.1");
    assert_eq!(
        request.header("authorization"),
        Some(format!("Basic {TOKEN}").as_str())
    );
    assert_eq!(request.header("content-type"), Some("application/json"));
    let body: Value = serde_json::from_slice(&request.body).unwrap();
    assert_eq!(body, serde_json::to_value(&snapshot).unwrap());
}
