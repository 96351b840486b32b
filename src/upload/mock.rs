//! Recording transport for tests.
//!
//! Every request is recorded so tests can assert on headers, bodies and the
//! number of network calls made.

use std::collections::VecDeque;
use std::sync::Mutex;

use serde_json::Value;
use tracing::trace;

use super::transport::{HttpReply, Transport, TransportError};

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub token: String,
    /// Parsed body, or `Value::Null` if it was not JSON.
    pub body: Value,
}

/// Transport returning scripted replies.
///
/// Replies are consumed in order; the last one is repeated once the queue
/// is down to a single entry.
#[derive(Debug)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<HttpReply, TransportError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockTransport {
    fn with_replies(replies: Vec<Result<HttpReply, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `status` and a JSON `body`.
    pub fn replying(status: u16, body: &Value) -> Self {
        Self::with_replies(vec![Ok(HttpReply::new(status, body.to_string()))])
    }

    /// Always answer with `status` and a raw text body.
    pub fn replying_text(status: u16, body: &str) -> Self {
        Self::with_replies(vec![Ok(HttpReply::new(status, body))])
    }

    /// Always fail before any response arrives.
    pub fn failing(error: TransportError) -> Self {
        Self::with_replies(vec![Err(error)])
    }

    /// Number of requests sent.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn post_json(
        &self,
        url: &str,
        token: &str,
        body: Vec<u8>,
    ) -> Result<HttpReply, TransportError> {
        trace!(url, "Mock POST");
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            token: token.to_string(),
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });

        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Request("no scripted reply".into())))
        }
    }
}
