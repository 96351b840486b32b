//! Snapshot upload to the inventory server.
//!
//! The client makes at most one POST per snapshot and never retries. Every
//! result, including "not attempted", is an [`UploadOutcome`] variant; no
//! error escapes [`UploadClient::upload`].
//!
//! A reachability probe (TCP to a public DNS resolver) runs before the POST.
//! It is advisory: a failed probe is logged and the upload is attempted
//! anyway, since the endpoint may be reachable on a network without public
//! DNS.

pub mod mock;
mod response;
mod transport;

pub use response::{DeviceRecord, ServerError};
pub use transport::{
    HttpReply, HttpTransport, REQUEST_TIMEOUT, Transport, TransportError, canonical_reason,
};

use std::fmt;
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::logging::{Category, highlight};
use crate::snapshot::Snapshot;

/// Why no upload was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// `DH_URL` or `DH_TOKEN` is not configured.
    MissingSettings,
    /// Uploads were turned off for this run.
    Disabled,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingSettings => "URL or token not configured",
            Self::Disabled => "disabled for this run",
        })
    }
}

/// Result of an upload attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    /// No request was sent.
    Skipped { reason: SkipReason },
    /// `201 Created`.
    Uploaded { device: DeviceRecord },
    /// `400 Bad Request`.
    Rejected {
        http_status: u16,
        reason: String,
        body: String,
        error: Option<ServerError>,
    },
    /// Any other non-201 status.
    Failed {
        http_status: u16,
        error: Option<ServerError>,
        body: String,
    },
    /// `201` whose body lacks the device fields.
    InvalidResponse { http_status: u16, message: String },
    /// No HTTP response at all.
    TransportError { message: String },
}

impl UploadOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }

    /// Whether a request was sent.
    pub const fn was_attempted(&self) -> bool {
        !matches!(self, Self::Skipped { .. })
    }

    pub const fn device(&self) -> Option<&DeviceRecord> {
        match self {
            Self::Uploaded { device } => Some(device),
            _ => None,
        }
    }

    /// HTTP status of the response, if one arrived.
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Uploaded { .. } => Some(201),
            Self::Rejected { http_status, .. }
            | Self::Failed { http_status, .. }
            | Self::InvalidResponse { http_status, .. } => Some(*http_status),
            Self::Skipped { .. } | Self::TransportError { .. } => None,
        }
    }

    /// `code` from the server's error body.
    pub fn server_code(&self) -> Option<i64> {
        match self {
            Self::Rejected { error, .. } | Self::Failed { error, .. } => {
                error.as_ref().and_then(|e| e.code)
            }
            _ => None,
        }
    }
}

/// Classify an HTTP response to an upload.
pub fn classify_reply(reply: HttpReply) -> UploadOutcome {
    match reply.status {
        201 => match DeviceRecord::parse(&reply.body) {
            Ok(device) => UploadOutcome::Uploaded { device },
            Err(e) => UploadOutcome::InvalidResponse {
                http_status: 201,
                message: e.to_string(),
            },
        },
        400 => UploadOutcome::Rejected {
            http_status: 400,
            error: ServerError::parse(&reply.body),
            reason: reply.reason,
            body: reply.body,
        },
        status => UploadOutcome::Failed {
            http_status: status,
            error: ServerError::parse(&reply.body),
            body: reply.body,
        },
    }
}

/// TCP reachability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectivityProbe {
    pub addr: SocketAddr,
    pub timeout: Duration,
}

impl Default for ConnectivityProbe {
    /// Google public DNS over TCP, 3 second timeout.
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([8, 8, 8, 8], 53)),
            timeout: Duration::from_secs(3),
        }
    }
}

impl ConnectivityProbe {
    /// Open and drop a TCP connection; logs a warning on failure.
    pub fn check(&self) -> bool {
        match TcpStream::connect_timeout(&self.addr, self.timeout) {
            Ok(_) => {
                debug!(addr = %self.addr, "Internet connection available");
                true
            }
            Err(e) => {
                warn!("No Internet. {e}");
                debug!(addr = %self.addr, error = ?e, "Connectivity probe failed");
                false
            }
        }
    }
}

/// Posts snapshots to the configured endpoint.
pub struct UploadClient<T> {
    transport: T,
    url: Option<String>,
    token: Option<String>,
    probe: Option<ConnectivityProbe>,
}

impl<T: Transport> UploadClient<T> {
    pub fn new(transport: T, url: Option<String>, token: Option<String>) -> Self {
        Self {
            transport,
            url: url.filter(|u| !u.is_empty()),
            token: token.filter(|t| !t.is_empty()),
            probe: Some(ConnectivityProbe::default()),
        }
    }

    /// Replace or disable (`None`) the connectivity probe.
    pub fn with_probe(mut self, probe: Option<ConnectivityProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Upload `snapshot` once and report what happened.
    pub fn upload(&self, snapshot: &Snapshot) -> UploadOutcome {
        let (Some(url), Some(token)) = (self.url.as_deref(), self.token.as_deref()) else {
            warn!("We could not auto-upload the device.");
            warn!("Settings URL or TOKEN are empty.");
            warn!("You can manually upload the snapshot.");
            return UploadOutcome::Skipped {
                reason: SkipReason::MissingSettings,
            };
        };

        if let Some(probe) = &self.probe {
            probe.check();
        }

        let outcome = match serde_json::to_vec(snapshot) {
            Ok(body) => match self.transport.post_json(url, token, body) {
                Ok(reply) => classify_reply(reply),
                Err(e) => UploadOutcome::TransportError {
                    message: e.to_string(),
                },
            },
            Err(e) => UploadOutcome::TransportError {
                message: format!("Snapshot could not be serialized: {e}"),
            },
        };
        log_outcome(&outcome);
        outcome
    }
}

fn log_outcome(outcome: &UploadOutcome) {
    match outcome {
        UploadOutcome::Uploaded { device } => {
            info!("Snapshot JSON successfully uploaded.");
            highlight(Category::DeviceId, &device.dhid);
            highlight(Category::DeviceUrl, &device.url);
            highlight(Category::DevicePublicUrl, &device.public_url);
        }
        UploadOutcome::Rejected {
            http_status,
            reason,
            body,
            ..
        } => {
            error!("We could not auto-upload the device. {http_status} {reason}");
            error!("Response error: {body}");
        }
        UploadOutcome::Failed {
            http_status,
            error: Some(err),
            ..
        } => {
            warn!(
                http_status,
                "We could not auto-upload the device. {{{} {}}}",
                err.code.map_or_else(|| "?".to_string(), |c| c.to_string()),
                err.kind.as_deref().unwrap_or("?")
            );
            debug!("{}", err.message_text());
        }
        UploadOutcome::Failed {
            http_status,
            error: None,
            body,
        } => {
            warn!(http_status, "We could not auto-upload the device.");
            debug!("Response body: {body}");
        }
        UploadOutcome::InvalidResponse { message, .. } => {
            warn!("Upload accepted but the response could not be read.");
            debug!("Invalid upload response: {message}");
        }
        UploadOutcome::TransportError { message } => {
            warn!("We could not auto-upload the device.");
            warn!("You can manually upload the snapshot.");
            debug!("POST snapshot exception: {message}");
        }
        UploadOutcome::Skipped { .. } => {}
    }
}
