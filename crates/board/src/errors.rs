//! Error types for the project board domain.
//!
//! [`BoardError`] is the single error type crossing the port boundary: the
//! transport adapter classifies every failure into one of its variants, and the
//! aggregator propagates it unchanged. Every variant is fatal to the fetch in
//! progress. Nothing in this workspace retries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{OrganizationName, ProjectNameFilter};

/// Errors that abort a board fetch.
///
/// Missing assignees, labels or timelines are *not* errors; they are normal
/// data variation and surface as empty values in the snapshot.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum BoardError {
    /// The request never produced a usable HTTP response, or the response had
    /// a non-success status.
    ///
    /// `status` is `None` for network-level failures (DNS, TLS, timeout).
    #[error("{}", transport_message(.status, .message))]
    Transport {
        /// HTTP status code, when a response was received.
        status: Option<u16>,
        /// Response body or underlying error text, verbatim.
        message: String,
    },

    /// The service answered successfully but embedded an error list in the
    /// payload.
    #[error("{}", .messages.join("\n"))]
    Service {
        /// Every error message in the order the service listed them.
        messages: Vec<String>,
    },

    /// No project matched the name filter in the organisation.
    #[error("Unable to find a project with name \"{project_name}\" in organisation \"{organization}\"")]
    ProjectNotFound {
        /// The organisation that was searched.
        organization: OrganizationName,
        /// The filter that matched nothing.
        project_name: ProjectNameFilter,
    },

    /// The response decoded but did not have the shape a page requires.
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// What was missing or inconsistent.
        message: String,
    },

    /// Operator-supplied configuration is invalid. Raised before any request.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}

impl BoardError {
    /// Creates a [`BoardError::Transport`] for a failure with no HTTP response.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a [`BoardError::Transport`] for a non-success HTTP status.
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: body.into(),
        }
    }

    /// Creates a [`BoardError::MalformedResponse`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Creates a [`BoardError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Short, stable label for the error kind; used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Service { .. } => "service",
            Self::ProjectNotFound { .. } => "project_not_found",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::Configuration { .. } => "configuration",
        }
    }
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Unexpected response code {code} - {message}"),
        None => format!("Request failed: {message}"),
    }
}
