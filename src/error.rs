//! Error types for the seatmap
//!
//! Only a failed diagram load ever reaches the host. Lookup failures are
//! absorbed by the binder and treated as "seat not on this diagram".

use thiserror::Error;

/// Failure to obtain the diagram markup. Terminal for the source URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("Failed to load seatmap diagram from {url}: HTTP {status}")]
    Status { url: String, status: u16 },

    /// The request never completed
    #[error("Failed to load seatmap diagram from {url}: {message}")]
    Network { url: String, message: String },

    /// The body arrived but could not be injected as SVG
    #[error("Failed to load seatmap diagram from {url}: invalid markup ({message})")]
    Markup { url: String, message: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Status { url, .. } => url,
            FetchError::Network { url, .. } => url,
            FetchError::Markup { url, .. } => url,
        }
    }
}

/// A lookup expression could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("Malformed lookup expression '{expression}': {reason}")]
    Malformed { expression: String, reason: String },
}

/// Markup handed to a diagram host could not be injected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkupError {
    #[error("XML parsing failed: {0}")]
    InvalidXml(String),

    #[error("Diagram has no <svg> root, found <{0}>")]
    NotSvg(String),
}
