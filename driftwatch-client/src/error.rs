//! Error types for the GitLab client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to the GitLab API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection, TLS, timeout...)
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// API returned a status outside 200-299
    #[error("API error (status {status}) on {url}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// URL that was requested
        url: String,
        /// Response body, as returned by the API
        message: String,
    },

    /// A successful response body could not be decoded
    #[error("Failed to decode response from {url}: {message}{}", offset_hint(.offset))]
    Decode {
        /// URL that was requested
        url: String,
        /// Decoder message
        message: String,
        /// Byte offset of a JSON syntax error, when the body is not JSON at all
        offset: Option<usize>,
    },

    /// Every attempt of a request failed
    #[error("Request to {url} failed after {attempts} attempt(s): {last}")]
    RequestExhausted {
        /// URL that was requested
        url: String,
        /// Number of attempts made
        attempts: u32,
        /// Error observed on the final attempt
        #[source]
        last: Box<ClientError>,
    },

    /// The configured base URL or a derived endpoint URL is unusable
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Pagination did not terminate within the allowed number of pages
    #[error("Pagination of {url} exceeded {max_pages} page(s)")]
    PageLimit {
        /// URL of the last page requested
        url: String,
        /// Page bound that was hit
        max_pages: u32,
    },
}

fn offset_hint(offset: &Option<usize>) -> String {
    match offset {
        Some(offset) => format!(" (syntax error at byte offset {})", offset),
        None => String::new(),
    }
}

impl ClientError {
    /// Create a status error from status code, URL and body
    pub fn status(status: u16, url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
            message: message.into(),
        }
    }

    /// Build a decode error from a serde_json failure
    ///
    /// Syntax and EOF errors mean the body is not JSON at all, so the byte
    /// offset of the failure is attached. Shape mismatches carry no offset.
    pub fn decode(url: impl Into<String>, body: &str, err: &serde_json::Error) -> Self {
        let offset = if err.is_syntax() || err.is_eof() {
            Some(byte_offset(body, err.line(), err.column()))
        } else {
            None
        };

        Self::Decode {
            url: url.into(),
            message: err.to_string(),
            offset,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status: 404, .. } => true,
            Self::RequestExhausted { last, .. } => last.is_not_found(),
            _ => false,
        }
    }

    /// Status code observed on the failing response, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::RequestExhausted { last, .. } => last.status_code(),
            _ => None,
        }
    }
}

/// Translate serde_json's one-based line/column into a byte offset
fn byte_offset(body: &str, line: usize, column: usize) -> usize {
    let preceding: usize = body
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    preceding + column
}
