//! Error types for the SOAP transport.

use crate::fault::SoapFault;
use crate::result_code::ResultCode;
use thiserror::Error;

/// Everything that can go wrong during a single SOAP call.
#[derive(Debug, Error)]
pub enum SoapError {
    /// Client configuration rejected before any request was sent
    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
    /// Connection or transfer failure
    #[error("HTTP request failed: {0}")]
    Http(String),
    /// Connect or overall request timeout elapsed
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Non-success status whose body is not a SOAP envelope
    #[error("web service returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
    /// Server answered with a SOAP fault
    #[error("SOAP fault: {0}")]
    Fault(SoapFault),
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error("web service returned an empty response")]
    EmptyResponse,
}

impl SoapError {
    /// The SOAP fault carried by this error, if any.
    pub fn fault(&self) -> Option<&SoapFault> {
        match self {
            Self::Fault(f) => Some(f),
            _ => None,
        }
    }

    /// VirtualBox result code of a fault, if the server supplied one.
    pub fn result_code(&self) -> Option<ResultCode> {
        self.fault().and_then(SoapFault::result_code)
    }

    /// Whether the server reported an unknown or expired object reference.
    pub fn is_invalid_object(&self) -> bool {
        self.fault()
            .and_then(|f| f.detail.as_ref())
            .map(|d| d.kind == "InvalidObjectFault")
            .unwrap_or(false)
    }
}

impl From<reqwest::Error> for SoapError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() {
            Self::Http(format!("connection failed: {e}"))
        } else {
            Self::Http(e.to_string())
        }
    }
}

impl From<quick_xml::Error> for SoapError {
    fn from(e: quick_xml::Error) -> Self {
        Self::Decode(format!("XML error: {e}"))
    }
}

/// Convenience alias.
pub type SoapResult<T> = Result<T, SoapError>;
