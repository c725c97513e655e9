//! Error types for the VirtualBox bindings.

use thiserror::Error;
use vboxweb_soap::{ResultCode, SoapError};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure or SOAP fault
    #[error(transparent)]
    Soap(#[from] SoapError),
    #[error("session not found: {0}")]
    SessionNotFound(String),
    #[error("maximum session limit ({0}) reached")]
    SessionLimit(usize),
    /// A progress object finished with a failure result code
    #[error("operation failed ({code}): {message}")]
    Operation { code: ResultCode, message: String },
    #[error("timed out waiting for {0}")]
    Timeout(String),
    /// The server answered with something the bindings cannot use
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl ApiError {
    /// Result code from a fault or failed progress.
    pub fn result_code(&self) -> Option<ResultCode> {
        match self {
            Self::Soap(e) => e.result_code(),
            Self::Operation { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl From<ApiError> for String {
    fn from(e: ApiError) -> String {
        e.to_string()
    }
}

/// Convenience alias.
pub type ApiResult<T> = Result<T, ApiError>;
