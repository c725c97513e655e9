//! # vboxweb – SOAP transport
//!
//! Minimal SOAP 1.1 client for the VirtualBox web service (`vboxwebsrv`).
//! Every remote operation goes through [`SoapClient::call`]:
//!
//! - **envelope** — request encoding and fault-or-content response decoding
//! - **fault** — SOAP `Fault` parsing, VirtualBox fault details
//! - **result_code** — COM / VirtualBox result code names
//! - **transport** — HTTP POST dispatch (TLS, timeouts, Basic auth)
//! - **types** — client configuration
//! - **error** — crate error type

pub mod envelope;
pub mod error;
pub mod fault;
pub mod result_code;
pub mod transport;
pub mod types;

pub use envelope::{decode_response, encode_request, SoapRequest, NS_SOAP_ENV, NS_VBOX};
pub use error::{SoapError, SoapResult};
pub use fault::{FaultDetail, SoapFault};
pub use result_code::ResultCode;
pub use transport::{SoapClient, CONNECT_TIMEOUT};
pub use types::{BasicAuth, ClientConfig, DEFAULT_ENDPOINT};
