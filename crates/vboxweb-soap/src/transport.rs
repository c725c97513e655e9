//! SOAP-over-HTTP transport.
//!
//! One [`SoapClient::call`] is one POST: encode the envelope, send it, read
//! the whole body, decode fault-or-content. No retries.

use crate::envelope::{self, SoapRequest};
use crate::error::{SoapError, SoapResult};
use crate::types::ClientConfig;
use log::{debug, error, trace};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Fixed dial timeout for every connection to the web service.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

const CONTENT_TYPE_XML: &str = "text/xml; charset=\"utf-8\"";
const MAX_ERROR_BODY: usize = 512;

/// HTTP client bound to one web service endpoint.
#[derive(Debug)]
pub struct SoapClient {
    http: reqwest::Client,
    config: ClientConfig,
    request_counter: AtomicU64,
}

impl SoapClient {
    /// Build a client from config. Nothing is sent yet.
    pub fn new(config: ClientConfig) -> SoapResult<Self> {
        let url = url::Url::parse(&config.endpoint)
            .map_err(|e| SoapError::InvalidConfig(format!("endpoint {:?}: {e}", config.endpoint)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SoapError::InvalidConfig(format!(
                "endpoint scheme must be http or https, got {}",
                url.scheme()
            )));
        }

        let mut builder = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(config.user_agent.clone());

        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if config.insecure_skip_verify {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| SoapError::InvalidConfig(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            request_counter: AtomicU64::new(0),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Invoke one remote operation.
    pub async fn call<R: SoapRequest>(&self, request: &R) -> SoapResult<R::Response> {
        let envelope = envelope::encode_request(request)?;
        let (status, body) = self.send_raw(R::OPERATION, envelope).await?;
        Self::decode::<R::Response>(R::OPERATION, status, &body)
    }

    // ─── HTTP Layer ──────────────────────────────────────────────────

    /// POST a prepared envelope and return status and body text.
    pub async fn send_raw(&self, operation: &str, envelope: String) -> SoapResult<(StatusCode, String)> {
        let req_id = self.request_counter.fetch_add(1, Ordering::Relaxed) + 1;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE_XML));
        headers.insert("soapaction", HeaderValue::from_static("\"\""));

        debug!(
            "SOAP request #{} {} to {} ({} bytes)",
            req_id,
            operation,
            self.config.endpoint,
            envelope.len()
        );
        trace!("SOAP request #{} body:\n{}", req_id, envelope);

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .headers(headers)
            .body(envelope);
        if let Some(auth) = &self.config.basic_auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let resp = request.send().await.map_err(|e| {
            error!("SOAP request #{} {} failed: {}", req_id, operation, e);
            SoapError::from(e)
        })?;

        let status = resp.status();
        let body = resp.text().await?;

        trace!(
            "SOAP response #{}: status={}, body length={}\n{}",
            req_id,
            status,
            body.len(),
            body
        );

        Ok((status, body))
    }

    /// Faults win over the HTTP status. Any other body under a non-success
    /// status becomes [`SoapError::HttpStatus`], including a response
    /// envelope that would decode.
    fn decode<T: DeserializeOwned>(operation: &str, status: StatusCode, body: &str) -> SoapResult<T> {
        if body.trim().is_empty() {
            if status.is_success() {
                return Err(SoapError::EmptyResponse);
            }
            return Err(http_status(status, body));
        }

        match envelope::decode_response::<T>(body) {
            Ok(value) if status.is_success() => Ok(value),
            Ok(_) => Err(http_status(status, body)),
            Err(SoapError::Fault(fault)) => {
                debug!("{} returned fault: {}", operation, fault);
                Err(SoapError::Fault(fault))
            }
            Err(e) if status.is_success() => Err(e),
            Err(_) => Err(http_status(status, body)),
        }
    }
}

fn http_status(status: StatusCode, body: &str) -> SoapError {
    let mut body = body.trim().to_string();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
        body.push('…');
    }
    SoapError::HttpStatus {
        status: status.as_u16(),
        body,
    }
}
