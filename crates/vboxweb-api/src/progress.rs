//! `IProgress`: asynchronous server-side operations.

use crate::error::{ApiError, ApiResult};
use crate::operations::*;
use log::{debug, warn};
use std::time::Duration;
use tokio::time::Instant;
use vboxweb_soap::ResultCode;

const MIN_WAIT_SLICE: Duration = Duration::from_millis(100);

managed_object! {
    /// Progress of a long-running server operation (VM start, power off,
    /// snapshot).
    Progress
}

managed_object! {
    /// `IVirtualBoxErrorInfo` attached to a failed progress.
    ErrorInfo
}

impl Progress {
    pub async fn completed(&self) -> ApiResult<bool> {
        let resp = self.client.call(&IProgressGetCompleted { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    pub async fn percent(&self) -> ApiResult<u32> {
        let resp = self.client.call(&IProgressGetPercent { this: self.this() }).await?;
        Ok(resp.returnval)
    }

    /// Only meaningful once [`completed`](Self::completed) is true.
    pub async fn result_code(&self) -> ApiResult<ResultCode> {
        let resp = self
            .client
            .call(&IProgressGetResultCode { this: self.this() })
            .await?;
        Ok(ResultCode(resp.returnval))
    }

    pub async fn description(&self) -> ApiResult<String> {
        let resp = self
            .client
            .call(&IProgressGetDescription { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }

    pub async fn error_info(&self) -> ApiResult<Option<ErrorInfo>> {
        let resp = self
            .client
            .call(&IProgressGetErrorInfo { this: self.this() })
            .await?;
        if resp.returnval.is_empty() {
            return Ok(None);
        }
        Ok(Some(ErrorInfo::new(self.client.clone(), resp.returnval)))
    }

    /// Block server-side for up to `timeout_ms` (`-1` = forever).
    pub async fn wait_for_completion(&self, timeout_ms: i32) -> ApiResult<()> {
        self.client
            .call(&IProgressWaitForCompletion {
                this: self.this(),
                timeout: timeout_ms,
            })
            .await?;
        Ok(())
    }

    /// Wait for completion and turn a failing result code into
    /// [`ApiError::Operation`].
    ///
    /// When the client has a request timeout, the server-side wait is split
    /// into slices shorter than that timeout and completion is polled between
    /// slices until `timeout` runs out.
    pub async fn wait(&self, timeout: Option<Duration>) -> ApiResult<()> {
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let slice = wait_slice(self.client.config().request_timeout_secs);

        loop {
            let remaining = deadline.map(|d| d.saturating_duration_since(Instant::now()));
            self.wait_for_completion(wait_millis(slice, remaining)).await?;
            if self.completed().await? {
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                let what = self
                    .description()
                    .await
                    .unwrap_or_else(|_| "operation".to_string());
                return Err(ApiError::Timeout(what));
            }
            debug!("progress {} still running", self.reference);
        }

        let code = self.result_code().await?;
        if code.is_success() {
            debug!("progress {} completed", self.reference);
            return Ok(());
        }

        let message = self.failure_text().await;
        Err(ApiError::Operation { code, message })
    }

    /// Best-effort human-readable failure reason.
    async fn failure_text(&self) -> String {
        match self.error_info().await {
            Ok(Some(info)) => {
                let text = info.text().await;
                if let Err(e) = info.release().await {
                    warn!("failed to release error info {}: {}", info.reference(), e);
                }
                match text {
                    Ok(t) if !t.is_empty() => return t,
                    Ok(_) => {}
                    Err(e) => warn!("failed to read error info text: {}", e),
                }
            }
            Ok(None) => {}
            Err(e) => warn!("failed to fetch error info: {}", e),
        }
        self.description()
            .await
            .map(|d| format!("{d} failed"))
            .unwrap_or_else(|_| "operation failed".to_string())
    }
}

/// Longest single `waitForCompletion` call that fits inside the HTTP
/// request timeout; `None` when requests never time out.
fn wait_slice(request_timeout_secs: Option<u64>) -> Option<Duration> {
    request_timeout_secs.map(|secs| (Duration::from_secs(secs) / 2).max(MIN_WAIT_SLICE))
}

/// Milliseconds for the next server-side wait; `-1` waits forever.
fn wait_millis(slice: Option<Duration>, remaining: Option<Duration>) -> i32 {
    let next = match (slice, remaining) {
        (Some(s), Some(r)) => Some(s.min(r)),
        (s, r) => s.or(r),
    };
    next.map(|d| d.as_millis().min(i32::MAX as u128) as i32)
        .unwrap_or(-1)
}

impl ErrorInfo {
    pub async fn text(&self) -> ApiResult<String> {
        let resp = self
            .client
            .call(&IVirtualBoxErrorInfoGetText { this: self.this() })
            .await?;
        Ok(resp.returnval)
    }
}
