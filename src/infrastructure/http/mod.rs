pub mod retry;

pub use retry::RetryPolicy;

use crate::error::{AppError, AppResult};
use std::time::Duration;

const USER_AGENT: &str = concat!("booktape/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for the vendor APIs
pub fn build_client(timeout_secs: u64) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))
}

/// Pass successful responses through, turn everything else into a categorized error
pub async fn ensure_success(
    service: &str,
    response: reqwest::Response,
) -> AppResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let err = AppError::from_http_status(service, status, &body);

    tracing::error!(
        service = service,
        status = status.as_u16(),
        error_kind = err.kind(),
        error = %err,
        "Remote API call failed"
    );

    Err(err)
}
