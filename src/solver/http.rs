//! HTTP transport for [`HybridSampler`].

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use super::{HybridRequest, HybridResponse, HybridSampler, SolverError};

/// Posts [`HybridRequest`]s as JSON to a solving endpoint with a bearer
/// token and reads back a [`HybridResponse`].
///
/// Status mapping: 401/403 become [`SolverError::Unauthorized`], 429
/// becomes [`SolverError::QuotaExceeded`], any other non-2xx status or
/// transport failure becomes [`SolverError::Unavailable`].
#[derive(Debug, Clone)]
pub struct HttpHybridSampler {
    endpoint: String,
    token: String,
    timeout: Duration,
    client: Client,
}

impl HttpHybridSampler {
    /// Creates a sampler; fails if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SolverError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SolverError::Unavailable(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            timeout,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl HybridSampler for HttpHybridSampler {
    fn submit(&self, request: &HybridRequest) -> Result<HybridResponse, SolverError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    SolverError::Timeout(self.timeout)
                } else {
                    SolverError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_status(status, body));
        }

        response
            .json::<HybridResponse>()
            .map_err(|e| SolverError::MalformedResponse(e.to_string()))
    }
}

fn classify_status(status: StatusCode, body: String) -> SolverError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SolverError::Unauthorized(body),
        StatusCode::TOO_MANY_REQUESTS => SolverError::QuotaExceeded(body),
        _ => SolverError::Unavailable(format!("status {}: {}", status.as_u16(), body)),
    }
}
