//! HTTP client for the calculator REST API.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

use crate::api::{CalculatorClientV1, CalculatorError};
use crate::evaluator::Operator;
use crate::models::{Calculation, HealthStatus, HistoryEntry, OperationsInfo};

/// Request timeout used by [`CalculatorHttpClient::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Calculator client talking to a remote server over HTTP.
#[derive(Debug, Clone)]
pub struct CalculatorHttpClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CalculatorHttpClient {
    /// Create a client for the server at `base_url` with [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    /// Returns [`CalculatorError::Config`] if the URL is malformed or the
    /// underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, CalculatorError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom request timeout.
    ///
    /// # Errors
    /// See [`CalculatorHttpClient::new`].
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, CalculatorError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| CalculatorError::Config(e.to_string()))?;
        // Relative joins replace the last path segment unless it ends with '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CalculatorError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, CalculatorError> {
        self.base_url
            .join(path)
            .map_err(|e| CalculatorError::Config(e.to_string()))
    }

    async fn send<T: DeserializeOwned>(
        request: reqwest::RequestBuilder,
    ) -> Result<T, CalculatorError> {
        let response = request
            .send()
            .await
            .map_err(|e| CalculatorError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CalculatorError::Network(e.to_string()))?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "calculator API returned an error");
            return Err(match serde_json::from_slice::<ErrorBody>(&body) {
                Ok(err) => CalculatorError::Api {
                    status: status.as_u16(),
                    code: err.code,
                    message: err.error,
                },
                Err(_) => CalculatorError::Api {
                    status: status.as_u16(),
                    code: "HTTP_ERROR".to_owned(),
                    message: status.to_string(),
                },
            });
        }

        serde_json::from_slice(&body).map_err(|e| CalculatorError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CalculatorClientV1 for CalculatorHttpClient {
    async fn calculate(
        &self,
        a: Decimal,
        b: Decimal,
        op: Operator,
    ) -> Result<Calculation, CalculatorError> {
        // Operands travel as strings so no precision is lost on the way out.
        let payload = serde_json::json!({
            "a": a.to_string(),
            "b": b.to_string(),
            "operation": op.symbol(),
        });
        let request = self.http.post(self.endpoint("calculate")?).json(&payload);
        let response: CalculateResponse = Self::send(request).await?;
        let wire = response.calculation;
        Ok(Calculation {
            a: wire.a,
            b: wire.b,
            operator: wire.operation,
            result: wire.result,
        })
    }

    async fn history(&self, limit: Option<u32>) -> Result<Vec<HistoryEntry>, CalculatorError> {
        let mut request = self.http.get(self.endpoint("history")?);
        if let Some(limit) = limit {
            request = request.query(&[("limit", limit)]);
        }
        let response: HistoryResponse = Self::send(request).await?;
        Ok(response
            .history
            .into_iter()
            .map(|e| HistoryEntry {
                id: e.id,
                calculation: e.calculation,
                result: e.result,
                timestamp: e.timestamp,
            })
            .collect())
    }

    async fn clear_history(&self) -> Result<u64, CalculatorError> {
        let request = self.http.delete(self.endpoint("history")?);
        let response: ClearResponse = Self::send(request).await?;
        Ok(response.deleted)
    }

    async fn operations(&self) -> Result<OperationsInfo, CalculatorError> {
        let request = self.http.get(self.endpoint("operations")?);
        let response: OperationsResponse = Self::send(request).await?;
        Ok(OperationsInfo {
            operations: response.operations,
            description: response.description,
        })
    }

    async fn health(&self) -> Result<HealthStatus, CalculatorError> {
        let request = self.http.get(self.endpoint("health")?);
        let response: HealthResponse = Self::send(request).await?;
        Ok(HealthStatus {
            status: response.status,
            timestamp: response.timestamp,
            version: response.version,
        })
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
    code: String,
}

#[derive(Deserialize)]
struct CalculateResponse {
    calculation: WireCalculation,
}

#[derive(Deserialize)]
struct WireCalculation {
    #[serde(with = "rust_decimal::serde::float")]
    a: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    b: Decimal,
    operation: Operator,
    #[serde(with = "rust_decimal::serde::float")]
    result: Decimal,
}

#[derive(Deserialize)]
struct HistoryResponse {
    history: Vec<WireHistoryEntry>,
}

#[derive(Deserialize)]
struct WireHistoryEntry {
    id: i64,
    calculation: String,
    #[serde(with = "rust_decimal::serde::float")]
    result: Decimal,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
}

#[derive(Deserialize)]
struct ClearResponse {
    deleted: u64,
}

#[derive(Deserialize)]
struct OperationsResponse {
    operations: Vec<Operator>,
    description: BTreeMap<String, String>,
}

#[derive(Deserialize)]
struct HealthResponse {
    status: String,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: OffsetDateTime,
    version: String,
}
