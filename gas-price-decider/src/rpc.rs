use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::{
    config::GasStationConfig,
    error::DeciderError,
    models::jsonrpc::{GasStationRespBody, JsonRpcRequest},
};

/// Minimal JSON-RPC client for a blockchain node
///
/// Each call is one HTTP POST carrying a JSON-RPC 2.0 body. The answer is
/// reduced to its `result` string; everything that prevents getting a
/// non-empty `result` is reported as a [`DeciderError`].
#[derive(Clone, Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    rpc_url: String,
    timeout: Duration,
}

impl RpcClient {
    /// Create a client for the configured endpoint
    ///
    /// No connection is made here; the endpoint is only contacted per call.
    pub fn new(config: &GasStationConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            rpc_url: config.rpc_url.clone(),
            timeout: config.timeout,
        }
    }

    /// Endpoint this client talks to
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Call `method` and return the raw `result` string
    pub async fn call<P: Serialize>(
        &self,
        method: &str,
        params: Option<P>,
    ) -> Result<String, DeciderError> {
        let request = JsonRpcRequest::outbound(method, params);
        debug!("Calling {} on {}", method, self.rpc_url);

        // `.json` sets the application/json content type
        let response = self
            .http
            .post(&self.rpc_url)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeciderError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeciderError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| DeciderError::Body(e.to_string()))?;

        let decoded: GasStationRespBody =
            serde_json::from_slice(&body).map_err(|e| DeciderError::Decode(e.to_string()))?;

        match decoded.result.as_deref() {
            Some(result) if !result.is_empty() => {
                debug!("{} answered {}", method, result);
                Ok(result.to_string())
            }
            _ => Err(match decoded.error_detail() {
                Some((code, message)) => DeciderError::Rpc { code, message },
                None => DeciderError::EmptyResult,
            }),
        }
    }
}
