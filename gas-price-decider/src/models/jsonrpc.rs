use alloy_primitives::U256;
use rust_decimal::{prelude::ToPrimitive, Decimal};
use serde::{Deserialize, Serialize};

/// JSON-RPC protocol version carried by every request and response
pub const JSONRPC_VERSION: &str = "2.0";

/// Request id sent with every outbound call to the node
pub const OUTBOUND_REQUEST_ID: &str = "1";

/// JSON-RPC 2.0 request structure
///
/// Used both for the calls sent to the node and for the requests our own
/// HTTP endpoints accept. `params` is left out of the wire form when absent.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcRequest<T> {
    /// JSON-RPC protocol version (should be "2.0")
    pub jsonrpc: String,

    /// Method name to call
    pub method: String,

    /// Method parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<T>,

    /// Request identifier
    pub id: serde_json::Value,
}

impl<T> JsonRpcRequest<T> {
    /// Build an outbound request to the node
    pub fn outbound(method: &str, params: Option<T>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.to_string(),
            params,
            id: serde_json::Value::String(OUTBOUND_REQUEST_ID.to_string()),
        }
    }
}

/// JSON-RPC 2.0 successful response
#[derive(Debug, Serialize)]
pub struct JsonRpcSuccess<T> {
    /// JSON-RPC protocol version (always "2.0")
    pub jsonrpc: String,

    /// Request identifier (matching the request)
    pub id: serde_json::Value,

    /// Method result
    pub result: T,
}

/// JSON-RPC 2.0 error response
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    /// JSON-RPC protocol version (always "2.0")
    pub jsonrpc: String,

    /// Request identifier (matching the request)
    pub id: serde_json::Value,

    /// Error details
    pub error: JsonRpcErrorDetail,
}

/// JSON-RPC 2.0 error detail
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcErrorDetail {
    /// Error code
    pub code: i64,

    /// Error message
    pub message: String,

    /// Additional error data (optional)
    pub data: Option<serde_json::Value>,
}

/// The single call object of an `eth_estimateGas` request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateGasCall {
    /// Sender address
    pub from: String,

    /// Recipient address
    pub to: String,

    /// Call data, accepted as either "data" or "input"; empty for plain transfers
    #[serde(default, alias = "input")]
    pub data: String,
}

/// Body of a node response
///
/// Only `result` matters. A missing or null `result` is treated the same
/// as an explicitly empty one. `error` is kept untyped so that an odd error
/// shape never spoils an otherwise usable `result`.
#[derive(Debug, Default, Deserialize)]
pub struct GasStationRespBody {
    #[serde(default)]
    pub result: Option<String>,

    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl GasStationRespBody {
    /// Code and message of the node's error, whatever shape it came in
    pub fn error_detail(&self) -> Option<(i64, String)> {
        let error = self.error.as_ref().filter(|e| !e.is_null())?;
        let code = error.get("code").and_then(serde_json::Value::as_i64).unwrap_or_default();
        let message = match error.get("message").and_then(serde_json::Value::as_str) {
            Some(message) => message.to_string(),
            None => error.to_string(),
        };
        Some((code, message))
    }
}

impl JsonRpcError {
    /// Create a new JSON-RPC invalid parameters error
    pub fn invalid_params(id: serde_json::Value, message: String) -> Self {
        Self::with_code(id, -32602, message)
    }

    /// Create a new JSON-RPC internal error
    pub fn internal_error(id: serde_json::Value, message: String) -> Self {
        Self::with_code(id, -32603, message)
    }

    fn with_code(id: serde_json::Value, code: i64, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error: JsonRpcErrorDetail {
                code,
                message,
                data: None,
            },
        }
    }
}

impl<T> JsonRpcSuccess<T> {
    /// Create a new JSON-RPC success response
    pub fn new(id: serde_json::Value, result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        }
    }
}

/// Format a `U256` value into a hexadecimal string prefixed with "0x".
pub fn format_hex_u256(value: U256) -> String {
    format!("0x{:x}", value)
}

/// Format a wei amount as a hex quantity, dropping any fractional part.
///
/// Returns `None` for negative amounts or amounts wider than 128 bits.
pub fn format_hex_decimal(value: Decimal) -> Option<String> {
    let wei = value.trunc().to_u128()?;
    Some(format_hex_u256(U256::from(wei)))
}
