use thiserror::Error;

/// Reasons a decider answered with its fallback instead of a live value
///
/// None of these ever reach the caller as an `Err`. They travel inside
/// [`crate::decider::Decision::Degraded`] next to the value that was used instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeciderError {
    /// Connection, DNS, TLS or timeout failure talking to the node
    #[error("RPC transport error: {0}")]
    Transport(String),

    /// The node answered with a non-success HTTP status
    #[error("RPC node returned HTTP status {0}")]
    Status(u16),

    /// The response body could not be read
    #[error("failed to read RPC response body: {0}")]
    Body(String),

    /// The response body was not the expected JSON
    #[error("failed to decode RPC response: {0}")]
    Decode(String),

    /// The node answered with a JSON-RPC error object and no result
    #[error("RPC node returned error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The response decoded but `result` was empty
    #[error("RPC response has an empty result")]
    EmptyResult,

    /// `result` was not an integer quantity
    #[error(transparent)]
    Parse(#[from] ParseQuantityError),

    /// The decider does not evaluate gas usage at all
    #[error("gas usage is not evaluated by this decider")]
    NotEvaluated,
}

/// Errors from parsing an integer quantity string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseQuantityError {
    #[error("empty quantity")]
    Empty,

    #[error("invalid digit in quantity {0:?}")]
    InvalidDigit(String),

    #[error("quantity {0:?} is out of the 64-bit range")]
    OutOfRange(String),
}

impl DeciderError {
    /// Stable short label, suitable for response headers
    pub fn kind(&self) -> &'static str {
        match self {
            DeciderError::Transport(_) => "transport",
            DeciderError::Status(_) => "status",
            DeciderError::Body(_) => "body",
            DeciderError::Decode(_) => "decode",
            DeciderError::Rpc { .. } => "rpc",
            DeciderError::EmptyResult => "empty_result",
            DeciderError::Parse(_) => "parse",
            DeciderError::NotEvaluated => "not_evaluated",
        }
    }
}
