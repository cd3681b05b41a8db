use crate::{
    decider::{Decision, GasPriceDecider},
    models::jsonrpc::{
        format_hex_decimal, format_hex_u256, EstimateGasCall, JsonRpcError, JsonRpcRequest,
        JsonRpcSuccess, JSONRPC_VERSION,
    },
};
use actix_web::{post, web, HttpResponse};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Response header naming why a gas price answer is a fallback
pub const DEGRADED_HEADER: &str = "x-gas-price-degraded";

type SharedDecider = web::Data<Arc<dyn GasPriceDecider>>;

/// Reject requests that are not JSON-RPC 2.0 calls of `method`
fn validate_envelope<T>(request: &JsonRpcRequest<T>, method: &str) -> Result<(), HttpResponse> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Err(HttpResponse::BadRequest().json(JsonRpcError::invalid_params(
            request.id.clone(),
            "Invalid JSON-RPC version. Expected 2.0".to_string(),
        )));
    }
    if request.method != method {
        return Err(HttpResponse::BadRequest().json(JsonRpcError::invalid_params(
            request.id.clone(),
            format!("Unsupported method: {}", request.method),
        )));
    }
    Ok(())
}

/// Current gas price, answered as an `eth_gasPrice` JSON-RPC call
///
/// A fallback price is still a successful answer; the degradation reason is
/// reported in the [`DEGRADED_HEADER`] response header.
#[post("/api/v1/eth/gasPrice")]
async fn gas_price_jsonrpc(
    decider: SharedDecider,
    request: web::Json<JsonRpcRequest<serde_json::Value>>,
) -> HttpResponse {
    debug!("Received gas price request with id {}", request.id);
    if let Err(response) = validate_envelope(&*request, "eth_gasPrice") {
        return response;
    }

    let decision = decider.decide_gas_price().await;
    let Some(result) = format_hex_decimal(*decision.value()) else {
        error!("Gas price {} cannot be expressed as a quantity", decision.value());
        return HttpResponse::InternalServerError().json(JsonRpcError::internal_error(
            request.id.clone(),
            format!("Gas price {} is not a valid quantity", decision.value()),
        ));
    };

    let mut response = HttpResponse::Ok();
    if let Some(reason) = decision.reason() {
        warn!("Answering fallback gas price: {}", reason);
        response.insert_header((DEGRADED_HEADER, reason.kind()));
    } else {
        info!("Gas price decided: {}", decision.value());
    }
    response.json(JsonRpcSuccess::new(request.id.clone(), result))
}

/// Gas estimate for a call, answered as an `eth_estimateGas` JSON-RPC call
///
/// Unlike the gas price, an estimate that falls back to "unknown" is
/// reported as a JSON-RPC internal error.
#[post("/api/v1/eth/estimateGas")]
async fn estimate_gas_jsonrpc(
    decider: SharedDecider,
    request: web::Json<JsonRpcRequest<Vec<serde_json::Value>>>,
) -> HttpResponse {
    debug!("Received gas estimation request with id {}", request.id);
    if let Err(response) = validate_envelope(&*request, "eth_estimateGas") {
        return response;
    }

    let Some(raw_call) = request.params.as_ref().and_then(|params| params.first()) else {
        return HttpResponse::BadRequest().json(JsonRpcError::invalid_params(
            request.id.clone(),
            "Missing transaction parameters".to_string(),
        ));
    };

    let call: EstimateGasCall = match serde_json::from_value(raw_call.clone()) {
        Ok(call) => call,
        Err(e) => {
            return HttpResponse::BadRequest().json(JsonRpcError::invalid_params(
                request.id.clone(),
                format!("Invalid transaction parameters: {}", e),
            ));
        }
    };

    info!("Estimating gas: from {} to {}", call.from, call.to);

    match decider.decide_gas_used(&call.from, &call.to, &call.data).await {
        Decision::Resolved(gas) if !gas.is_negative() => {
            info!("Gas estimation successful: {}", gas);
            HttpResponse::Ok().json(JsonRpcSuccess::new(
                request.id.clone(),
                format_hex_u256(gas.into_raw()),
            ))
        }
        Decision::Resolved(gas) => {
            error!("Node returned a negative gas estimate: {}", gas);
            HttpResponse::InternalServerError().json(JsonRpcError::internal_error(
                request.id.clone(),
                format!("Gas estimation failed: negative estimate {}", gas),
            ))
        }
        Decision::Degraded { reason, .. } => {
            error!("Gas estimation failed: {}", reason);
            HttpResponse::InternalServerError().json(JsonRpcError::internal_error(
                request.id.clone(),
                format!("Gas estimation failed: {}", reason),
            ))
        }
    }
}

/// Service health check reporting which decider is active
#[post("/api/v1/health")]
async fn health_check(decider: SharedDecider) -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "decider": decider.name(),
    }))
}

/// Configure the API routes for the service
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(gas_price_jsonrpc)
        .service(estimate_gas_jsonrpc)
        .service(health_check);
}
