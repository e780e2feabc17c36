//! API Handlers
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use ecalc_codecs::{Codec, CodecRegistry};
use ecalc_core::{Complexity, ECALC_VERSION};
use ecalc_pipelines::Operator;

use crate::SharedState;

#[derive(Debug, Deserialize)]
pub struct OperateRequest {
    /// Operator symbol or name (`+`, `÷`, `divide`, ...)
    pub op: String,
    pub a: i64,
    pub b: i64,
}

#[derive(Debug, Serialize)]
pub struct OperateResponse {
    pub result: i64,
    pub run_id: Uuid,
    pub complexity: Complexity,
    pub steps: u64,
    pub warnings: usize,
}

pub async fn operate(
    State(state): State<SharedState>,
    Json(request): Json<OperateRequest>,
) -> (StatusCode, Json<Value>) {
    let op: Operator = match request.op.parse() {
        Ok(op) => op,
        Err(e) => return (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))),
    };
    state.metrics.record_run(op);

    let calculator = state.calculator.lock().await;
    match calculator.run(op, request.a, request.b).await {
        Ok(report) => {
            let warnings = report.warnings().count();
            state.metrics.record_warnings(warnings);
            let body = OperateResponse {
                result: report.result,
                run_id: report.run_id,
                complexity: report.complexity,
                steps: report.steps,
                warnings,
            };
            (StatusCode::OK, Json(json!(body)))
        }
        Err(e) => {
            state.metrics.record_failure(op);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "error": e.to_string(),
                    // keypad shows ERROR for arithmetic failures
                    "display": if e.is_domain_error() { "ERROR" } else { "" },
                })),
            )
        }
    }
}

pub async fn drain_trace(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!(state.emitter.drain())))
}

pub async fn peek_trace(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "events": state.emitter.snapshot(),
            "capacity": state.emitter.capacity(),
            "dropped": state.emitter.dropped(),
        })),
    )
}

#[derive(Debug, Deserialize)]
pub struct CodecQuery {
    pub value: Option<i64>,
}

pub async fn list_codecs(
    State(state): State<SharedState>,
    Query(query): Query<CodecQuery>,
) -> (StatusCode, Json<Value>) {
    let value = query.value.unwrap_or(42);
    let registry = CodecRegistry::global();
    let codecs: Vec<Value> = registry
        .ids()
        .into_iter()
        .filter_map(|id| registry.get(id))
        .map(|codec| {
            // Roman numerals grow with the magnitude; never build huge ones.
            let (symbols, limit) = (codec.encoded_len(value), state.max_symbols);
            if symbols > limit {
                return json!({
                    "id": codec.id(),
                    "sample": null,
                    "decoded": null,
                    "skipped": format!("{} symbols exceed the limit of {}", symbols, limit),
                });
            }
            let encoded = codec.encode(value);
            json!({
                "id": codec.id(),
                "sample": codec.render(&encoded),
                "decoded": codec.decode(&encoded),
            })
        })
        .collect();

    (StatusCode::OK, Json(json!({ "value": value, "codecs": codecs })))
}

pub async fn notes(State(state): State<SharedState>) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!(state.player.notes())))
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok", "version": ECALC_VERSION })))
}

pub async fn metrics(State(state): State<SharedState>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        ),
        Err(e) => {
            tracing::error!(error = %e, "metrics encoding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                e.to_string(),
            )
        }
    }
}
