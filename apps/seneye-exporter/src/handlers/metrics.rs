//! Prometheus 抓取入口。
//!
//! - GET <metrics path>

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use prometheus::{Encoder, TextEncoder};
use seneye_metrics::encode_text;
use tracing::error;

use crate::AppState;

pub async fn get_metrics(State(state): State<AppState>) -> Response {
    match encode_text(state.service.registry()) {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, TextEncoder::new().format_type().to_string())],
            text,
        )
            .into_response(),
        Err(err) => {
            error!(target: "seneye.http", error = %err, "metrics encode failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
