//! LDE 推送入口。
//!
//! - POST <lde path>
//!
//! 成功返回 204；任何报文错误统一返回空 body 的 400，具体原因只写入日志。

use axum::{
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use seneye_ingest::IngestError;

use crate::AppState;

pub async fn receive_push(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            state
                .service
                .reject(&IngestError::Read(rejection.body_text()));
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    match state.service.handle_push(&body) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(_) => StatusCode::BAD_REQUEST.into_response(),
    }
}
