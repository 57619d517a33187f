//! 追踪初始化、请求 ID 生成与 LDE 接入结果标签。

use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 日志输出格式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 单条推送的处理结果（`seneye_lde_messages_total` 的 `result` 标签）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IngestResult {
    Accepted,
    ParseError,
    UnknownDevice,
    UnsupportedAlgorithm,
    SignatureMismatch,
    ReadError,
}

impl IngestResult {
    pub const ALL: [IngestResult; 6] = [
        IngestResult::Accepted,
        IngestResult::ParseError,
        IngestResult::UnknownDevice,
        IngestResult::UnsupportedAlgorithm,
        IngestResult::SignatureMismatch,
        IngestResult::ReadError,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            IngestResult::Accepted => "accepted",
            IngestResult::ParseError => "parse_error",
            IngestResult::UnknownDevice => "unknown_device",
            IngestResult::UnsupportedAlgorithm => "unsupported_algorithm",
            IngestResult::SignatureMismatch => "signature_mismatch",
            IngestResult::ReadError => "read_error",
        }
    }
}

/// 初始化 tracing。
///
/// `RUST_LOG` 存在时优先，否则使用 `default_level`。
pub fn init_tracing(format: LogFormat, default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = match format {
        LogFormat::Text => fmt().with_env_filter(filter).try_init(),
        LogFormat::Json => fmt().json().with_env_filter(filter).try_init(),
    };
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}
