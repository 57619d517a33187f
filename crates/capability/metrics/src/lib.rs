//! Seneye 指标导出。
//!
//! - [`catalog`]：固定的指标目录（名称、帮助文本、取值函数）
//! - [`collector`]：读数采集器，抓取时生成带设备时间戳的 gauge 样本
//! - [`counters`]：LDE 接入计数（`IntCounterVec`）
//! - [`encode_text`]：Prometheus 文本格式编码

pub mod catalog;
pub mod collector;
pub mod counters;

use prometheus::{Encoder, Registry, TextEncoder};

pub use catalog::{MetricSpec, READING_LABELS, READING_METRICS};
pub use collector::{GaugeSample, ReadingCollector, SampleLabels};
pub use counters::IngestCounters;

/// 指标注册与编码错误。
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("exposition is not valid utf-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// 将注册表中的全部指标编码为 Prometheus 文本格式。
pub fn encode_text(registry: &Registry) -> Result<String, MetricsError> {
    let encoder = TextEncoder::new();
    let families = registry.gather();
    let mut buffer = Vec::new();
    encoder.encode(&families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// 进程级指标（CPU、内存、文件描述符），仅 Linux 可用。
#[cfg(target_os = "linux")]
pub fn register_process_collector(registry: &Registry) -> Result<(), MetricsError> {
    registry.register(Box::new(
        prometheus::process_collector::ProcessCollector::for_self(),
    ))?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn register_process_collector(_registry: &Registry) -> Result<(), MetricsError> {
    Ok(())
}
