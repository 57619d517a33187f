//! LDE 接入计数：`seneye_lde_messages_total{result}`。

use crate::MetricsError;
use crate::catalog::{LDE_MESSAGES_HELP, LDE_MESSAGES_TOTAL, LDE_RESULT_LABEL};
use prometheus::{IntCounterVec, Opts, Registry};
use seneye_telemetry::IngestResult;

/// 按处理结果计数。克隆共享同一组计数器。
#[derive(Clone)]
pub struct IngestCounters {
    by_result: IntCounterVec,
}

impl IngestCounters {
    /// 创建计数器并预置全部结果标签，未发生过的结果也以 0 导出。
    pub fn new() -> Result<Self, MetricsError> {
        let by_result = IntCounterVec::new(
            Opts::new(LDE_MESSAGES_TOTAL, LDE_MESSAGES_HELP),
            &[LDE_RESULT_LABEL],
        )?;
        for result in IngestResult::ALL {
            by_result.with_label_values(&[result.as_str()]);
        }
        Ok(Self { by_result })
    }

    pub fn register(&self, registry: &Registry) -> Result<(), MetricsError> {
        registry.register(Box::new(self.by_result.clone()))?;
        Ok(())
    }

    pub fn record(&self, result: IngestResult) {
        self.by_result.with_label_values(&[result.as_str()]).inc();
    }

    pub fn get(&self, result: IngestResult) -> u64 {
        self.by_result.with_label_values(&[result.as_str()]).get()
    }

    /// 收到的推送总数。
    pub fn total(&self) -> u64 {
        IngestResult::ALL.iter().map(|result| self.get(*result)).sum()
    }
}
