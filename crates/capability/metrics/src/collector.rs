//! 读数采集器：每次抓取时从 `ReadingStore` 取快照并生成 gauge 样本。

use crate::catalog::{READING_LABELS, READING_METRICS};
use crate::MetricsError;
use domain::Reading;
use prometheus::core::{Collector, Desc};
use prometheus::proto::{Gauge, LabelPair, Metric, MetricFamily, MetricType};
use seneye_storage::ReadingStore;
use std::collections::HashMap;
use std::sync::Arc;

/// 样本标签。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleLabels {
    pub id: String,
    pub name: String,
    pub sud_type: String,
}

impl SampleLabels {
    fn from_reading(reading: &Reading) -> Self {
        Self {
            id: reading.sud.id.clone(),
            name: reading.sud.name.clone(),
            sud_type: reading.sud.sud_type.as_str().to_string(),
        }
    }

    fn values(&self) -> [&str; 3] {
        [&self.id, &self.name, &self.sud_type]
    }
}

/// 带时间戳的 gauge 样本。
///
/// 时间戳取设备上报时间（毫秒），不是抓取时间。`TS` 缺失或为 0 时时间戳为 0，
/// 文本编码会省略它，Prometheus 随后以抓取时间记录该样本。
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeSample {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: SampleLabels,
    pub value: f64,
    pub timestamp_ms: i64,
}

/// 读数采集器。
///
/// prometheus 的 `GaugeVec` 等类型无法携带逐样本时间戳，因此直接实现
/// [`Collector`]，每次抓取从快照生成常量 gauge。
pub struct ReadingCollector {
    store: Arc<dyn ReadingStore>,
    descs: Vec<Desc>,
}

impl ReadingCollector {
    pub fn new(store: Arc<dyn ReadingStore>) -> Result<Self, MetricsError> {
        let labels: Vec<String> = READING_LABELS.iter().map(|l| l.to_string()).collect();
        let descs = READING_METRICS
            .iter()
            .map(|spec| {
                Desc::new(
                    spec.name.to_string(),
                    spec.help.to_string(),
                    labels.clone(),
                    HashMap::new(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { store, descs })
    }

    /// 生成本次抓取的全部样本。
    ///
    /// 按设备 ID 排序，每个设备按目录顺序输出 12 个样本。
    pub fn collect_samples(&self) -> Vec<GaugeSample> {
        // 快照已复制，遍历期间不持有存储锁
        let snapshot = self.store.snapshot();
        let mut readings: Vec<&Reading> = snapshot.values().collect();
        readings.sort_by(|a, b| a.device_id().cmp(b.device_id()));

        let mut samples = Vec::with_capacity(readings.len() * READING_METRICS.len());
        for reading in readings {
            let labels = SampleLabels::from_reading(reading);
            let timestamp_ms = reading.timestamp_ms();
            for spec in READING_METRICS.iter() {
                samples.push(GaugeSample {
                    name: spec.name,
                    help: spec.help,
                    labels: labels.clone(),
                    value: (spec.value)(reading),
                    timestamp_ms,
                });
            }
        }
        samples
    }
}

impl Collector for ReadingCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut families: Vec<MetricFamily> = READING_METRICS
            .iter()
            .map(|spec| {
                let mut family = MetricFamily::default();
                family.set_name(spec.name.to_string());
                family.set_help(spec.help.to_string());
                family.set_field_type(MetricType::GAUGE);
                family
            })
            .collect();
        let index: HashMap<&str, usize> = READING_METRICS
            .iter()
            .enumerate()
            .map(|(i, spec)| (spec.name, i))
            .collect();

        for sample in self.collect_samples() {
            let Some(&i) = index.get(sample.name) else {
                continue;
            };
            families[i].mut_metric().push(gauge_metric(&sample));
        }
        families
            .into_iter()
            .filter(|family| !family.get_metric().is_empty())
            .collect()
    }
}

// timestamp_ms 为 0 时编码器不输出时间戳
fn gauge_metric(sample: &GaugeSample) -> Metric {
    let mut metric = Metric::default();
    for (name, value) in READING_LABELS.iter().zip(sample.labels.values()) {
        let mut pair = LabelPair::default();
        pair.set_name(name.to_string());
        pair.set_value(value.to_string());
        metric.mut_label().push(pair);
    }
    let mut gauge = Gauge::default();
    gauge.set_value(sample.value);
    metric.set_gauge(gauge);
    metric.set_timestamp_ms(sample.timestamp_ms);
    metric
}
