//! LDE 推送接入：解码 → 存储 → 日志/计数。
//!
//! 所有失败（格式、未知设备、算法、签名）对外统一为一种拒绝，具体类别只写入日志与计数。

use domain::Reading;
use prometheus::Registry;
use seneye_auth::{AuthError, LdeCodec, LdeError, SecretTable};
use seneye_metrics::{IngestCounters, MetricsError, ReadingCollector};
use seneye_storage::{InMemoryReadingStore, ReadingStore};
use seneye_telemetry::IngestResult;
use std::sync::Arc;
use tracing::{debug, warn};

/// 接入错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read request body: {0}")]
    Read(String),
    #[error(transparent)]
    Lde(#[from] LdeError),
}

impl IngestError {
    /// 错误类别（日志字段）。
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Read(_) => "read_error",
            IngestError::Lde(err) => err.kind(),
        }
    }

    /// 计数标签。
    pub fn result(&self) -> IngestResult {
        match self {
            IngestError::Read(_) => IngestResult::ReadError,
            IngestError::Lde(LdeError::Auth(AuthError::UnknownDevice(_))) => {
                IngestResult::UnknownDevice
            }
            IngestError::Lde(LdeError::Auth(AuthError::UnsupportedAlgorithm(_))) => {
                IngestResult::UnsupportedAlgorithm
            }
            IngestError::Lde(LdeError::Auth(AuthError::SignatureMismatch)) => {
                IngestResult::SignatureMismatch
            }
            IngestError::Lde(LdeError::Parse(_)) => IngestResult::ParseError,
        }
    }
}

/// 接入服务配置。
#[derive(Clone)]
pub struct LdeServiceConfig {
    pub secrets: SecretTable,
    pub registry: Registry,
}

impl LdeServiceConfig {
    pub fn new(secrets: SecretTable, registry: Registry) -> Self {
        Self { secrets, registry }
    }
}

/// LDE 接入服务。
#[derive(Clone)]
pub struct LdeService {
    codec: LdeCodec,
    store: Arc<dyn ReadingStore>,
    registry: Registry,
    counters: IngestCounters,
}

impl LdeService {
    /// 创建服务，并把读数采集器与接入计数注册到配置中的注册表。
    pub fn new(config: LdeServiceConfig) -> Result<Self, MetricsError> {
        let store: Arc<dyn ReadingStore> = Arc::new(InMemoryReadingStore::new());
        config
            .registry
            .register(Box::new(ReadingCollector::new(store.clone())?))?;
        let counters = IngestCounters::new()?;
        counters.register(&config.registry)?;
        Ok(Self {
            codec: LdeCodec::new(config.secrets),
            store,
            registry: config.registry,
            counters,
        })
    }

    pub fn store(&self) -> &Arc<dyn ReadingStore> {
        &self.store
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn counters(&self) -> &IngestCounters {
        &self.counters
    }

    /// 处理一条推送。成功时读数已写入存储。
    pub fn handle_push(&self, body: &[u8]) -> Result<Reading, IngestError> {
        match self.codec.decode(body) {
            Ok(reading) => {
                log_reading(&reading);
                self.store.put(reading.clone());
                self.counters.record(IngestResult::Accepted);
                Ok(reading)
            }
            Err(err) => {
                let err = IngestError::from(err);
                self.reject(&err);
                Err(err)
            }
        }
    }

    /// 记录一次拒绝（日志 + 计数）。请求体读取失败时由 HTTP 层直接调用。
    pub fn reject(&self, err: &IngestError) {
        warn!(
            target: "seneye.ingest",
            kind = err.kind(),
            error = %err,
            "lde_event_rejected"
        );
        self.counters.record(err.result());
    }
}

fn log_reading(reading: &Reading) {
    let sud = &reading.sud;
    let data = &sud.data;
    let status = &data.status;
    debug!(
        target: "seneye.ingest",
        version = %reading.version,
        sud_id = %sud.id,
        sud_name = %sud.name,
        sud_type = %sud.sud_type,
        ts = sud.timestamp,
        temperature = data.temperature,
        ph = data.ph,
        nh3 = data.nh3,
        kelvin = data.kelvin,
        lux = data.lux,
        par = data.par,
        status_water = status.water,
        status_temperature = status.temperature,
        status_ph = status.ph,
        status_nh3 = status.nh3,
        status_slide = status.slide,
        status_kelvin = status.kelvin,
        "lde_event_received"
    );
}
