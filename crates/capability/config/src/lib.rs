//! 应用运行配置加载。

use seneye_auth::SecretTable;
use seneye_telemetry::LogFormat;
use std::collections::HashMap;
use std::env;

const SECRETS_KEY: &str = "SENEYE_LDE_SECRETS";

/// 配置加载错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub lde_addr: String,
    pub metrics_addr: String,
    pub lde_path: String,
    pub metrics_path: String,
    pub secrets: SecretTable,
    pub log_format: LogFormat,
    pub log_level: String,
    pub shutdown_timeout_seconds: u64,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（测试中替代进程环境）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let reader = Reader { lookup };
        let secrets = parse_secrets(
            &reader
                .read(SECRETS_KEY)
                .ok_or_else(|| ConfigError::Missing(SECRETS_KEY.to_string()))?,
        )?;
        let lde_addr = reader.read_or("SENEYE_LDE_ADDR", "0.0.0.0:8080");
        let metrics_addr = reader.read_or("SENEYE_METRICS_ADDR", "0.0.0.0:9090");
        let lde_path = reader.read_path("SENEYE_LDE_PATH", "/lde")?;
        let metrics_path = reader.read_path("SENEYE_METRICS_PATH", "/metrics")?;
        let log_format = reader.read_log_format("SENEYE_LOG_FORMAT")?;
        let log_level = reader.read_or("SENEYE_LOG_LEVEL", "info");
        let shutdown_timeout_seconds =
            reader.read_u64_with_default("SENEYE_SHUTDOWN_TIMEOUT_SECONDS", 5)?;

        if lde_addr == metrics_addr && lde_path == metrics_path {
            return Err(ConfigError::Invalid(
                "SENEYE_METRICS_PATH".to_string(),
                format!("{metrics_path} (same as SENEYE_LDE_PATH on a shared listener)"),
            ));
        }

        Ok(Self {
            lde_addr,
            metrics_addr,
            lde_path,
            metrics_path,
            secrets,
            log_format,
            log_level,
            shutdown_timeout_seconds,
        })
    }

    /// 推送与抓取是否共用一个监听地址。
    pub fn shared_listener(&self) -> bool {
        self.lde_addr == self.metrics_addr
    }
}

/// 解析 `SENEYE_LDE_SECRETS`。
///
/// 逗号分隔；`SECRET` 为默认密钥，`SUD_ID=SECRET` 为设备密钥（按第一个 `=` 切分，
/// 密钥本身可以包含 `=`）。
pub fn parse_secrets(raw: &str) -> Result<SecretTable, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid(SECRETS_KEY.to_string(), reason.to_string());
    if raw.trim().is_empty() {
        return Err(ConfigError::Missing(SECRETS_KEY.to_string()));
    }

    let mut entries: HashMap<String, Vec<u8>> = HashMap::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            return Err(invalid("empty entry"));
        }
        let (id, secret) = match entry.split_once('=') {
            Some((id, secret)) => {
                let id = id.trim();
                if id.is_empty() {
                    return Err(invalid("empty device id"));
                }
                (id.to_string(), secret)
            }
            None => (SecretTable::DEFAULT_KEY.to_string(), entry),
        };
        if secret.is_empty() {
            return Err(invalid("empty secret"));
        }
        if entries.contains_key(&id) {
            return Err(if id.is_empty() {
                invalid("more than one default secret")
            } else {
                ConfigError::Invalid(SECRETS_KEY.to_string(), format!("duplicate device id {id}"))
            });
        }
        entries.insert(id, secret.as_bytes().to_vec());
    }
    Ok(SecretTable::new(entries))
}

struct Reader<F> {
    lookup: F,
}

impl<F> Reader<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// 读取非空值。
    fn read(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|value| !value.is_empty())
    }

    fn read_or(&self, key: &str, default: &str) -> String {
        self.read(key).unwrap_or_else(|| default.to_string())
    }

    fn read_u64_with_default(&self, key: &str, default: u64) -> Result<u64, ConfigError> {
        let value = match self.read(key) {
            Some(value) => value,
            None => return Ok(default),
        };
        value
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid(key.to_string(), value))
    }

    fn read_path(&self, key: &str, default: &str) -> Result<String, ConfigError> {
        let value = self.read_or(key, default);
        // /health 固定占用
        if !value.starts_with('/') || value == "/health" {
            return Err(ConfigError::Invalid(key.to_string(), value));
        }
        Ok(value)
    }

    fn read_log_format(&self, key: &str) -> Result<LogFormat, ConfigError> {
        match self.read(key) {
            None => Ok(LogFormat::default()),
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "text" => Ok(LogFormat::Text),
                "json" => Ok(LogFormat::Json),
                _ => Err(ConfigError::Invalid(key.to_string(), value)),
            },
        }
    }
}
