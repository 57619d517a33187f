use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Seneye USB Device（SUD）型号。
///
/// 报文中以整数编码；未知编码统一归为 `Unknown`，不视为错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SudType {
    #[default]
    Unknown,
    Home,
    Pond,
    Reef,
}

impl SudType {
    /// 由报文中的整数编码构造。
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => SudType::Home,
            2 => SudType::Pond,
            3 => SudType::Reef,
            _ => SudType::Unknown,
        }
    }

    /// 报文中的整数编码（`Unknown` 编码为 0）。
    pub fn code(self) -> i64 {
        match self {
            SudType::Unknown => 0,
            SudType::Home => 1,
            SudType::Pond => 2,
            SudType::Reef => 3,
        }
    }

    /// 指标标签 `sud_type` 使用的字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            SudType::Home => "home",
            SudType::Pond => "pond",
            SudType::Reef => "reef",
            SudType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SudType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SudType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.code())
    }
}

impl<'de> Deserialize<'de> for SudType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        i64::deserialize(deserializer).map(SudType::from_code)
    }
}

/// 一次 LDE 推送的完整内容。
///
/// 字段缺失时取零值，未知字段忽略。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reading {
    /// LDE 协议版本。
    pub version: String,
    #[serde(rename = "SUD")]
    pub sud: Sud,
}

impl Reading {
    /// 设备 ID（存储键）。
    pub fn device_id(&self) -> &str {
        &self.sud.id
    }

    /// 设备上报时间（毫秒），用作指标样本时间戳。
    pub fn timestamp_ms(&self) -> i64 {
        self.sud.timestamp.saturating_mul(1000)
    }
}

/// 设备状态。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Sud {
    /// SUD 序列号。
    pub id: String,
    /// 用户设置的显示名称。
    pub name: String,
    #[serde(rename = "type")]
    pub sud_type: SudType,
    /// 采样时间（Unix 秒，由设备提供，不与本机时钟比对）。
    #[serde(rename = "TS")]
    pub timestamp: i64,
    pub data: SudData,
}

/// 测量值。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SudData {
    #[serde(rename = "S")]
    pub status: SudStatus,
    /// 水温（摄氏度）。
    #[serde(rename = "T")]
    pub temperature: f64,
    #[serde(rename = "P")]
    pub ph: f64,
    /// 游离氨 NH3（ppm）。
    #[serde(rename = "N")]
    pub nh3: f64,
    /// 相关色温（K）。
    #[serde(rename = "K")]
    pub kelvin: f64,
    /// 照度（lux）。
    #[serde(rename = "L")]
    pub lux: f64,
    /// 光合有效辐射（400nm ~ 700nm）。
    #[serde(rename = "A")]
    pub par: f64,
}

/// 告警标志：0 正常，1 告警；`water` 例外，1 表示探头浸没在水中。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SudStatus {
    #[serde(rename = "W")]
    pub water: i64,
    #[serde(rename = "T")]
    pub temperature: i64,
    #[serde(rename = "P")]
    pub ph: i64,
    #[serde(rename = "N")]
    pub nh3: i64,
    /// 试剂片未正确安装或已过期时为 1。
    #[serde(rename = "S")]
    pub slide: i64,
    #[serde(rename = "K")]
    pub kelvin: i64,
}
