use std::collections::HashMap;
use std::fmt;

/// 设备 ID → 签名密钥。
///
/// 空字符串键为默认密钥，未单独配置的设备使用它。构造后不可修改。
#[derive(Clone, Default)]
pub struct SecretTable {
    entries: HashMap<String, Vec<u8>>,
}

impl SecretTable {
    /// 默认密钥使用的键。
    pub const DEFAULT_KEY: &'static str = "";

    pub fn new(entries: HashMap<String, Vec<u8>>) -> Self {
        Self { entries }
    }

    /// 仅包含默认密钥的表。
    pub fn with_default(secret: impl Into<Vec<u8>>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(Self::DEFAULT_KEY.to_string(), secret.into());
        Self { entries }
    }

    /// 查找设备密钥：先按设备 ID，再回退到默认密钥。
    pub fn resolve(&self, device_id: &str) -> Option<&[u8]> {
        self.entries
            .get(device_id)
            .or_else(|| self.entries.get(Self::DEFAULT_KEY))
            .map(Vec::as_slice)
    }

    pub fn default_secret(&self) -> Option<&[u8]> {
        self.entries.get(Self::DEFAULT_KEY).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for SecretTable
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(id, secret)| (id.into(), secret.into()))
                .collect(),
        }
    }
}

// 日志中只输出设备 ID，不输出密钥。
impl fmt::Debug for SecretTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("SecretTable").field("devices", &ids).finish()
    }
}
