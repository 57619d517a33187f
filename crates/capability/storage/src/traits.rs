//! 存储接口 Trait 定义

use domain::Reading;
use std::collections::HashMap;

/// 最新读数存储接口
///
/// 以设备 ID 为键，每个设备只保留最后一次 `put` 的读数。
pub trait ReadingStore: Send + Sync {
    /// 写入或覆盖该设备的读数（不做时间戳新旧校验）
    fn put(&self, reading: Reading);

    /// 复制当前全部读数，返回值与存储相互独立
    fn snapshot(&self) -> HashMap<String, Reading>;

    /// 已记录的设备数量
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
