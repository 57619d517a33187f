//! 最新读数内存实现

use crate::traits::ReadingStore;
use domain::Reading;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 最新读数内存存储
///
/// 一把互斥锁同时保护写入与快照复制，持锁期间只做 map 读写或克隆。
#[derive(Debug, Default)]
pub struct InMemoryReadingStore {
    last_readings: Mutex<HashMap<String, Reading>>,
}

impl InMemoryReadingStore {
    /// 创建新的读数存储
    pub fn new() -> Self {
        Self::default()
    }

    // 写入方 panic 不会留下半写的条目（insert 是单步操作），中毒后继续使用
    fn readings(&self) -> MutexGuard<'_, HashMap<String, Reading>> {
        self.last_readings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReadingStore for InMemoryReadingStore {
    fn put(&self, reading: Reading) {
        let key = reading.device_id().to_string();
        self.readings().insert(key, reading);
    }

    fn snapshot(&self) -> HashMap<String, Reading> {
        self.readings().clone()
    }

    fn len(&self) -> usize {
        self.readings().len()
    }
}
