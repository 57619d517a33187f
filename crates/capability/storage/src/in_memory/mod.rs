//! 内存存储实现模块
//!
//! - ReadingStore: InMemoryReadingStore

pub mod reading;

pub use reading::*;
