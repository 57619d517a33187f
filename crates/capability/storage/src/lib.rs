//! # Seneye Storage 模块
//!
//! 保存每个设备最近一次被接受的读数，连接异步推送与同步抓取。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`ReadingStore`，仅包含 `put` / `snapshot`
//! 2. **实现层** (`in_memory/`)：单互斥锁保护的 `HashMap`
//!
//! 采集器只依赖 `ReadingStore`，分片或带过期淘汰的实现可直接替换。
//!
//! ## 语义约束
//!
//! - **最后写入者胜出**：`put` 不比较读数自带的时间戳，较旧的读数同样会覆盖较新的读数
//! - **无淘汰**：条目数量随出现过的设备 ID 增长，进程生命周期内不删除
//! - **快照隔离**：`snapshot` 在锁内复制，调用方遍历时不持有锁，不阻塞并发的 `put`

pub mod in_memory;
pub mod traits;

pub use in_memory::InMemoryReadingStore;
pub use traits::*;
