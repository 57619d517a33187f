//! Seneye LDE（Local Data Exchange）领域模型。
//!
//! 一条通过签名校验的 LDE 推送报文解码为一个 [`Reading`]，
//! 以设备 ID（SUD 序列号）为键保存最新值，并在抓取时导出为指标。

pub mod data;

pub use data::{Reading, Sud, SudData, SudStatus, SudType};
