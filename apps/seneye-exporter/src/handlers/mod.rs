//! Handlers 模块

pub mod health;
pub mod lde;
pub mod metrics;

pub use health::*;
pub use lde::*;
pub use metrics::*;
