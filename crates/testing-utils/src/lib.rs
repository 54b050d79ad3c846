//! # Preventive Testing Utils
//!
//! 协调引擎测试共用的工具：内存存储、测试数据构建器与辅助函数。
//!
//! ```toml
//! [dev-dependencies]
//! preventive-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod helpers;
pub mod mocks;

pub use builders::*;
pub use helpers::*;
pub use mocks::*;
