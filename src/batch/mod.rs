//! # 批量求解模块
//!
//! 对 k 路径或 k 网格上的大量 k 点并行求解本征值。
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs`, `commands/mesh.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod runner;

pub use runner::BandRunner;
