//! # tbands - 紧束缚能带计算
//!
//! 从 Wannier 型跃迁表构造紧束缚模型，在任意 k 点组装并对角化 Bloch 哈密顿量，
//! 生成均匀 k 网格与高对称 k 路径。
//!
//! ## 依赖关系
//! ```text
//! lib.rs
//!   ├── models/   (晶格、轨道、跃迁表与几何校验)
//!   ├── tb/       (模型、哈密顿量、本征求解、k 点采样)
//!   ├── batch/    (多 k 点并行求解)
//!   ├── bands/    (能带数据与导出)
//!   ├── utils/    (终端输出、进度条)
//!   └── error.rs  (错误处理)
//! ```

pub mod bands;
pub mod batch;
pub mod error;
pub mod models;
pub mod tb;
pub mod utils;

pub use error::{Result, TbError};
pub use tb::{Eigensolver, KNodes, KPath, TbModel};
