//! # 紧束缚引擎
//!
//! 模型构造、Bloch 哈密顿量组装、厄米本征求解，以及 k 点采样（均匀网格和高对称路径）。
//!
//! ## 依赖关系
//! - 使用 `models/` 的数据结构
//! - 被 `batch/`, `bands/`, `commands/` 使用
//! - 子模块: model, eigen, kmesh, kpath

pub mod eigen;
pub mod kmesh;
pub mod kpath;
pub mod model;

pub use eigen::{
    hermiticity_deviation, EigenBackend, Eigensolver, NalgebraBackend, RawEigen, Solution,
    HERMITICITY_TOLERANCE,
};
pub use kmesh::uniform_mesh;
pub use kpath::{KNodes, KPath, PathReport};
pub use model::{HamiltonianMatrix, TbModel};
