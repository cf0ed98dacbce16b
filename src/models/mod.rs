//! # 数据模型模块
//!
//! 定义紧束缚模型的输入数据：晶格、轨道集合、跃迁表，以及对应的校验与
//! JSON 模型描述。
//!
//! ## 依赖关系
//! - 被 `tb/` 和 `commands/` 使用
//! - 子模块: lattice, orbital, hopping, geometry, file

pub mod file;
pub mod geometry;
pub mod hopping;
pub mod lattice;
pub mod orbital;

pub use file::ModelFile;
pub use geometry::RealArray;
pub use hopping::{HoppingElement, HoppingTable, PartnerMismatch, WsShell};
pub use lattice::Lattice;
pub use orbital::OrbitalSet;
