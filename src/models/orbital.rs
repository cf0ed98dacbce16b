//! # 轨道位置集合
//!
//! 有序的轨道约化坐标列表。列表顺序即轨道编号（从 0 开始），
//! 哈密顿量矩阵的行列都按此编号排列。
//!
//! ## 依赖关系
//! - 被 `models/geometry.rs` 构造
//! - 被 `tb/model.rs` 使用

use crate::error::{Result, TbError};

use serde::Serialize;

/// 轨道约化坐标集合
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrbitalSet {
    positions: Vec<[f64; 3]>,
}

impl OrbitalSet {
    /// 从约化坐标列表创建，至少需要一个轨道
    pub fn new(positions: Vec<[f64; 3]>) -> Result<Self> {
        if positions.is_empty() {
            return Err(TbError::config("model needs at least one orbital"));
        }
        if let Some(idx) = positions
            .iter()
            .position(|p| p.iter().any(|x| !x.is_finite()))
        {
            return Err(TbError::config(format!(
                "orbital {} has non-finite coordinates: {:?}",
                idx, positions[idx]
            )));
        }
        Ok(OrbitalSet { positions })
    }

    /// 轨道数 N
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 第 `i` 个轨道的约化坐标
    pub fn position(&self, i: usize) -> &[f64; 3] {
        &self.positions[i]
    }

    pub fn positions(&self) -> &[[f64; 3]] {
        &self.positions
    }

    pub fn iter(&self) -> impl Iterator<Item = &[f64; 3]> {
        self.positions.iter()
    }
}
