//! # 几何校验
//!
//! 在模型构造时一次性校验晶格、轨道、自旋重数、周期方向和跃迁表。
//! 任何不合法输入都返回 `TbError::Configuration`，没有其他副作用。
//!
//! ## 校验规则
//! - 晶格形状必须为 3x3，|det| >= 1e-6 且 det > 0
//! - 轨道数组秩必须为 2，每行宽度为 3
//! - 自旋重数只能是 1 或 2
//! - 周期方向为 0..3 中严格递增的下标
//! - 跃迁矩阵元下标 < N，简并度 > 0，非周期方向上 R 分量为 0
//!
//! ## 依赖关系
//! - 被 `tb/model.rs` 调用
//! - 使用 `models/lattice.rs`, `models/orbital.rs`, `models/hopping.rs`

use crate::error::{Result, TbError};
use crate::models::{HoppingTable, Lattice, OrbitalSet};

use serde::{Deserialize, Serialize};

/// 实空间维数
pub const DIM_R: usize = 3;

/// 原始实数数组输入（标量、向量或矩阵），用于在校验时区分数组秩
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RealArray {
    Scalar(f64),
    Vector(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl RealArray {
    /// 数组秩
    pub fn rank(&self) -> usize {
        match self {
            RealArray::Scalar(_) => 0,
            RealArray::Vector(_) => 1,
            RealArray::Matrix(_) => 2,
        }
    }
}

impl From<[[f64; 3]; 3]> for RealArray {
    fn from(m: [[f64; 3]; 3]) -> Self {
        RealArray::Matrix(m.iter().map(|row| row.to_vec()).collect())
    }
}

impl From<Vec<[f64; 3]>> for RealArray {
    fn from(rows: Vec<[f64; 3]>) -> Self {
        RealArray::Matrix(rows.iter().map(|row| row.to_vec()).collect())
    }
}

/// 校验晶格数组并构造 `Lattice`
pub fn validate_lattice(array: &RealArray) -> Result<Lattice> {
    let rows = match array {
        RealArray::Matrix(rows) => rows,
        other => {
            return Err(TbError::config(format!(
                "wrong lattice array dimensions: expected 3x3, got rank {}",
                other.rank()
            )))
        }
    };

    if rows.len() != DIM_R || rows.iter().any(|r| r.len() != DIM_R) {
        return Err(TbError::config(format!(
            "wrong lattice array dimensions: expected 3x3, got {}",
            describe_shape(rows)
        )));
    }

    let mut matrix = [[0.0; 3]; 3];
    for (dst, src) in matrix.iter_mut().zip(rows) {
        dst.copy_from_slice(src);
    }
    Lattice::new(matrix)
}

/// 校验轨道数组（N x 3 约化坐标）
pub fn validate_orbitals(array: &RealArray) -> Result<OrbitalSet> {
    let rows = match array {
        RealArray::Matrix(rows) if rows.is_empty() => {
            return Err(TbError::config("model needs at least one orbital"))
        }
        RealArray::Matrix(rows) => rows,
        other => {
            return Err(TbError::config(format!(
                "wrong orbital array rank: expected 2, got {}",
                other.rank()
            )))
        }
    };

    let mut positions = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        if row.len() != DIM_R {
            return Err(TbError::config(format!(
                "wrong orbital array dimensions: orbital {} has {} coordinates, expected {}",
                idx,
                row.len(),
                DIM_R
            )));
        }
        positions.push([row[0], row[1], row[2]]);
    }

    OrbitalSet::new(positions)
}

/// 校验自旋重数
pub fn validate_nspin(nspin: u8) -> Result<u8> {
    match nspin {
        1 | 2 => Ok(nspin),
        _ => Err(TbError::config(format!(
            "wrong value of nspin ({}), must be 1 or 2",
            nspin
        ))),
    }
}

/// 校验周期方向下标
pub fn validate_periodic(periodic: &[usize]) -> Result<Vec<usize>> {
    if periodic.is_empty() || periodic.len() > DIM_R {
        return Err(TbError::config(format!(
            "number of periodic directions must be between 1 and {}, got {}",
            DIM_R,
            periodic.len()
        )));
    }
    if periodic.iter().any(|&d| d >= DIM_R) {
        return Err(TbError::config(format!(
            "periodic direction out of range 0..{}: {:?}",
            DIM_R, periodic
        )));
    }
    if periodic.windows(2).any(|w| w[0] >= w[1]) {
        return Err(TbError::config(format!(
            "periodic directions must be strictly increasing: {:?}",
            periodic
        )));
    }
    Ok(periodic.to_vec())
}

/// 校验跃迁表与轨道数、周期方向的一致性
pub fn validate_hoppings(table: &HoppingTable, norb: usize, periodic: &[usize]) -> Result<()> {
    for (s, shell) in table.shells().iter().enumerate() {
        if shell.degeneracy == 0 {
            return Err(TbError::config(format!(
                "shell {} (R = {:?}) has zero degeneracy",
                s, shell.r
            )));
        }

        for dir in (0..DIM_R).filter(|d| !periodic.contains(d)) {
            if shell.r[dir] != 0 {
                return Err(TbError::config(format!(
                    "shell {} (R = {:?}) translates along non-periodic direction {}",
                    s, shell.r, dir
                )));
            }
        }

        for e in &shell.elements {
            if e.i >= norb || e.j >= norb {
                return Err(TbError::config(format!(
                    "shell {} (R = {:?}) references orbital pair ({}, {}) but model has {} orbitals",
                    s, shell.r, e.i, e.j, norb
                )));
            }
        }
    }
    Ok(())
}

fn describe_shape(rows: &[Vec<f64>]) -> String {
    let widths: Vec<usize> = rows.iter().map(|r| r.len()).collect();
    match widths.first() {
        Some(&w) if widths.iter().all(|&x| x == w) => format!("{}x{}", rows.len(), w),
        _ => format!("{} rows with widths {:?}", rows.len(), widths),
    }
}
