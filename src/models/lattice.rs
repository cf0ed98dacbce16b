//! # 晶格数据模型
//!
//! 实空间晶格矢量（行向量，笛卡尔坐标）。构造时校验非退化与右手系，
//! 之后不可修改。
//!
//! ## 依赖关系
//! - 被 `models/geometry.rs` 和 `tb/` 使用
//! - 无外部模块依赖

use crate::error::{Result, TbError};

use serde::Serialize;

/// 行列式绝对值下限，低于此值视为退化晶格
pub const MIN_DETERMINANT: f64 = 1.0e-6;

/// 实空间晶格
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a1, a2, a3
    matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建，校验行列式
    pub fn new(matrix: [[f64; 3]; 3]) -> Result<Self> {
        if matrix.iter().flatten().any(|x| !x.is_finite()) {
            return Err(TbError::config(format!(
                "lattice vectors must be finite: {:?}",
                matrix
            )));
        }
        let det = determinant(&matrix);
        if !(det.abs() >= MIN_DETERMINANT) {
            return Err(TbError::config(format!(
                "lattice vectors length/area/volume too close to zero (det = {:.3e})",
                det
            )));
        }
        if det < 0.0 {
            return Err(TbError::config(
                "lattice vectors need to form a right handed system",
            ));
        }
        Ok(Lattice { matrix })
    }

    /// 晶格向量矩阵
    pub fn matrix(&self) -> &[[f64; 3]; 3] {
        &self.matrix
    }

    /// 第 `i` 个晶格向量
    pub fn vector(&self, i: usize) -> [f64; 3] {
        self.matrix[i]
    }

    /// 行列式（右手系下即为体积）
    pub fn determinant(&self) -> f64 {
        determinant(&self.matrix)
    }

    /// 晶胞体积
    pub fn volume(&self) -> f64 {
        self.determinant().abs()
    }

    /// 获取晶格参数 (a, b, c, alpha, beta, gamma)，角度单位：度
    pub fn parameters(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a_vec, b_vec, c_vec] = self.matrix;

        let a = norm(&a_vec);
        let b = norm(&b_vec);
        let c = norm(&c_vec);

        let alpha = (dot(&b_vec, &c_vec) / (b * c)).acos().to_degrees();
        let beta = (dot(&a_vec, &c_vec) / (a * c)).acos().to_degrees();
        let gamma = (dot(&a_vec, &b_vec) / (a * b)).acos().to_degrees();

        (a, b, c, alpha, beta, gamma)
    }

    /// 倒格矢（行向量），满足 a_i · b_j = δ_ij，不含 2π 因子
    pub fn reciprocal(&self) -> [[f64; 3]; 3] {
        let [a, b, c] = self.matrix;
        let factor = 1.0 / self.determinant();

        let b1 = cross(&b, &c);
        let b2 = cross(&c, &a);
        let b3 = cross(&a, &b);

        [
            [b1[0] * factor, b1[1] * factor, b1[2] * factor],
            [b2[0] * factor, b2[1] * factor, b2[2] * factor],
            [b3[0] * factor, b3[1] * factor, b3[2] * factor],
        ]
    }

    /// 分数坐标转笛卡尔坐标
    pub fn to_cartesian(&self, frac: &[f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }
}

fn determinant(m: &[[f64; 3]; 3]) -> f64 {
    let [a, b, c] = m;
    a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
        + a[2] * (b[0] * c[1] - b[1] * c[0])
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn norm(a: &[f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
