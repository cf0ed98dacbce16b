//! # 厄米本征求解
//!
//! 本征分解能力通过 `EigenBackend` trait 注入，默认实现基于
//! `nalgebra::SymmetricEigen`（对复厄米矩阵同样适用）。
//!
//! `Eigensolver::solve` 的流程：
//! 1. 检查 max|H − H†| ≤ 容差（默认 1e-9），否则返回 `NumericalInconsistency`。
//!    不做自动对称化。
//! 2. 调用后端分解。
//! 3. 丢弃本征值残余虚部，升序排列，本征向量列按同一置换重排。
//!
//! ## 依赖关系
//! - 被 `tb/model.rs`, `batch/runner.rs`, `commands/` 使用
//! - 使用 `nalgebra`, `num-complex`

use crate::error::{Result, TbError};
use crate::tb::model::HamiltonianMatrix;

use num_complex::Complex64;

/// 厄米性检查默认容差
pub const HERMITICITY_TOLERANCE: f64 = 1.0e-9;

/// 后端返回的原始分解结果（未排序）
#[derive(Debug, Clone)]
pub struct RawEigen {
    /// 本征值，理论上虚部为 0
    pub values: Vec<Complex64>,
    /// 本征向量（按列），仅在请求时提供
    pub vectors: Option<HamiltonianMatrix>,
}

/// 稠密厄米矩阵本征分解能力
pub trait EigenBackend: Send + Sync {
    fn decompose(&self, h: &HamiltonianMatrix, want_vectors: bool) -> Result<RawEigen>;
}

/// 基于 nalgebra 的纯 Rust 后端
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraBackend;

impl EigenBackend for NalgebraBackend {
    fn decompose(&self, h: &HamiltonianMatrix, want_vectors: bool) -> Result<RawEigen> {
        if want_vectors {
            let eig = h.clone().symmetric_eigen();
            Ok(RawEigen {
                values: eig
                    .eigenvalues
                    .iter()
                    .map(|&e| Complex64::new(e, 0.0))
                    .collect(),
                vectors: Some(eig.eigenvectors),
            })
        } else {
            let values = h.symmetric_eigenvalues();
            Ok(RawEigen {
                values: values.iter().map(|&e| Complex64::new(e, 0.0)).collect(),
                vectors: None,
            })
        }
    }
}

/// 求解结果：仅本征值，或本征值与本征向量
#[derive(Debug, Clone)]
pub enum Solution {
    Values(Vec<f64>),
    Vectors {
        energies: Vec<f64>,
        /// 第 n 列对应 `energies[n]`
        vectors: HamiltonianMatrix,
    },
}

impl Solution {
    /// 升序本征值
    pub fn energies(&self) -> &[f64] {
        match self {
            Solution::Values(energies) => energies,
            Solution::Vectors { energies, .. } => energies,
        }
    }

    pub fn into_energies(self) -> Vec<f64> {
        match self {
            Solution::Values(energies) => energies,
            Solution::Vectors { energies, .. } => energies,
        }
    }

    pub fn vectors(&self) -> Option<&HamiltonianMatrix> {
        match self {
            Solution::Values(_) => None,
            Solution::Vectors { vectors, .. } => Some(vectors),
        }
    }
}

/// 厄米本征求解器
#[derive(Debug, Clone)]
pub struct Eigensolver<B: EigenBackend = NalgebraBackend> {
    backend: B,
    tolerance: f64,
}

impl Default for Eigensolver<NalgebraBackend> {
    fn default() -> Self {
        Self::with_backend(NalgebraBackend)
    }
}

impl Eigensolver<NalgebraBackend> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: EigenBackend> Eigensolver<B> {
    /// 使用指定后端
    pub fn with_backend(backend: B) -> Self {
        Eigensolver {
            backend,
            tolerance: HERMITICITY_TOLERANCE,
        }
    }

    /// 设置厄米性容差
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// 对角化哈密顿量
    pub fn solve(&self, h: &HamiltonianMatrix, want_vectors: bool) -> Result<Solution> {
        if !h.is_square() {
            return Err(TbError::config(format!(
                "Hamiltonian must be square, got {}x{}",
                h.nrows(),
                h.ncols()
            )));
        }

        let deviation = hermiticity_deviation(h);
        if !(deviation <= self.tolerance) {
            return Err(TbError::NumericalInconsistency {
                deviation,
                tolerance: self.tolerance,
            });
        }

        let n = h.nrows();
        let raw = self.backend.decompose(h, want_vectors)?;
        if raw.values.len() != n {
            return Err(TbError::Other(format!(
                "eigen backend returned {} eigenvalues for a {}x{} matrix",
                raw.values.len(),
                n,
                n
            )));
        }

        // 去掉残余虚部并排序
        let values: Vec<f64> = raw.values.iter().map(|z| z.re).collect();
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let energies: Vec<f64> = order.iter().map(|&idx| values[idx]).collect();

        if !want_vectors {
            return Ok(Solution::Values(energies));
        }

        let raw_vectors = raw.vectors.ok_or_else(|| {
            TbError::Other("eigen backend did not return eigenvectors".to_string())
        })?;
        if raw_vectors.nrows() != n || raw_vectors.ncols() != n {
            return Err(TbError::Other(format!(
                "eigen backend returned {}x{} eigenvectors for a {}x{} matrix",
                raw_vectors.nrows(),
                raw_vectors.ncols(),
                n,
                n
            )));
        }
        let vectors = HamiltonianMatrix::from_fn(n, n, |r, c| raw_vectors[(r, order[c])]);

        Ok(Solution::Vectors { energies, vectors })
    }
}

/// max |H − H†|，任一矩阵元为 NaN 时返回 NaN
pub fn hermiticity_deviation(h: &HamiltonianMatrix) -> f64 {
    let n = h.nrows().min(h.ncols());
    let mut max = 0.0_f64;
    for i in 0..n {
        for j in 0..n {
            let d = (h[(i, j)] - h[(j, i)].conj()).norm();
            if d.is_nan() {
                return f64::NAN;
            }
            max = max.max(d);
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn sample_hermitian() -> HamiltonianMatrix {
        HamiltonianMatrix::from_row_slice(
            4,
            4,
            &[
                c(1.0, 0.0),
                c(0.5, 0.3),
                c(-0.2, 0.0),
                c(0.0, 0.7),
                c(0.5, -0.3),
                c(-1.5, 0.0),
                c(0.4, -0.1),
                c(0.2, 0.2),
                c(-0.2, 0.0),
                c(0.4, 0.1),
                c(0.3, 0.0),
                c(-0.6, 0.0),
                c(0.0, -0.7),
                c(0.2, -0.2),
                c(-0.6, 0.0),
                c(2.1, 0.0),
            ],
        )
    }

    /// 把对角元当作本征值、单位阵当作本征向量的假后端，顺序故意不排序
    struct DiagonalBackend;

    impl EigenBackend for DiagonalBackend {
        fn decompose(&self, h: &HamiltonianMatrix, want_vectors: bool) -> Result<RawEigen> {
            let n = h.nrows();
            Ok(RawEigen {
                values: (0..n).map(|i| h[(i, i)] + c(0.0, 1e-14)).collect(),
                vectors: want_vectors.then(|| HamiltonianMatrix::identity(n, n)),
            })
        }
    }

    #[test]
    fn test_eigenvalues_sorted_and_real() {
        let solver = Eigensolver::new();
        let solution = solver.solve(&sample_hermitian(), false).unwrap();

        let energies = solution.energies();
        assert_eq!(energies.len(), 4);
        assert!(energies.windows(2).all(|w| w[0] <= w[1]));
        assert!(solution.vectors().is_none());

        // 迹守恒
        let trace: f64 = energies.iter().sum();
        assert!((trace - (1.0 - 1.5 + 0.3 + 2.1)).abs() < 1e-10);
    }

    #[test]
    fn test_reconstruction_from_eigenpairs() {
        let h = sample_hermitian();
        let solution = Eigensolver::new().solve(&h, true).unwrap();

        let vectors = solution.vectors().unwrap();
        let diag = HamiltonianMatrix::from_diagonal(&nalgebra::DVector::from_iterator(
            4,
            solution.energies().iter().map(|&e| c(e, 0.0)),
        ));
        let rebuilt = vectors * diag * vectors.adjoint();

        let err = (&rebuilt - &h).iter().map(|z| z.norm()).fold(0.0, f64::max);
        assert!(err < 1e-10, "reconstruction error {err}");
    }

    #[test]
    fn test_values_match_vector_solve() {
        let h = sample_hermitian();
        let solver = Eigensolver::new();
        let values = solver.solve(&h, false).unwrap().into_energies();
        let with_vectors = solver.solve(&h, true).unwrap().into_energies();

        for (a, b) in values.iter().zip(&with_vectors) {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn test_non_hermitian_rejected() {
        let mut h = sample_hermitian();
        h[(0, 1)] = c(0.5, 0.4);

        let err = Eigensolver::new().solve(&h, false).unwrap_err();
        match err {
            TbError::NumericalInconsistency { deviation, .. } => {
                assert!((deviation - 0.1).abs() < 1e-12)
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_tolerance_is_configurable() {
        let mut h = sample_hermitian();
        h[(2, 3)] = c(-0.6, 1e-7);

        assert!(Eigensolver::new().solve(&h, false).is_err());
        assert!(Eigensolver::new()
            .with_tolerance(1e-6)
            .solve(&h, false)
            .is_ok());
    }

    #[test]
    fn test_nan_hamiltonian_rejected() {
        let mut h = HamiltonianMatrix::zeros(1, 1);
        h[(0, 0)] = c(f64::NAN, 0.0);
        assert!(hermiticity_deviation(&h).is_nan());
        assert!(matches!(
            Eigensolver::new().solve(&h, false),
            Err(TbError::NumericalInconsistency { .. })
        ));

        let mut h = sample_hermitian();
        h[(1, 2)] = c(0.4, f64::NAN);
        assert!(matches!(
            Eigensolver::new().solve(&h, true),
            Err(TbError::NumericalInconsistency { .. })
        ));
    }

    #[test]
    fn test_non_square_rejected() {
        let h = HamiltonianMatrix::zeros(2, 3);
        assert!(matches!(
            Eigensolver::new().solve(&h, false),
            Err(TbError::Configuration(_))
        ));
    }

    #[test]
    fn test_mock_backend_sorting_permutes_vectors() {
        let h = HamiltonianMatrix::from_diagonal(&nalgebra::DVector::from_vec(vec![
            c(3.0, 0.0),
            c(-1.0, 0.0),
            c(2.0, 0.0),
        ]));
        let solver = Eigensolver::with_backend(DiagonalBackend);
        let solution = solver.solve(&h, true).unwrap();

        assert_eq!(solution.energies(), &[-1.0, 2.0, 3.0]);

        // 排序后第 n 列应是原来第 order[n] 列的单位向量
        let vectors = solution.vectors().unwrap();
        let expected_rows = [1, 2, 0];
        for (col, &row) in expected_rows.iter().enumerate() {
            assert_eq!(vectors[(row, col)], c(1.0, 0.0));
        }
    }

    #[test]
    fn test_hermiticity_deviation() {
        assert!(hermiticity_deviation(&sample_hermitian()) < 1e-15);

        let mut h = HamiltonianMatrix::zeros(2, 2);
        h[(0, 0)] = c(1.0, 0.5);
        assert!((hermiticity_deviation(&h) - 1.0).abs() < 1e-15);
    }
}
