//! # 多 k 点并行求解
//!
//! 在专用 rayon 线程池上对一组 k 点逐点执行"组装 + 对角化"。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，结果顺序与输入 k 点顺序一致
//! - 进度条显示
//! - 任一 k 点失败则整批失败（无部分结果）
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs`, `commands/mesh.rs` 调用
//! - 使用 `tb/` 的 TbModel 与 Eigensolver
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{Result, TbError};
use crate::tb::{EigenBackend, Eigensolver, TbModel};
use crate::utils::progress;

use indicatif::ProgressBar;
use rayon::prelude::*;

/// 能带批量求解器
#[derive(Debug, Clone)]
pub struct BandRunner {
    /// 并行作业数
    jobs: usize,
    /// 是否显示进度条
    progress: bool,
}

impl BandRunner {
    /// 创建求解器，`jobs == 0` 时使用全部 CPU 核
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            jobs,
            progress: true,
        }
    }

    /// 关闭进度条
    pub fn quiet(mut self) -> Self {
        self.progress = false;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 对每个 k 点求升序本征值，返回 `[k][band]`
    pub fn solve_all<B: EigenBackend>(
        &self,
        model: &TbModel,
        solver: &Eigensolver<B>,
        kpoints: &[Vec<f64>],
    ) -> Result<Vec<Vec<f64>>> {
        let pb = if self.progress {
            progress::create_progress_bar(kpoints.len() as u64, "Solving")
        } else {
            ProgressBar::hidden()
        };

        // 配置 rayon 线程池
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| TbError::Other(format!("failed to build thread pool: {}", e)))?;

        let energies: Result<Vec<Vec<f64>>> = pool.install(|| {
            kpoints
                .par_iter()
                .map(|k| {
                    let energies = model.solve_at(solver, k, false)?.into_energies();
                    pb.inc(1);
                    Ok(energies)
                })
                .collect()
        });

        pb.finish_and_clear();
        energies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoppingElement, HoppingTable, Lattice, OrbitalSet, WsShell};
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn chain(t: f64) -> TbModel {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let orbitals = OrbitalSet::new(vec![[0.0; 3]]).unwrap();
        let shell = WsShell::new([1, 0, 0], 1, vec![HoppingElement::real(0, 0, t)]);
        let table = HoppingTable::default()
            .with_shell(shell.clone())
            .with_shell(shell.conjugate());
        TbModel::with_periodic(lattice, orbitals, 1, &[0], table).unwrap()
    }

    #[test]
    fn test_solve_all_preserves_order() {
        let model = chain(-1.0);
        let kpoints: Vec<Vec<f64>> = (0..64).map(|i| vec![i as f64 / 64.0]).collect();

        let energies = BandRunner::new(4)
            .quiet()
            .solve_all(&model, &Eigensolver::new(), &kpoints)
            .unwrap();

        assert_eq!(energies.len(), 64);
        for (k, e) in kpoints.iter().zip(&energies) {
            let expected = -2.0 * (2.0 * PI * k[0]).cos();
            assert!((e[0] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_any_failure_fails_batch() {
        let model = chain(-1.0);
        let kpoints = vec![vec![0.0], vec![0.1, 0.2], vec![0.3]];

        let result = BandRunner::new(2)
            .quiet()
            .solve_all(&model, &Eigensolver::new(), &kpoints);
        assert!(matches!(result, Err(TbError::Configuration(_))));
    }

    #[test]
    fn test_non_hermitian_model_fails_batch() {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let orbitals = OrbitalSet::new(vec![[0.0; 3]]).unwrap();
        // 缺少 -R 配对壳层
        let table = HoppingTable::default().with_shell(WsShell::new(
            [1, 0, 0],
            1,
            vec![HoppingElement::new(0, 0, Complex64::new(-1.0, 0.0))],
        ));
        let model = TbModel::with_periodic(lattice, orbitals, 1, &[0], table).unwrap();

        let result = BandRunner::new(1)
            .quiet()
            .solve_all(&model, &Eigensolver::new(), &[vec![0.0], vec![0.25]]);
        assert!(matches!(
            result,
            Err(TbError::NumericalInconsistency { .. })
        ));
    }

    #[test]
    fn test_zero_jobs_uses_all_cpus() {
        assert_eq!(BandRunner::new(0).jobs(), num_cpus::get());
        assert_eq!(BandRunner::new(3).jobs(), 3);
    }
}
