//! # 紧束缚模型
//!
//! 持有校验后的晶格、轨道、跃迁表，构造完成后只读。
//! 在任意约化 k 点上通过 Bloch 求和组装哈密顿量：
//!
//! ```text
//! H_ij(k) = Σ_R  t_ij(R) · exp(2πi k·(τ_j − τ_i + R)) / deg(R)
//! ```
//!
//! 哈密顿量每次调用都从头计算，不做缓存；模型本身是 `Send + Sync`，
//! 不同 k 点可以在任意线程上并行求解。
//!
//! ## 依赖关系
//! - 使用 `models/` 的数据结构与 `models/geometry.rs` 的校验
//! - 被 `tb/eigen.rs`, `tb/kmesh.rs`, `tb/kpath.rs`, `batch/`, `commands/` 使用

use crate::error::{Result, TbError};
use crate::models::geometry::{self, RealArray, DIM_R};
use crate::models::{HoppingTable, Lattice, ModelFile, OrbitalSet, PartnerMismatch};
use crate::tb::eigen::{EigenBackend, Eigensolver, Solution};

use nalgebra::DMatrix;
use num_complex::Complex64;
use std::f64::consts::PI;
use std::path::Path;

/// Bloch 哈密顿量（N x N 复矩阵）
pub type HamiltonianMatrix = DMatrix<Complex64>;

/// 紧束缚模型
#[derive(Debug, Clone)]
pub struct TbModel {
    name: Option<String>,
    lattice: Lattice,
    orbitals: OrbitalSet,
    nspin: u8,
    /// 周期方向（晶格向量下标），长度即 dim_k
    periodic: Vec<usize>,
    hoppings: HoppingTable,
}

impl TbModel {
    /// 三个方向均为周期的模型
    pub fn new(
        lattice: Lattice,
        orbitals: OrbitalSet,
        nspin: u8,
        hoppings: HoppingTable,
    ) -> Result<Self> {
        Self::with_periodic(lattice, orbitals, nspin, &[0, 1, 2], hoppings)
    }

    /// 指定周期方向的模型（例如 `[0]` 为一维链，`[0, 1]` 为二维薄片）
    pub fn with_periodic(
        lattice: Lattice,
        orbitals: OrbitalSet,
        nspin: u8,
        periodic: &[usize],
        hoppings: HoppingTable,
    ) -> Result<Self> {
        let nspin = geometry::validate_nspin(nspin)?;
        let periodic = geometry::validate_periodic(periodic)?;
        geometry::validate_hoppings(&hoppings, orbitals.len(), &periodic)?;

        Ok(TbModel {
            name: None,
            lattice,
            orbitals,
            nspin,
            periodic,
            hoppings,
        })
    }

    /// 从未校验的原始数组构造（Wannier90 读取端产出的形式）
    pub fn from_raw(
        lattice: &RealArray,
        orbitals: &RealArray,
        nspin: u8,
        periodic: Option<&[usize]>,
        hoppings: HoppingTable,
    ) -> Result<Self> {
        let lattice = geometry::validate_lattice(lattice)?;
        let orbitals = geometry::validate_orbitals(orbitals)?;
        Self::with_periodic(
            lattice,
            orbitals,
            nspin,
            periodic.unwrap_or(&[0, 1, 2]),
            hoppings,
        )
    }

    /// 从 JSON 模型描述构造
    pub fn from_model_file(file: ModelFile) -> Result<Self> {
        let model = Self::from_raw(
            &file.lattice,
            &file.orbitals,
            file.nspin,
            file.periodic.as_deref(),
            HoppingTable::new(file.shells),
        )?;
        Ok(match file.name {
            Some(name) => model.with_name(name),
            None => model,
        })
    }

    /// 读取 JSON 模型文件
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_model_file(ModelFile::load(path)?)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // ─────────────────────────────────────────────────────────────
    // 只读访问
    // ─────────────────────────────────────────────────────────────

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn orbitals(&self) -> &OrbitalSet {
        &self.orbitals
    }

    pub fn hoppings(&self) -> &HoppingTable {
        &self.hoppings
    }

    /// 轨道数 N（哈密顿量维数）
    pub fn norb(&self) -> usize {
        self.orbitals.len()
    }

    /// 自旋重数标记（1 或 2），不影响哈密顿量维数
    pub fn nspin(&self) -> u8 {
        self.nspin
    }

    /// 实空间维数
    pub fn dim_r(&self) -> usize {
        DIM_R
    }

    /// 倒空间（周期）维数
    pub fn dim_k(&self) -> usize {
        self.periodic.len()
    }

    pub fn periodic(&self) -> &[usize] {
        &self.periodic
    }

    // ─────────────────────────────────────────────────────────────
    // 哈密顿量
    // ─────────────────────────────────────────────────────────────

    /// 在约化坐标 k 点组装 Bloch 哈密顿量
    pub fn hamiltonian(&self, k: &[f64]) -> Result<HamiltonianMatrix> {
        if k.is_empty() {
            return Err(TbError::config("have to provide a k-vector"));
        }
        if k.len() != self.dim_k() {
            return Err(TbError::config(format!(
                "k-vector has {} components but model has {} periodic directions",
                k.len(),
                self.dim_k()
            )));
        }

        let n = self.norb();
        let mut ham = HamiltonianMatrix::zeros(n, n);

        for shell in self.hoppings.shells() {
            let deg = f64::from(shell.degeneracy);
            for e in &shell.elements {
                let tau_i = self.orbitals.position(e.i);
                let tau_j = self.orbitals.position(e.j);

                // k·d，只取周期方向分量
                let k_dot_d: f64 = self
                    .periodic
                    .iter()
                    .zip(k)
                    .map(|(&dir, &k_dir)| {
                        k_dir * (tau_j[dir] - tau_i[dir] + f64::from(shell.r[dir]))
                    })
                    .sum();

                let phase = Complex64::from_polar(1.0, 2.0 * PI * k_dot_d);
                ham[(e.i, e.j)] += e.amplitude * phase / deg;
            }
        }

        Ok(ham)
    }

    /// 组装并求解 k 点的哈密顿量
    pub fn solve_at<B: EigenBackend>(
        &self,
        solver: &Eigensolver<B>,
        k: &[f64],
        want_vectors: bool,
    ) -> Result<Solution> {
        let ham = self.hamiltonian(k)?;
        solver.solve(&ham, want_vectors)
    }

    /// 检查跃迁表是否逐项满足厄米共轭配对
    ///
    /// 构造时不强制此检查；`Eigensolver::solve` 只检查组装后的矩阵。
    pub fn check_conjugate_partners(&self, tolerance: f64) -> Vec<PartnerMismatch> {
        self.hoppings.conjugate_mismatches(tolerance)
    }
}
