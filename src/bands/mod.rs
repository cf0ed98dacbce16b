//! # 能带数据
//!
//! 把 k 点序列与逐点本征值组合成能带结构，供终端汇总和文件导出使用。
//! 能量按 `[k][band]` 存储，band 下标按能量升序。
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs`, `commands/mesh.rs` 使用
//! - 使用 `tb/kpath.rs` 的 KPath
//! - 子模块: export

pub mod export;

use crate::error::{Result, TbError};
use crate::tb::KPath;

/// 能带结构
#[derive(Debug, Clone)]
pub struct BandStructure {
    /// k 点（约化坐标）
    pub kpoints: Vec<Vec<f64>>,
    /// 沿路径的累计距离，网格数据为 None
    pub distances: Option<Vec<f64>>,
    /// 本征值 `[k][band]`
    pub energies: Vec<Vec<f64>>,
    /// 路径节点的累计距离
    pub node_distances: Vec<f64>,
}

impl BandStructure {
    /// 路径能带
    pub fn along_path(path: &KPath, energies: Vec<Vec<f64>>) -> Result<Self> {
        let bands = BandStructure {
            kpoints: path.kpoints.clone(),
            distances: Some(path.distances.clone()),
            energies,
            node_distances: path.node_distances.clone(),
        };
        bands.check_shape()?;
        Ok(bands)
    }

    /// 网格能带
    pub fn on_mesh(kpoints: Vec<Vec<f64>>, energies: Vec<Vec<f64>>) -> Result<Self> {
        let bands = BandStructure {
            kpoints,
            distances: None,
            energies,
            node_distances: Vec::new(),
        };
        bands.check_shape()?;
        Ok(bands)
    }

    fn check_shape(&self) -> Result<()> {
        if self.energies.len() != self.kpoints.len() {
            return Err(TbError::Other(format!(
                "{} eigenvalue sets for {} k-points",
                self.energies.len(),
                self.kpoints.len()
            )));
        }
        let nbands = self.nbands();
        if self.energies.iter().any(|e| e.len() != nbands) {
            return Err(TbError::Other(
                "inconsistent number of bands across k-points".to_string(),
            ));
        }
        Ok(())
    }

    /// k 点数
    pub fn nk(&self) -> usize {
        self.kpoints.len()
    }

    /// 能带数
    pub fn nbands(&self) -> usize {
        self.energies.first().map_or(0, |e| e.len())
    }

    /// k 空间维数
    pub fn dim_k(&self) -> usize {
        self.kpoints.first().map_or(0, |k| k.len())
    }

    /// 第 `n` 条能带在所有 k 点上的能量
    pub fn band(&self, n: usize) -> Vec<f64> {
        self.energies.iter().map(|e| e[n]).collect()
    }

    /// 每条能带的 (最小值, 最大值)
    pub fn band_ranges(&self) -> Vec<(f64, f64)> {
        (0..self.nbands())
            .map(|n| {
                self.energies
                    .iter()
                    .map(|e| e[n])
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                        (lo.min(x), hi.max(x))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BandStructure {
        BandStructure::on_mesh(
            vec![vec![0.0], vec![0.5]],
            vec![vec![-2.0, 1.0], vec![-0.5, 3.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_shape_accessors() {
        let bands = sample();
        assert_eq!(bands.nk(), 2);
        assert_eq!(bands.nbands(), 2);
        assert_eq!(bands.dim_k(), 1);
        assert_eq!(bands.band(1), vec![1.0, 3.0]);
        assert!(bands.distances.is_none());
    }

    #[test]
    fn test_band_ranges() {
        assert_eq!(sample().band_ranges(), vec![(-2.0, -0.5), (1.0, 3.0)]);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        assert!(BandStructure::on_mesh(vec![vec![0.0]], vec![]).is_err());
        assert!(
            BandStructure::on_mesh(vec![vec![0.0], vec![0.5]], vec![vec![1.0], vec![1.0, 2.0]])
                .is_err()
        );
    }
}
