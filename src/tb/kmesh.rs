//! # 均匀 k 网格
//!
//! 在 1–3 个周期方向上生成均匀有理网格 `{0, 1/n, ..., (n-1)/n}` 的笛卡尔积。
//! 行优先排列（最后一个方向变化最快），因此结果可以直接 reshape 回网格；
//! 原点（Γ 点）总是第一个点且只出现一次。
//!
//! ## 依赖关系
//! - 被 `commands/mesh.rs` 使用
//! - 无外部模块依赖

use crate::error::{Result, TbError};
use crate::tb::TbModel;

/// 网格最大维数
pub const MAX_MESH_DIM: usize = 3;

/// 生成均匀 k 网格（约化坐标）
pub fn uniform_mesh(dims: &[usize]) -> Result<Vec<Vec<f64>>> {
    if dims.is_empty() || dims.len() > MAX_MESH_DIM {
        return Err(TbError::config(format!(
            "incorrect size of the specified k-mesh: expected 1 to {} entries, got {}",
            MAX_MESH_DIM,
            dims.len()
        )));
    }
    if dims.iter().any(|&n| n == 0) {
        return Err(TbError::config(format!(
            "mesh must have positive non-zero number of elements: {:?}",
            dims
        )));
    }

    let total = dims
        .iter()
        .try_fold(1_usize, |acc, &n| acc.checked_mul(n))
        .ok_or_else(|| {
            TbError::config(format!("k-mesh {:?} has too many points", dims))
        })?;
    let mut kpoints = Vec::with_capacity(total);

    for flat in 0..total {
        let mut k = vec![0.0; dims.len()];
        let mut rest = flat;
        // 从最后一维开始拆分扁平下标
        for (d, &n) in dims.iter().enumerate().rev() {
            k[d] = (rest % n) as f64 / n as f64;
            rest /= n;
        }
        kpoints.push(k);
    }

    Ok(kpoints)
}

impl TbModel {
    /// 模型周期维度上的均匀 k 网格
    pub fn k_uniform_mesh(&self, dims: &[usize]) -> Result<Vec<Vec<f64>>> {
        if dims.len() != self.dim_k() {
            return Err(TbError::config(format!(
                "incorrect size of the specified k-mesh: model has {} periodic directions, got {:?}",
                self.dim_k(),
                dims
            )));
        }
        uniform_mesh(dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HoppingTable, Lattice, OrbitalSet};

    #[test]
    fn test_mesh_size_and_origin() {
        let mesh = uniform_mesh(&[2, 3, 4]).unwrap();
        assert_eq!(mesh.len(), 24);

        let origins = mesh
            .iter()
            .filter(|k| k.iter().all(|&x| x == 0.0))
            .count();
        assert_eq!(origins, 1);
        assert!(mesh[0].iter().all(|&x| x == 0.0));

        assert!(mesh
            .iter()
            .flatten()
            .all(|&x| (0.0..1.0).contains(&x)));
    }

    #[test]
    fn test_mesh_row_major_order() {
        let mesh = uniform_mesh(&[2, 3]).unwrap();
        let expected = [
            [0.0, 0.0],
            [0.0, 1.0 / 3.0],
            [0.0, 2.0 / 3.0],
            [0.5, 0.0],
            [0.5, 1.0 / 3.0],
            [0.5, 2.0 / 3.0],
        ];
        for (k, e) in mesh.iter().zip(expected.iter()) {
            assert!((k[0] - e[0]).abs() < 1e-15);
            assert!((k[1] - e[1]).abs() < 1e-15);
        }
    }

    #[test]
    fn test_mesh_one_dimensional() {
        let mesh = uniform_mesh(&[4]).unwrap();
        let values: Vec<f64> = mesh.iter().map(|k| k[0]).collect();
        assert_eq!(values, vec![0.0, 0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_mesh_rejects_bad_dims() {
        assert!(matches!(uniform_mesh(&[]), Err(TbError::Configuration(_))));
        assert!(matches!(
            uniform_mesh(&[2, 0, 2]),
            Err(TbError::Configuration(_))
        ));
        assert!(matches!(
            uniform_mesh(&[1, 1, 1, 1]),
            Err(TbError::Configuration(_))
        ));
        assert!(matches!(
            uniform_mesh(&[usize::MAX, 2, 1]),
            Err(TbError::Configuration(_))
        ));
    }

    #[test]
    fn test_model_mesh_dimension_check() {
        let lattice = Lattice::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let orbitals = OrbitalSet::new(vec![[0.0; 3]]).unwrap();
        let model =
            TbModel::with_periodic(lattice, orbitals, 1, &[0, 1], HoppingTable::default())
                .unwrap();

        assert_eq!(model.k_uniform_mesh(&[3, 3]).unwrap().len(), 9);
        assert!(matches!(
            model.k_uniform_mesh(&[3, 3, 3]),
            Err(TbError::Configuration(_))
        ));
    }
}
