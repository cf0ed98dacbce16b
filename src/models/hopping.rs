//! # 跃迁表数据模型
//!
//! Wigner-Seitz 壳层列表：每个壳层包含晶格平移 R、简并度权重，
//! 以及矩阵元 `(i, j, t)`，表示 ⟨i,0|H|j,R⟩ = t。
//!
//! 简并度作为除数参与 Bloch 求和，使多个晶胞共享的壳层不被重复计数。
//!
//! ## 依赖关系
//! - 被 `models/geometry.rs` 校验
//! - 被 `tb/model.rs` 用于组装哈密顿量
//! - 被 `models/file.rs` 反序列化

use crate::error::{Result, TbError};

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 单个跃迁矩阵元 ⟨i,0|H|j,R⟩
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoppingElement {
    /// 左矢轨道编号（位于晶胞 0）
    pub i: usize,
    /// 右矢轨道编号（位于晶胞 R）
    pub j: usize,
    /// 复数跃迁振幅，JSON 中写作 `[re, im]`
    pub amplitude: Complex64,
}

impl HoppingElement {
    pub fn new(i: usize, j: usize, amplitude: Complex64) -> Self {
        HoppingElement { i, j, amplitude }
    }

    /// 实数振幅的便捷构造
    pub fn real(i: usize, j: usize, amplitude: f64) -> Self {
        HoppingElement::new(i, j, Complex64::new(amplitude, 0.0))
    }
}

/// Wigner-Seitz 壳层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WsShell {
    /// 晶格平移向量 R（约化坐标，整数）
    pub r: [i32; 3],
    /// 简并度权重（正整数）
    #[serde(default = "default_degeneracy")]
    pub degeneracy: u32,
    /// 该壳层的矩阵元
    pub elements: Vec<HoppingElement>,
}

fn default_degeneracy() -> u32 {
    1
}

impl WsShell {
    pub fn new(r: [i32; 3], degeneracy: u32, elements: Vec<HoppingElement>) -> Self {
        WsShell {
            r,
            degeneracy,
            elements,
        }
    }

    /// 厄米共轭伙伴壳层：R -> -R，(i, j, t) -> (j, i, t*)
    pub fn conjugate(&self) -> WsShell {
        WsShell {
            r: [-self.r[0], -self.r[1], -self.r[2]],
            degeneracy: self.degeneracy,
            elements: self
                .elements
                .iter()
                .map(|e| HoppingElement::new(e.j, e.i, e.amplitude.conj()))
                .collect(),
        }
    }
}

/// 共轭伙伴不匹配的矩阵元
#[derive(Debug, Clone, PartialEq)]
pub struct PartnerMismatch {
    pub r: [i32; 3],
    pub i: usize,
    pub j: usize,
    /// ⟨i,0|H|j,R⟩ / deg 的累计值
    pub value: Complex64,
    /// ⟨j,0|H|i,-R⟩ / deg 的累计值（缺失时为 0）
    pub partner: Complex64,
}

/// 跃迁表（Wigner-Seitz 壳层的有序集合）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HoppingTable {
    shells: Vec<WsShell>,
}

impl HoppingTable {
    pub fn new(shells: Vec<WsShell>) -> Self {
        HoppingTable { shells }
    }

    /// 从三个平行列表构造：简并度、R 向量、每个壳层的矩阵元
    ///
    /// 这是 Wannier90 `_hr.dat` 读取端产出的原始形式。
    pub fn from_lists(
        degeneracies: Vec<u32>,
        r_vectors: Vec<[i32; 3]>,
        elements: Vec<Vec<HoppingElement>>,
    ) -> Result<Self> {
        if degeneracies.len() != r_vectors.len() {
            return Err(TbError::config(format!(
                "len(degeneracies) = {} vs len(r_vectors) = {}",
                degeneracies.len(),
                r_vectors.len()
            )));
        }
        if degeneracies.len() != elements.len() {
            return Err(TbError::config(format!(
                "len(degeneracies) = {} vs len(elements) = {}",
                degeneracies.len(),
                elements.len()
            )));
        }

        let shells = degeneracies
            .into_iter()
            .zip(r_vectors)
            .zip(elements)
            .map(|((deg, r), els)| WsShell::new(r, deg, els))
            .collect();

        Ok(HoppingTable { shells })
    }

    /// 追加壳层（仅在模型构造之前使用）
    pub fn with_shell(mut self, shell: WsShell) -> Self {
        self.shells.push(shell);
        self
    }

    pub fn shells(&self) -> &[WsShell] {
        &self.shells
    }

    pub fn len(&self) -> usize {
        self.shells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// 矩阵元总数
    pub fn num_elements(&self) -> usize {
        self.shells.iter().map(|s| s.elements.len()).sum()
    }

    /// 逐项检查 ⟨i,0|H|j,R⟩ 与 ⟨j,0|H|i,-R⟩* 是否一致
    ///
    /// 同一 (R, i, j) 出现多次时先按 `t / deg` 累加。返回全部不匹配项，
    /// 按 (R, i, j) 排序。
    pub fn conjugate_mismatches(&self, tolerance: f64) -> Vec<PartnerMismatch> {
        let mut terms: BTreeMap<([i32; 3], usize, usize), Complex64> = BTreeMap::new();
        for shell in &self.shells {
            let deg = f64::from(shell.degeneracy);
            for e in &shell.elements {
                *terms.entry((shell.r, e.i, e.j)).or_default() += e.amplitude / deg;
            }
        }

        let mut mismatches = Vec::new();
        for (&(r, i, j), &value) in &terms {
            let neg_r = [-r[0], -r[1], -r[2]];
            let partner = terms
                .get(&(neg_r, j, i))
                .copied()
                .unwrap_or_default();
            if (value - partner.conj()).norm() > tolerance {
                mismatches.push(PartnerMismatch {
                    r,
                    i,
                    j,
                    value,
                    partner,
                });
            }
        }
        mismatches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lists_length_mismatch() {
        let err = HoppingTable::from_lists(vec![1, 1], vec![[0, 0, 0]], vec![vec![], vec![]])
            .unwrap_err();
        assert!(matches!(err, TbError::Configuration(_)));

        let err = HoppingTable::from_lists(vec![1], vec![[0, 0, 0]], vec![]).unwrap_err();
        assert!(matches!(err, TbError::Configuration(_)));
    }

    #[test]
    fn test_from_lists_builds_shells() {
        let table = HoppingTable::from_lists(
            vec![2, 1],
            vec![[0, 0, 0], [1, 0, 0]],
            vec![
                vec![HoppingElement::real(0, 0, 0.5)],
                vec![HoppingElement::real(0, 1, -1.0), HoppingElement::real(1, 0, -1.0)],
            ],
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.num_elements(), 3);
        assert_eq!(table.shells()[0].degeneracy, 2);
        assert_eq!(table.shells()[1].r, [1, 0, 0]);
    }

    #[test]
    fn test_conjugate_shell() {
        let shell = WsShell::new(
            [1, -2, 0],
            3,
            vec![HoppingElement::new(0, 1, Complex64::new(0.3, 0.7))],
        );
        let partner = shell.conjugate();

        assert_eq!(partner.r, [-1, 2, 0]);
        assert_eq!(partner.degeneracy, 3);
        assert_eq!(partner.elements[0].i, 1);
        assert_eq!(partner.elements[0].j, 0);
        assert_eq!(partner.elements[0].amplitude, Complex64::new(0.3, -0.7));
    }

    #[test]
    fn test_conjugate_mismatches() {
        let t = Complex64::new(-1.0, 0.2);
        let shell = WsShell::new([1, 0, 0], 1, vec![HoppingElement::new(0, 0, t)]);

        let complete = HoppingTable::default()
            .with_shell(shell.clone())
            .with_shell(shell.conjugate());
        assert!(complete.conjugate_mismatches(1e-12).is_empty());

        let missing = HoppingTable::default().with_shell(shell);
        let mismatches = missing.conjugate_mismatches(1e-12);
        // (R, 0, 0) 没有伙伴
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].r, [1, 0, 0]);
        assert_eq!(mismatches[0].partner, Complex64::default());
    }

    #[test]
    fn test_conjugate_mismatches_respects_degeneracy() {
        // 同一 R 两份 deg=2 的条目与一份 deg=1 的伙伴等价
        let t = Complex64::new(0.0, 1.0);
        let table = HoppingTable::default()
            .with_shell(WsShell::new([0, 1, 0], 2, vec![HoppingElement::new(0, 1, t)]))
            .with_shell(WsShell::new([0, 1, 0], 2, vec![HoppingElement::new(0, 1, t)]))
            .with_shell(WsShell::new(
                [0, -1, 0],
                1,
                vec![HoppingElement::new(1, 0, t.conj())],
            ));

        assert!(table.conjugate_mismatches(1e-12).is_empty());
    }

    #[test]
    fn test_shell_json_format() {
        let json = r#"{"r": [1, 0, 0], "degeneracy": 2,
                       "elements": [{"i": 0, "j": 1, "amplitude": [-1.0, 0.5]}]}"#;
        let shell: WsShell = serde_json::from_str(json).unwrap();

        assert_eq!(shell.degeneracy, 2);
        assert_eq!(shell.elements[0].amplitude, Complex64::new(-1.0, 0.5));

        let json = r#"{"r": [0, 0, 0], "elements": []}"#;
        let shell: WsShell = serde_json::from_str(json).unwrap();
        assert_eq!(shell.degeneracy, 1);
    }
}
