//! # k 路径插值
//!
//! 在高对称点（节点）之间生成近似等距的 k 点序列。
//!
//! ## 算法概述
//! 1. 倒空间度规 G = (L·Lᵀ)⁻¹，L 为周期方向的晶格向量，
//!    约化坐标差 Δk 的笛卡尔长度为 sqrt(Δkᵀ·G·Δk)（2π 因子已吸收）
//! 2. 累计节点距离 node_dist
//! 3. 节点在输出序列中的下标按累计距离比例取整分配，首节点为 0，末节点为 nk−1
//! 4. 每段按下标比例对 k 向量与累计距离做线性插值
//!
//! 坐标返回约化坐标，可以直接交给 `TbModel::hamiltonian`；距离带量纲，
//! 用于画能带图的横轴。
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs`, `commands/kpath.rs` 调用
//! - 使用 `tb/model.rs` 的 TbModel
//! - 使用 `utils/output.rs` 打印诊断报告
//! - 使用 `nalgebra` 计算度规张量

use crate::error::{Result, TbError};
use crate::tb::TbModel;
use crate::utils::output;

use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::str::FromStr;

/// 相邻节点间的最小距离，低于此值视为重合
pub const MIN_SEGMENT_LENGTH: f64 = 1.0e-12;

/// 路径节点
#[derive(Debug, Clone, PartialEq)]
pub enum KNodes {
    /// 一维完整布里渊区 [0, 0.5, 1]
    Full,
    /// 一维居中完整布里渊区 [-0.5, 0, 0.5]
    FullCentered,
    /// 一维半个布里渊区 [0, 0.5]
    Half,
    /// 显式节点（约化坐标）
    Points(Vec<Vec<f64>>),
}

impl KNodes {
    /// 展开为节点坐标列表并检查维数
    pub fn resolve(&self, dim_k: usize) -> Result<Vec<Vec<f64>>> {
        let preset = |values: &[f64]| -> Result<Vec<Vec<f64>>> {
            if dim_k != 1 {
                return Err(TbError::config(format!(
                    "symbolic k-path '{}' is only defined for 1D k-space, model has dim_k = {}",
                    self, dim_k
                )));
            }
            Ok(values.iter().map(|&k| vec![k]).collect())
        };

        match self {
            KNodes::Full => preset(&[0.0, 0.5, 1.0]),
            KNodes::FullCentered => preset(&[-0.5, 0.0, 0.5]),
            KNodes::Half => preset(&[0.0, 0.5]),
            KNodes::Points(points) => {
                if let Some(bad) = points.iter().find(|p| p.len() != dim_k) {
                    return Err(TbError::config(format!(
                        "k-space dimensions do not match: node has {} components, model has dim_k = {}",
                        bad.len(),
                        dim_k
                    )));
                }
                Ok(points.clone())
            }
        }
    }
}

impl fmt::Display for KNodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KNodes::Full => write!(f, "full"),
            KNodes::FullCentered => write!(f, "fullc"),
            KNodes::Half => write!(f, "half"),
            KNodes::Points(points) => {
                let nodes: Vec<String> = points
                    .iter()
                    .map(|p| {
                        p.iter()
                            .map(|x| x.to_string())
                            .collect::<Vec<_>>()
                            .join(",")
                    })
                    .collect();
                write!(f, "{}", nodes.join("; "))
            }
        }
    }
}

impl FromStr for KNodes {
    type Err = TbError;

    /// 解析 `full` / `fullc` / `half`，或 `"x,y,z; x,y,z; ..."`
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "full" => return Ok(KNodes::Full),
            "fullc" => return Ok(KNodes::FullCentered),
            "half" => return Ok(KNodes::Half),
            _ => {}
        }

        let mut points = Vec::new();
        for node in s.split(';').map(str::trim).filter(|n| !n.is_empty()) {
            let coords = node
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|c| !c.is_empty())
                .map(|c| {
                    c.parse::<f64>().map_err(|_| {
                        TbError::InvalidArgument(format!(
                            "invalid k-point coordinate '{}' in node '{}'",
                            c, node
                        ))
                    })
                })
                .collect::<Result<Vec<f64>>>()?;
            points.push(coords);
        }

        if points.is_empty() {
            return Err(TbError::InvalidArgument(format!("empty k-path: '{}'", s)));
        }
        Ok(KNodes::Points(points))
    }
}

/// 插值后的 k 路径
#[derive(Debug, Clone)]
pub struct KPath {
    /// 节点（约化坐标）
    pub nodes: Vec<Vec<f64>>,
    /// 插值 k 点（约化坐标），长度 nk
    pub kpoints: Vec<Vec<f64>>,
    /// 每个 k 点的累计距离
    pub distances: Vec<f64>,
    /// 每个节点的累计距离
    pub node_distances: Vec<f64>,
    /// 每个节点在 `kpoints` 中的下标
    pub node_indices: Vec<usize>,
    /// 倒空间度规张量 (dim_k x dim_k)
    pub metric: DMatrix<f64>,
}

impl KPath {
    pub fn len(&self) -> usize {
        self.kpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kpoints.is_empty()
    }

    /// 路径总长度
    pub fn total_length(&self) -> f64 {
        self.node_distances.last().copied().unwrap_or(0.0)
    }

    /// 诊断报告（只读，不影响路径数据）
    pub fn report(&self, model: &TbModel) -> PathReport {
        PathReport::new(model, self)
    }
}

impl TbModel {
    /// 倒空间度规张量 G = (L·Lᵀ)⁻¹
    pub fn k_metric(&self) -> Result<DMatrix<f64>> {
        let lattice = self.lattice().matrix();
        let periodic = self.periodic();
        let lat_per = DMatrix::from_fn(periodic.len(), 3, |r, c| lattice[periodic[r]][c]);

        (&lat_per * lat_per.transpose())
            .try_inverse()
            .ok_or_else(|| TbError::config("periodic lattice vectors are linearly dependent"))
    }

    /// 生成穿过 `nodes` 的 k 路径，共 `nk` 个点
    pub fn k_path(&self, nodes: &KNodes, nk: usize, report: bool) -> Result<KPath> {
        let dim_k = self.dim_k();
        let k_list = nodes.resolve(dim_k)?;
        let n_nodes = k_list.len();

        if n_nodes < 2 {
            return Err(TbError::config(format!(
                "k-path needs at least two nodes, got {}",
                n_nodes
            )));
        }
        if nk < n_nodes {
            return Err(TbError::config(format!(
                "must have more points in the path ({}) than number of nodes ({})",
                nk, n_nodes
            )));
        }

        let metric = self.k_metric()?;

        // 累计节点距离
        let mut node_distances = vec![0.0; n_nodes];
        for n in 1..n_nodes {
            let dk = DVector::from_fn(dim_k, |d, _| k_list[n][d] - k_list[n - 1][d]);
            let length = dk.dot(&(&metric * &dk)).max(0.0).sqrt();
            if length < MIN_SEGMENT_LENGTH {
                return Err(TbError::config(format!(
                    "k-path nodes {} and {} coincide ({:?}); zero-length segments are not allowed",
                    n - 1,
                    n,
                    k_list[n]
                )));
            }
            node_distances[n] = node_distances[n - 1] + length;
        }

        // 节点下标
        let total = node_distances[n_nodes - 1];
        let last = nk - 1;
        let mut node_indices = Vec::with_capacity(n_nodes);
        node_indices.push(0);
        for &dist in &node_distances[1..n_nodes - 1] {
            let frac = dist / total;
            node_indices.push((frac * last as f64).round_ties_even() as usize);
        }
        node_indices.push(last);

        // 分段线性插值
        let mut kpoints = vec![vec![0.0; dim_k]; nk];
        let mut distances = vec![0.0; nk];
        for n in 1..n_nodes {
            let (n_i, n_f) = (node_indices[n - 1], node_indices[n]);
            let (kd_i, kd_f) = (node_distances[n - 1], node_distances[n]);
            let (k_i, k_f) = (&k_list[n - 1], &k_list[n]);

            for j in n_i..=n_f {
                if j == n_f {
                    // 段长被取整压缩为 0 时，该下标取段终点
                    kpoints[j] = k_f.clone();
                    distances[j] = kd_f;
                    continue;
                }
                let frac = (j - n_i) as f64 / (n_f - n_i) as f64;
                distances[j] = kd_i + frac * (kd_f - kd_i);
                kpoints[j] = k_i
                    .iter()
                    .zip(k_f)
                    .map(|(a, b)| a + frac * (b - a))
                    .collect();
            }
        }
        kpoints[0] = k_list[0].clone();
        distances[0] = 0.0;

        let path = KPath {
            nodes: k_list,
            kpoints,
            distances,
            node_distances,
            node_indices,
            metric,
        };

        if report {
            output::print_report(&path.report(self).to_string());
        }

        Ok(path)
    }
}

// ─────────────────────────────────────────────────────────────
// 诊断报告
// ─────────────────────────────────────────────────────────────

/// k 路径诊断报告
#[derive(Debug, Clone)]
pub struct PathReport {
    dim_k: usize,
    lattice: Vec<Vec<f64>>,
    metric: Vec<Vec<f64>>,
    nodes: Vec<Vec<f64>>,
    /// 仅在 dim_k == 3 时给出
    reciprocal: Option<Vec<Vec<f64>>>,
    cartesian_nodes: Option<Vec<Vec<f64>>>,
    segment_lengths: Vec<f64>,
    node_distances: Vec<f64>,
    node_indices: Vec<usize>,
}

impl PathReport {
    pub fn new(model: &TbModel, path: &KPath) -> Self {
        let dim_k = model.dim_k();
        let lattice: Vec<Vec<f64>> = model
            .periodic()
            .iter()
            .map(|&d| model.lattice().vector(d).to_vec())
            .collect();
        let metric = (0..path.metric.nrows())
            .map(|r| path.metric.row(r).iter().copied().collect())
            .collect();

        let (reciprocal, cartesian_nodes) = if dim_k == 3 {
            let recip = model.lattice().reciprocal();
            let cart = path
                .nodes
                .iter()
                .map(|k| {
                    (0..3)
                        .map(|c| (0..3).map(|d| k[d] * recip[d][c]).sum())
                        .collect()
                })
                .collect();
            (Some(recip.iter().map(|r| r.to_vec()).collect()), Some(cart))
        } else {
            (None, None)
        };

        let segment_lengths = path.node_distances.windows(2).map(|w| w[1] - w[0]).collect();

        PathReport {
            dim_k,
            lattice,
            metric,
            nodes: path.nodes.clone(),
            reciprocal,
            cartesian_nodes,
            segment_lengths,
            node_distances: path.node_distances.clone(),
            node_indices: path.node_indices.clone(),
        }
    }
}

fn fmt_vec(v: &[f64]) -> String {
    let items: Vec<String> = v.iter().map(|x| format!("{:9.5}", x)).collect();
    format!("[{}]", items.join(" "))
}

fn fmt_rows(f: &mut fmt::Formatter<'_>, rows: &[Vec<f64>]) -> fmt::Result {
    for row in rows {
        writeln!(f, "  {}", fmt_vec(row))?;
    }
    Ok(())
}

impl fmt::Display for PathReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dim_k == 1 {
            let nodes: Vec<f64> = self.nodes.iter().map(|k| k[0]).collect();
            return writeln!(f, " Path in 1D BZ defined by nodes at {}", fmt_vec(&nodes));
        }

        writeln!(f, "----- k_path report begin ----------")?;
        writeln!(f, "real-space lattice vectors")?;
        fmt_rows(f, &self.lattice)?;
        writeln!(f, "k-space metric tensor")?;
        fmt_rows(f, &self.metric)?;
        writeln!(f, "internal coordinates of nodes")?;
        fmt_rows(f, &self.nodes)?;
        if let (Some(recip), Some(cart)) = (&self.reciprocal, &self.cartesian_nodes) {
            writeln!(f, "reciprocal-space lattice vectors")?;
            fmt_rows(f, recip)?;
            writeln!(f, "cartesian coordinates of nodes")?;
            fmt_rows(f, cart)?;
        }
        writeln!(f, "list of segments:")?;
        for (n, length) in self.segment_lengths.iter().enumerate() {
            writeln!(
                f,
                "  length = {:>10.5}  from {} to {}",
                length,
                fmt_vec(&self.nodes[n]),
                fmt_vec(&self.nodes[n + 1])
            )?;
        }
        writeln!(f, "node distance list: {}", fmt_vec(&self.node_distances))?;
        writeln!(f, "node index list:    {:?}", self.node_indices)?;
        writeln!(f, "----- k_path report end ------------")
    }
}
