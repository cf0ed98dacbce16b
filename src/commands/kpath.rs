//! # kpath 子命令实现
//!
//! 生成 k 路径，打印诊断报告与节点表，可选导出 k 点坐标。
//!
//! ## 依赖关系
//! - 使用 `cli/sampling.rs` 定义的 KpathArgs
//! - 使用 `tbands::tb::kpath`
//! - 使用 `bands/export.rs` 导出

use crate::cli::sampling::KpathArgs;
use tbands::bands::export;
use tbands::error::Result;
use tbands::utils::output;

use tabled::{Table, Tabled};

/// 节点表行
#[derive(Debug, Clone, Tabled)]
struct NodeRow {
    #[tabled(rename = "Node")]
    node: usize,
    #[tabled(rename = "k (reduced)")]
    k: String,
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Distance")]
    distance: String,
}

/// 执行 kpath
pub fn execute(args: KpathArgs) -> Result<()> {
    output::print_header("K-Path Interpolation");

    let (model, _) = super::load_model(&args.model)?;
    let path = model.k_path(&args.path.nodes, args.path.nk, true)?;

    let rows: Vec<NodeRow> = path
        .nodes
        .iter()
        .enumerate()
        .map(|(node, k)| NodeRow {
            node,
            k: super::format_k(k),
            index: path.node_indices[node],
            distance: format!("{:.6}", path.node_distances[node]),
        })
        .collect();
    output::print_header(&format!("{} Nodes", rows.len()));
    println!("{}", Table::new(&rows));

    output::print_success(&format!(
        "{} k-points, total length {:.6}",
        path.len(),
        path.total_length()
    ));

    if let Some(out) = &args.output {
        export::kpath_to_csv(&path, out)?;
        output::print_success(&format!("K-points saved to '{}'", out.display()));
    }

    Ok(())
}
