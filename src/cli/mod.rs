//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `info`: 模型概要与跃迁表检查
//! - `solve`: 单个 k 点求解
//! - `kpath`: 生成 k 路径
//! - `bands`: 沿 k 路径计算能带
//! - `mesh`: 均匀 k 网格上计算能带
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: inspect, sampling

pub mod inspect;
pub mod sampling;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tbands::tb::HERMITICITY_TOLERANCE;

/// tbands - 紧束缚能带计算
#[derive(Parser)]
#[command(name = "tbands")]
#[command(version)]
#[command(about = "Tight-binding band structures from Wannier-style hopping tables", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Show lattice, orbitals and hopping summary of a model
    Info(inspect::InfoArgs),

    /// Build and diagonalize the Bloch Hamiltonian at a single k-point
    Solve(inspect::SolveArgs),

    /// Interpolate a k-path through high-symmetry nodes
    Kpath(sampling::KpathArgs),

    /// Compute the band structure along a k-path
    Bands(sampling::BandsArgs),

    /// Compute eigenvalues on a uniform k-mesh
    Mesh(sampling::MeshArgs),
}

// ─────────────────────────────────────────────────────────────
// 公共参数
// ─────────────────────────────────────────────────────────────

/// 模型输入参数
#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Path to the JSON model description
    #[arg(short, long, env = "TBANDS_MODEL")]
    pub model: PathBuf,

    /// Hermiticity tolerance for max |H - H^dagger|
    #[arg(long, default_value_t = HERMITICITY_TOLERANCE)]
    pub tolerance: f64,
}

/// 解析 k 向量 (e.g., "0.5,0,0" 或 "0.5 0 0")
pub fn parse_kvector(input: &str) -> Result<Vec<f64>, String> {
    let values: Vec<f64> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| format!("Invalid k-vector component '{}' in '{}'", s, input))
        })
        .collect::<Result<_, _>>()?;

    if values.is_empty() {
        return Err(format!("Empty k-vector '{}'", input));
    }
    Ok(values)
}

/// 解析网格尺寸 (e.g., "10x10x10" 或 "10,10")
pub fn parse_mesh(input: &str) -> Result<Vec<usize>, String> {
    let dims: Vec<usize> = input
        .split(|c: char| c == 'x' || c == 'X' || c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| format!("Invalid mesh size '{}' in '{}'", s, input))
        })
        .collect::<Result<_, _>>()?;

    if dims.is_empty() {
        return Err(format!("Empty mesh specification '{}'", input));
    }
    Ok(dims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kvector() {
        assert_eq!(parse_kvector("0.5,0,0").unwrap(), vec![0.5, 0.0, 0.0]);
        assert_eq!(parse_kvector(" -0.25  0.5 ").unwrap(), vec![-0.25, 0.5]);
        assert!(parse_kvector("0.5,a").is_err());
        assert!(parse_kvector(" , ").is_err());
    }

    #[test]
    fn test_parse_mesh() {
        assert_eq!(parse_mesh("10x10x4").unwrap(), vec![10, 10, 4]);
        assert_eq!(parse_mesh("8,8").unwrap(), vec![8, 8]);
        assert_eq!(parse_mesh("12").unwrap(), vec![12]);
        assert!(parse_mesh("4x-1").is_err());
        assert!(parse_mesh("").is_err());
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
