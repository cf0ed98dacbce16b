//! # kpath / bands / mesh 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/kpath.rs`, `commands/bands.rs`, `commands/mesh.rs`

use super::ModelArgs;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tbands::KNodes;

/// 能带数据输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum BandFormat {
    /// CSV table, one row per k-point
    Csv,
    /// gnuplot-style blocks, one block per band
    Dat,
}

impl std::fmt::Display for BandFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BandFormat::Csv => write!(f, "csv"),
            BandFormat::Dat => write!(f, "dat"),
        }
    }
}

// ─────────────────────────────────────────────────────────────
// k 路径
// ─────────────────────────────────────────────────────────────

/// k 路径参数
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Path nodes: 'full', 'fullc', 'half' (1D models) or "x,y,z; x,y,z; ..."
    #[arg(short, long, allow_hyphen_values = true)]
    pub nodes: KNodes,

    /// Number of k-points along the whole path
    #[arg(long, default_value_t = 101)]
    pub nk: usize,
}

/// kpath 子命令参数
#[derive(Args, Debug)]
pub struct KpathArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub path: PathArgs,

    /// Write the interpolated k-points to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// bands 子命令参数
#[derive(Args, Debug)]
pub struct BandsArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    #[command(flatten)]
    pub path: PathArgs,

    /// Output file
    #[arg(short, long, default_value = "bands.csv")]
    pub output: PathBuf,

    /// Output format (auto-detected from extension if not specified)
    #[arg(short, long, value_enum)]
    pub format: Option<BandFormat>,

    /// Print the k-path diagnostic report
    #[arg(long, default_value_t = false)]
    pub report: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}

// ─────────────────────────────────────────────────────────────
// k 网格
// ─────────────────────────────────────────────────────────────

/// mesh 子命令参数
#[derive(Args, Debug)]
pub struct MeshArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Mesh size per periodic direction (e.g., "10x10x10")
    #[arg(long)]
    pub mesh: String,

    /// Write eigenvalues on the mesh to this CSV file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,
}
