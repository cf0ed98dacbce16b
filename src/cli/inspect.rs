//! # info / solve 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/info.rs`, `commands/solve.rs`

use super::ModelArgs;
use clap::Args;

/// info 子命令参数
#[derive(Args, Debug)]
pub struct InfoArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// Number of hopping shells to list
    #[arg(long, default_value_t = 10)]
    pub shells: usize,

    /// Tolerance for the conjugate-partner check of the hopping table
    #[arg(long, default_value_t = 1e-8)]
    pub partner_tolerance: f64,
}

/// solve 子命令参数
#[derive(Args, Debug)]
pub struct SolveArgs {
    #[command(flatten)]
    pub model: ModelArgs,

    /// k-point in reduced coordinates, one component per periodic direction (e.g., "0.5,0,0")
    #[arg(short, long, allow_hyphen_values = true)]
    pub k: String,

    /// Also print orbital weights |psi_i|^2 of each eigenvector
    #[arg(long, default_value_t = false)]
    pub vectors: bool,
}
