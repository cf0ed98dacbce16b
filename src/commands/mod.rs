//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `tbands::tb`, `tbands::bands`, `tbands::batch`, `tbands::utils`
//! - 子模块: info, solve, kpath, bands, mesh

pub mod bands;
pub mod info;
pub mod kpath;
pub mod mesh;
pub mod solve;

use crate::cli::{Commands, ModelArgs};
use tbands::error::Result;
use tbands::utils::output;
use tbands::{Eigensolver, TbModel};

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Info(args) => info::execute(args),
        Commands::Solve(args) => solve::execute(args),
        Commands::Kpath(args) => kpath::execute(args),
        Commands::Bands(args) => bands::execute(args),
        Commands::Mesh(args) => mesh::execute(args),
    }
}

/// 读取模型并按参数配置求解器
fn load_model(args: &ModelArgs) -> Result<(TbModel, Eigensolver)> {
    let model = TbModel::load(&args.model)?;
    output::print_info(&format!(
        "Loaded model '{}': {} orbitals, dim_k = {}, {} shells",
        model.name().unwrap_or("unnamed"),
        model.norb(),
        model.dim_k(),
        model.hoppings().len()
    ));

    let solver = Eigensolver::new().with_tolerance(args.tolerance);
    Ok((model, solver))
}

/// 格式化约化坐标
fn format_k(k: &[f64]) -> String {
    let parts: Vec<String> = k.iter().map(|x| format!("{:.4}", x)).collect();
    format!("({})", parts.join(", "))
}
