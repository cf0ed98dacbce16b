//! # tbands - 紧束缚能带计算命令行工具
//!
//! ## 子命令
//! - `info`  - 模型概要与跃迁表检查
//! - `solve` - 单个 k 点求解
//! - `kpath` - 生成 k 路径
//! - `bands` - 沿 k 路径计算能带
//! - `mesh`  - 均匀 k 网格上计算能带
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   └── tbands      (库：models/, tb/, batch/, bands/, utils/)
//! ```

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use tbands::utils::output;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
