//! # solve 子命令实现
//!
//! 在单个 k 点组装并对角化哈密顿量，打印能量（可选本征向量的轨道权重）。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的 SolveArgs
//! - 使用 `tbands::tb` 的 TbModel, Eigensolver
//! - 使用 `utils/output.rs`

use crate::cli::{self, inspect::SolveArgs};
use tbands::error::{Result, TbError};
use tbands::tb::{hermiticity_deviation, Solution};
use tbands::utils::output;

use tabled::builder::Builder;
use tabled::{Table, Tabled};

/// 能量表行
#[derive(Debug, Clone, Tabled)]
struct EnergyRow {
    #[tabled(rename = "Band")]
    band: usize,
    #[tabled(rename = "Energy (eV)")]
    energy: String,
}

/// 执行 solve
pub fn execute(args: SolveArgs) -> Result<()> {
    output::print_header("Bloch Hamiltonian Eigenproblem");

    let (model, solver) = super::load_model(&args.model)?;
    let k = cli::parse_kvector(&args.k).map_err(TbError::InvalidArgument)?;

    let ham = model.hamiltonian(&k)?;
    output::print_info(&format!(
        "k = {}: {}x{} Hamiltonian, max |H - H^dagger| = {:.3e}",
        super::format_k(&k),
        ham.nrows(),
        ham.ncols(),
        hermiticity_deviation(&ham)
    ));

    let solution = solver.solve(&ham, args.vectors)?;

    let rows: Vec<EnergyRow> = solution
        .energies()
        .iter()
        .enumerate()
        .map(|(band, e)| EnergyRow {
            band,
            energy: format!("{:.8}", e),
        })
        .collect();
    println!("{}", Table::new(&rows));

    if let Solution::Vectors { vectors, .. } = &solution {
        // 行为轨道，列为能带
        let mut builder = Builder::default();
        let mut header = vec!["Orbital".to_string()];
        header.extend((0..vectors.ncols()).map(|n| format!("|ψ{}|²", n)));
        builder.push_record(header);
        for orb in 0..vectors.nrows() {
            let mut record = vec![orb.to_string()];
            record.extend(
                (0..vectors.ncols()).map(|n| format!("{:.4}", vectors[(orb, n)].norm_sqr())),
            );
            builder.push_record(record);
        }

        output::print_header("Orbital Weights");
        println!("{}", builder.build());
    }

    output::print_success(&format!("Solved {} bands", solution.energies().len()));
    Ok(())
}
