//! # mesh 子命令实现
//!
//! 在均匀 k 网格上并行求解本征值，打印每条能带的能量范围，可选导出。
//!
//! ## 依赖关系
//! - 使用 `cli/sampling.rs` 定义的 MeshArgs
//! - 使用 `tb/kmesh.rs` 生成网格
//! - 使用 `batch/` 并行求解, `bands/` 导出

use crate::cli::{self, sampling::MeshArgs};
use tbands::bands::{export, BandStructure};
use tbands::batch::BandRunner;
use tbands::error::{Result, TbError};
use tbands::utils::output;

use tabled::{Table, Tabled};

/// 能带范围表行
#[derive(Debug, Clone, Tabled)]
struct RangeRow {
    #[tabled(rename = "Band")]
    band: usize,
    #[tabled(rename = "Min (eV)")]
    min: String,
    #[tabled(rename = "Max (eV)")]
    max: String,
    #[tabled(rename = "Width (eV)")]
    width: String,
    #[tabled(rename = "k at min (mesh index)")]
    argmin: String,
}

/// 扁平下标对应的网格多维下标（行优先，最后一维变化最快）
fn mesh_index(dims: &[usize], flat: usize) -> Vec<usize> {
    let mut index = vec![0; dims.len()];
    let mut rest = flat;
    for (d, &n) in dims.iter().enumerate().rev() {
        index[d] = rest % n;
        rest /= n;
    }
    index
}

/// 执行 mesh
pub fn execute(args: MeshArgs) -> Result<()> {
    output::print_header("Eigenvalues on Uniform K-Mesh");

    let (model, solver) = super::load_model(&args.model)?;
    let dims = cli::parse_mesh(&args.mesh).map_err(TbError::InvalidArgument)?;
    let kpoints = model.k_uniform_mesh(&dims)?;
    output::print_info(&format!("Mesh {:?}: {} k-points", dims, kpoints.len()));

    let runner = BandRunner::new(args.jobs);
    output::print_info(&format!("Solving with {} threads", runner.jobs()));
    let energies = runner.solve_all(&model, &solver, &kpoints)?;
    let bands = BandStructure::on_mesh(kpoints, energies)?;

    let rows: Vec<RangeRow> = bands
        .band_ranges()
        .into_iter()
        .enumerate()
        .map(|(band, (min, max))| {
            let argmin = bands
                .energies
                .iter()
                .position(|e| e[band] == min)
                .map(|flat| format!("{:?}", mesh_index(&dims, flat)))
                .unwrap_or_default();
            RangeRow {
                band,
                min: format!("{:.6}", min),
                max: format!("{:.6}", max),
                width: format!("{:.6}", max - min),
                argmin,
            }
        })
        .collect();

    output::print_header(&format!("{} Bands", rows.len()));
    println!("{}", Table::new(&rows));

    if let Some(out) = &args.output {
        export::to_csv(&bands, out)?;
        output::print_success(&format!("Mesh eigenvalues saved to '{}'", out.display()));
    }

    Ok(())
}
