//! # bands 子命令实现
//!
//! 沿 k 路径并行求解本征值并导出能带数据。
//!
//! ## 依赖关系
//! - 使用 `cli/sampling.rs` 定义的 BandsArgs
//! - 使用 `batch/` 并行求解
//! - 使用 `bands/` 组织与导出数据

use crate::cli::sampling::{BandFormat, BandsArgs};
use tbands::bands::{export, BandStructure};
use tbands::batch::BandRunner;
use tbands::error::Result;
use tbands::utils::output;

use std::path::Path;

/// 从扩展名推断输出格式，默认 CSV
fn detect_format(path: &Path) -> BandFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("dat") => BandFormat::Dat,
        _ => BandFormat::Csv,
    }
}

/// 执行 bands
pub fn execute(args: BandsArgs) -> Result<()> {
    output::print_header("Band Structure Along K-Path");

    let (model, solver) = super::load_model(&args.model)?;
    let path = model.k_path(&args.path.nodes, args.path.nk, args.report)?;
    output::print_info(&format!(
        "Path through {} nodes, {} k-points, total length {:.6}",
        path.nodes.len(),
        path.len(),
        path.total_length()
    ));

    let runner = BandRunner::new(args.jobs);
    output::print_info(&format!("Solving with {} threads", runner.jobs()));
    let energies = runner.solve_all(&model, &solver, &path.kpoints)?;
    let bands = BandStructure::along_path(&path, energies)?;

    let format = args.format.unwrap_or_else(|| detect_format(&args.output));
    match format {
        BandFormat::Csv => export::to_csv(&bands, &args.output)?,
        BandFormat::Dat => export::to_dat(&bands, &args.output)?,
    }

    output::print_separator();
    output::print_success(&format!(
        "{} bands x {} k-points saved to '{}' ({})",
        bands.nbands(),
        bands.nk(),
        args.output.display(),
        format
    ));

    Ok(())
}
