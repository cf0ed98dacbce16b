//! # info 子命令实现
//!
//! 打印模型概要：晶格参数、轨道表、跃迁壳层，以及跃迁表的厄米共轭配对检查。
//!
//! ## 依赖关系
//! - 使用 `cli/inspect.rs` 定义的 InfoArgs
//! - 使用 `tbands::tb::TbModel`
//! - 使用 `utils/output.rs`

use crate::cli::inspect::InfoArgs;
use tbands::error::Result;
use tbands::utils::output;
use tbands::TbModel;

use tabled::{Table, Tabled};

/// 轨道表行
#[derive(Debug, Clone, Tabled)]
struct OrbitalRow {
    #[tabled(rename = "Orbital")]
    index: usize,
    #[tabled(rename = "Reduced")]
    reduced: String,
    #[tabled(rename = "Cartesian (Å)")]
    cartesian: String,
}

/// 壳层表行
#[derive(Debug, Clone, Tabled)]
struct ShellRow {
    #[tabled(rename = "R")]
    r: String,
    #[tabled(rename = "Degeneracy")]
    degeneracy: u32,
    #[tabled(rename = "Elements")]
    elements: usize,
    #[tabled(rename = "max |t| (eV)")]
    max_amplitude: String,
}

fn format_triple(v: &[f64; 3]) -> String {
    format!("{:9.5} {:9.5} {:9.5}", v[0], v[1], v[2])
}

/// 执行 info
pub fn execute(args: InfoArgs) -> Result<()> {
    output::print_header("Tight-Binding Model");

    let (model, _) = super::load_model(&args.model)?;
    print_geometry(&model);
    print_orbitals(&model);
    print_shells(&model, args.shells);
    check_partners(&model, args.partner_tolerance);

    Ok(())
}

fn print_geometry(model: &TbModel) {
    let lattice = model.lattice();
    let (a, b, c, alpha, beta, gamma) = lattice.parameters();

    output::print_separator();
    output::print_field("Name", model.name().unwrap_or("unnamed"));
    output::print_field("Orbitals", &model.norb().to_string());
    output::print_field("Spin multiplicity", &model.nspin().to_string());
    output::print_field(
        "Dimensions",
        &format!("dim_r = {}, dim_k = {}", model.dim_r(), model.dim_k()),
    );
    output::print_field("Periodic directions", &format!("{:?}", model.periodic()));
    output::print_field("a, b, c (Å)", &format!("{:.5} {:.5} {:.5}", a, b, c));
    output::print_field(
        "alpha, beta, gamma (°)",
        &format!("{:.3} {:.3} {:.3}", alpha, beta, gamma),
    );
    output::print_field("Volume (Å³)", &format!("{:.5}", lattice.volume()));
    for i in 0..3 {
        output::print_field(&format!("a{}", i + 1), &format_triple(&lattice.vector(i)));
    }
    output::print_separator();
}

fn print_orbitals(model: &TbModel) {
    let rows: Vec<OrbitalRow> = model
        .orbitals()
        .iter()
        .enumerate()
        .map(|(index, pos)| OrbitalRow {
            index,
            reduced: format_triple(pos),
            cartesian: format_triple(&model.lattice().to_cartesian(pos)),
        })
        .collect();

    output::print_header(&format!("{} Orbitals", rows.len()));
    println!("{}", Table::new(&rows));
}

fn print_shells(model: &TbModel, count: usize) {
    let table = model.hoppings();
    if table.is_empty() {
        output::print_warning("Hopping table is empty: all bands are flat at zero energy");
        return;
    }

    let rows: Vec<ShellRow> = table
        .shells()
        .iter()
        .take(count)
        .map(|shell| ShellRow {
            r: format!("({} {} {})", shell.r[0], shell.r[1], shell.r[2]),
            degeneracy: shell.degeneracy,
            elements: shell.elements.len(),
            max_amplitude: format!(
                "{:.5}",
                shell
                    .elements
                    .iter()
                    .map(|e| e.amplitude.norm())
                    .fold(0.0, f64::max)
            ),
        })
        .collect();

    output::print_header(&format!(
        "Hopping Shells ({} of {}, {} elements total)",
        rows.len(),
        table.len(),
        table.num_elements()
    ));
    println!("{}", Table::new(&rows));
}

fn check_partners(model: &TbModel, tolerance: f64) {
    let mismatches = model.check_conjugate_partners(tolerance);
    if mismatches.is_empty() {
        output::print_success("Every hopping has its Hermitian-conjugate partner");
        return;
    }

    output::print_warning(&format!(
        "{} hoppings lack a matching conjugate partner t_ji(-R) = conj(t_ij(R)):",
        mismatches.len()
    ));
    for m in mismatches.iter().take(10) {
        output::print_error(&format!(
            "  R = ({} {} {}), ({}, {}): t = {:.6}, partner = {:.6}",
            m.r[0], m.r[1], m.r[2], m.i, m.j, m.value, m.partner
        ));
    }
    if mismatches.len() > 10 {
        output::print_warning(&format!("  ... and {} more", mismatches.len() - 10));
    }
}
