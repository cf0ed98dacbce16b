//! # 能带数据导出
//!
//! ## 支持格式
//! - CSV: 每行一个 k 点：index, k_1..k_d, [distance], band_1..band_n
//! - DAT: gnuplot 风格，每条能带一个数据块（distance 或 k 点序号, energy），块间空行
//! - k 路径 CSV: index, k_1..k_d, distance（只有坐标，不含能量）
//!
//! 写入函数对任意 `io::Write` 泛型，文件路径版本只是包装。
//!
//! ## 依赖关系
//! - 被 `commands/bands.rs`, `commands/kpath.rs`, `commands/mesh.rs` 调用
//! - 使用 `csv` 库写入 CSV

use crate::bands::BandStructure;
use crate::error::{Result, TbError};
use crate::tb::KPath;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

fn k_headers(dim_k: usize) -> Vec<String> {
    (1..=dim_k).map(|d| format!("k{}", d)).collect()
}

/// 写 CSV 能带表
pub fn write_csv<W: Write>(bands: &BandStructure, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["index".to_string()];
    header.extend(k_headers(bands.dim_k()));
    if bands.distances.is_some() {
        header.push("distance".to_string());
    }
    header.extend((1..=bands.nbands()).map(|n| format!("band{}", n)));
    wtr.write_record(&header)?;

    for (idx, (k, energies)) in bands.kpoints.iter().zip(&bands.energies).enumerate() {
        let mut record = vec![idx.to_string()];
        record.extend(k.iter().map(|x| format!("{:.8}", x)));
        if let Some(distances) = &bands.distances {
            record.push(format!("{:.8}", distances[idx]));
        }
        record.extend(energies.iter().map(|e| format!("{:.8}", e)));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| TbError::CsvError(e.into()))
}

/// 写 gnuplot 风格 DAT
pub fn write_dat<W: Write>(bands: &BandStructure, mut writer: W) -> Result<()> {
    let io_err = |e: std::io::Error| TbError::Other(format!("failed to write band data: {}", e));

    writeln!(writer, "# nk = {}, nbands = {}", bands.nk(), bands.nbands()).map_err(io_err)?;
    if !bands.node_distances.is_empty() {
        let nodes: Vec<String> = bands
            .node_distances
            .iter()
            .map(|d| format!("{:.6}", d))
            .collect();
        writeln!(writer, "# nodes: {}", nodes.join(" ")).map_err(io_err)?;
    }

    for n in 0..bands.nbands() {
        if n > 0 {
            writeln!(writer).map_err(io_err)?;
        }
        for (idx, energies) in bands.energies.iter().enumerate() {
            let x = match &bands.distances {
                Some(distances) => distances[idx],
                None => idx as f64,
            };
            writeln!(writer, "{:14.8} {:14.8}", x, energies[n]).map_err(io_err)?;
        }
    }

    writer.flush().map_err(io_err)
}

/// 写 k 路径坐标 CSV
pub fn write_kpath_csv<W: Write>(path: &KPath, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let dim_k = path.kpoints.first().map_or(0, |k| k.len());
    let mut header = vec!["index".to_string()];
    header.extend(k_headers(dim_k));
    header.push("distance".to_string());
    wtr.write_record(&header)?;

    for (idx, (k, d)) in path.kpoints.iter().zip(&path.distances).enumerate() {
        let mut record = vec![idx.to_string()];
        record.extend(k.iter().map(|x| format!("{:.8}", x)));
        record.push(format!("{:.8}", d));
        wtr.write_record(&record)?;
    }

    wtr.flush().map_err(|e| TbError::CsvError(e.into()))
}

// ─────────────────────────────────────────────────────────────
// 文件版本
// ─────────────────────────────────────────────────────────────

fn create(path: &Path) -> Result<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| TbError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
}

/// 导出能带为 CSV 文件
pub fn to_csv(bands: &BandStructure, path: &Path) -> Result<()> {
    write_csv(bands, create(path)?)
}

/// 导出能带为 DAT 文件
pub fn to_dat(bands: &BandStructure, path: &Path) -> Result<()> {
    write_dat(bands, create(path)?)
}

/// 导出 k 路径为 CSV 文件
pub fn kpath_to_csv(kpath: &KPath, path: &Path) -> Result<()> {
    write_kpath_csv(kpath, create(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn path_bands() -> BandStructure {
        let path = KPath {
            nodes: vec![vec![0.0], vec![0.5]],
            kpoints: vec![vec![0.0], vec![0.25], vec![0.5]],
            distances: vec![0.0, 0.25, 0.5],
            node_distances: vec![0.0, 0.5],
            node_indices: vec![0, 2],
            metric: DMatrix::identity(1, 1),
        };
        BandStructure::along_path(&path, vec![vec![-2.0, 1.0], vec![0.0, 1.5], vec![2.0, 3.0]])
            .unwrap()
    }

    #[test]
    fn test_csv_layout() {
        let mut buf = Vec::new();
        write_csv(&path_bands(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "index,k1,distance,band1,band2");
        assert_eq!(
            lines[1],
            "0,0.00000000,0.00000000,-2.00000000,1.00000000"
        );
    }

    #[test]
    fn test_csv_mesh_has_no_distance() {
        let bands =
            BandStructure::on_mesh(vec![vec![0.0, 0.0], vec![0.0, 0.5]], vec![vec![1.0], vec![2.0]])
                .unwrap();
        let mut buf = Vec::new();
        write_csv(&bands, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("index,k1,k2,band1\n"));
    }

    #[test]
    fn test_dat_blocks_per_band() {
        let mut buf = Vec::new();
        write_dat(&path_bands(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("# nk = 3, nbands = 2\n# nodes: 0.000000 0.500000\n"));
        let data: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(data.len(), 7);
        assert!(data[3].is_empty());
        assert_eq!(data.iter().filter(|l| l.is_empty()).count(), 1);

        let first: Vec<f64> = data[4]
            .split_whitespace()
            .map(|x| x.parse().unwrap())
            .collect();
        assert_eq!(first, vec![0.0, 1.0]);
    }

    #[test]
    fn test_kpath_csv() {
        let path = KPath {
            nodes: vec![vec![0.0, 0.0], vec![0.5, 0.0]],
            kpoints: vec![vec![0.0, 0.0], vec![0.5, 0.0]],
            distances: vec![0.0, 0.5],
            node_distances: vec![0.0, 0.5],
            node_indices: vec![0, 1],
            metric: DMatrix::identity(2, 2),
        };
        let mut buf = Vec::new();
        write_kpath_csv(&path, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "index,k1,k2,distance\n0,0.00000000,0.00000000,0.00000000\n1,0.50000000,0.00000000,0.50000000\n"
        );
    }
}
