//! # 模型描述文件
//!
//! tbands 自身的 JSON 模型描述，字段与引擎数据模型一一对应：
//!
//! ```text
//! {
//!   "lattice":  [[1,0,0],[0,1,0],[0,0,1]],
//!   "orbitals": [[0,0,0]],
//!   "nspin":    1,            (可选，默认 1)
//!   "periodic": [0,1,2],      (可选，默认全部周期)
//!   "shells": [
//!     {"r": [1,0,0], "degeneracy": 1,
//!      "elements": [{"i": 0, "j": 0, "amplitude": [-1.0, 0.0]}]}
//!   ]
//! }
//! ```
//!
//! Wannier90 等外部格式由外部工具转换为此格式，本模块不解析第三方格式。
//!
//! ## 依赖关系
//! - 被 `tb/model.rs` 转换为 `TbModel`
//! - 使用 `serde_json` 读取

use crate::error::{Result, TbError};
use crate::models::geometry::RealArray;
use crate::models::WsShell;
use crate::tb::TbModel;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// JSON 模型描述
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    /// 可选：模型名称
    #[serde(default)]
    pub name: Option<String>,
    /// 晶格向量（行向量）
    pub lattice: RealArray,
    /// 轨道约化坐标
    pub orbitals: RealArray,
    /// 自旋重数
    #[serde(default = "default_nspin")]
    pub nspin: u8,
    /// 周期方向下标
    #[serde(default)]
    pub periodic: Option<Vec<usize>>,
    /// Wigner-Seitz 壳层
    #[serde(default)]
    pub shells: Vec<WsShell>,
}

fn default_nspin() -> u8 {
    1
}

impl ModelFile {
    /// 从 JSON 字符串解析
    pub fn from_json(content: &str, path: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| TbError::ParseError {
            format: "JSON model".to_string(),
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    /// 读取 JSON 模型文件
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| TbError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json(&content, &path.display().to_string())
    }

    /// 校验并转换为紧束缚模型
    pub fn into_model(self) -> Result<TbModel> {
        TbModel::from_model_file(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_model() {
        let json = r#"{
            "lattice": [[1,0,0],[0,1,0],[0,0,1]],
            "orbitals": [[0,0,0]],
            "shells": [
                {"r": [1,0,0], "elements": [{"i": 0, "j": 0, "amplitude": [-1.0, 0.0]}]},
                {"r": [-1,0,0], "elements": [{"i": 0, "j": 0, "amplitude": [-1.0, 0.0]}]}
            ]
        }"#;
        let file = ModelFile::from_json(json, "chain.json").unwrap();

        assert_eq!(file.nspin, 1);
        assert!(file.periodic.is_none());
        assert!(file.name.is_none());
        assert_eq!(file.shells.len(), 2);
        assert_eq!(file.orbitals.rank(), 2);
    }

    #[test]
    fn test_parse_optional_fields() {
        let json = r#"{
            "name": "ssh",
            "lattice": [[1,0,0],[0,1,0],[0,0,1]],
            "orbitals": [[0,0,0],[0.5,0,0]],
            "nspin": 2,
            "periodic": [0]
        }"#;
        let file = ModelFile::from_json(json, "ssh.json").unwrap();

        assert_eq!(file.name.as_deref(), Some("ssh"));
        assert_eq!(file.nspin, 2);
        assert_eq!(file.periodic, Some(vec![0]));
        assert!(file.shells.is_empty());
    }

    #[test]
    fn test_parse_error_reports_path() {
        let err = ModelFile::from_json("{\"lattice\": ", "broken.json").unwrap_err();
        match err {
            TbError::ParseError { path, .. } => assert_eq!(path, "broken.json"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
