//! # 统一错误处理模块
//!
//! 定义 tbands 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 错误分类
//! - `Configuration`: 输入不合法或不一致（晶格、轨道、维度、k 点数等）
//! - `NumericalInconsistency`: 组装出的哈密顿量不是厄米矩阵（跃迁表编写缺陷）
//! - 其余为 I/O / 解析 / 参数错误，仅由 CLI 和模型文件读取使用
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// tbands 统一错误类型
#[derive(Error, Debug)]
pub enum TbError {
    // ─────────────────────────────────────────────────────────────
    // 模型错误
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Hamiltonian matrix is not hermitian: max |H - H^dagger| = {deviation:.3e} (tolerance {tolerance:.1e})"
    )]
    NumericalInconsistency { deviation: f64, tolerance: f64 },

    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 解析错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Other(String),
}

impl TbError {
    /// 构造配置错误的便捷函数
    pub fn config(msg: impl Into<String>) -> Self {
        TbError::Configuration(msg.into())
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, TbError>;
