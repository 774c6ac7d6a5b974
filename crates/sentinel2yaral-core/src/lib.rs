//! # Sentinel2YARAL Core Library
//!
//! Sentinel検知ルール変換のためのドメインモデル
//! ルールライブラリとプロンプト構築を提供

pub mod rule;
pub mod library;
pub mod prompt;

pub use rule::*;
pub use library::*;
pub use prompt::*;

/// Core operation result type
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error types
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Unknown example: {0}")]
    UnknownExample(String),
}
