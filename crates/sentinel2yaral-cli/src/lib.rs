//! # Converter CLI Library
//!
//! Sentinel → YARA-L コンバータのコマンドラインインターフェース
//! 変換・サーバ起動・ライブラリ一覧をコマンドラインから実行

pub mod commands;

pub use commands::*;
