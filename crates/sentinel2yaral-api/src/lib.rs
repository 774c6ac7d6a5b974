//! # Converter API Library
//!
//! Sentinel → YARA-L コンバータの Web インターフェース
//! フォームページと RESTful API を提供

pub mod routes;
pub mod handlers;
pub mod models;
pub mod server;
pub mod web;

pub use routes::*;
pub use handlers::*;
pub use models::*;
pub use server::*;
