// 模組定義
pub mod api;
pub mod config;
pub mod domain_types;
pub mod journal;
pub mod monitor;
pub mod stats;
pub mod storage;
pub mod utils;
