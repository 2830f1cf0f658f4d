// monitor.rs - 監控系統模組

pub mod metrics;

// 重新導出常用元素，使其可直接從 monitor 模組使用
pub use metrics::{init_metrics, Entity, JournalMetrics, MetricsError};
