// monitor/metrics.rs - 交易日誌操作指標

use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

use crate::config::MonitorConfig;

/// 監控指標命名空間
pub const METRIC_NAMESPACE: &str = "trade_journal";

/// 指標錯誤
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("指標配置錯誤: {0}")]
    Configuration(String),

    #[error("指標匯出器安裝失敗: {0}")]
    Installation(String),
}

/// 被記錄的資料實體
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Trade,
    Account,
    Transaction,
}

impl Entity {
    fn metric_name(&self) -> String {
        let suffix = match self {
            Entity::Trade => "trades",
            Entity::Account => "accounts",
            Entity::Transaction => "transactions",
        };
        format!("{}.{}", METRIC_NAMESPACE, suffix)
    }
}

/// 交易日誌指標記錄器
pub struct JournalMetrics;

impl JournalMetrics {
    /// 記錄一次成功的寫入操作（`op` 例如 "create"、"update"、"delete"）
    pub fn record(entity: Entity, op: &'static str) {
        counter!(entity.metric_name(), "op" => op).increment(1);
    }

    /// 記錄被拒絕或失敗的請求（`kind` 例如 "validation"、"storage"）
    pub fn record_error(kind: &'static str) {
        counter!(format!("{}.errors", METRIC_NAMESPACE), "kind" => kind).increment(1);
    }
}

/// 啟動 Prometheus 匯出器
pub fn init_metrics(config: &MonitorConfig) -> Result<(), MetricsError> {
    let addr: SocketAddr = format!("{}:{}", config.metrics_host, config.metrics_port)
        .parse()
        .map_err(|e: std::net::AddrParseError| MetricsError::Configuration(e.to_string()))?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    info!(addr = %addr, "Prometheus 指標匯出器已啟動");

    Ok(())
}
