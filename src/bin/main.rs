use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use trade_journal::api::{AppState, RestApi};
use trade_journal::config::{self, LogConfig};
use trade_journal::journal::JournalService;
use trade_journal::monitor;
use trade_journal::storage::{database, run_migrations, PgAccountRepository, PgTradeRepository};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化配置
    let app_config = config::init_config()?;

    // 初始化日誌系統，guard 需存活至程式結束
    let _log_guard = init_logging(&app_config.log)?;

    // 監控指標
    if app_config.monitor.metrics_enabled {
        monitor::init_metrics(&app_config.monitor)?;
    }

    // 獲取全局資料庫連線池
    let db_pool = database::get_db_pool().await?;

    // 執行資料庫遷移
    run_migrations(db_pool).await?;

    let journal = Arc::new(JournalService::new(
        Arc::new(PgAccountRepository::new(db_pool.clone())),
        Arc::new(PgTradeRepository::new(db_pool.clone())),
    ));
    let state = AppState::new(journal, Some(db_pool.clone()));

    info!("伺服器初始化完成，監聽端口: {}", app_config.server.port);

    let rest_api = RestApi::new(app_config.server.clone(), app_config.rest_api.clone());
    rest_api.start(state, shutdown_signal()).await?;

    db_pool.close().await;
    info!("已關閉資料庫連線池");

    Ok(())
}

// 等待關閉信號
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("接收到關閉信號，正在退出..."),
        Err(err) => error!("無法監聽關閉信號: {}", err),
    }
}

// 初始化日誌系統
fn init_logging(log_config: &LogConfig) -> Result<Option<WorkerGuard>> {
    // RUST_LOG 優先於配置檔
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(log_config.level.to_lowercase()))
    };

    let mut layers = Vec::new();
    if log_config.format.eq_ignore_ascii_case("json") {
        layers.push(fmt::layer().json().with_filter(filter()).boxed());
    } else {
        layers.push(fmt::layer().with_filter(filter()).boxed());
    }

    // 每日輪替的檔案輸出固定使用 JSON
    let guard = log_config.directory.as_ref().map(|directory| {
        let appender = tracing_appender::rolling::daily(directory, "trade_journal.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(filter())
                .boxed(),
        );
        guard
    });

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow!("設置日誌系統失敗: {}", e))?;

    info!("日誌系統初始化完成");
    Ok(guard)
}
