use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::fmt::format::FmtSpan;
use trade_journal::{config, storage};

#[derive(Parser)]
#[command(name = "migrate", about = "trade_journal 數據庫遷移工具")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 運行所有未應用的遷移
    Run,

    /// 檢查遷移狀態
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日誌系統
    tracing_subscriber::fmt()
        .with_env_filter("trade_journal=info,migrate=info")
        .with_span_events(FmtSpan::CLOSE)
        .init();

    // 解析命令行參數
    let cli = Cli::parse();

    config::init_config().context("無法載入配置")?;
    let pool = storage::database::get_db_pool()
        .await
        .context("無法初始化資料庫連接池")?;

    match cli.command {
        Commands::Run => {
            info!("開始運行交易日誌資料庫遷移...");
            storage::run_migrations(pool)
                .await
                .context("資料庫遷移執行失敗")?;
            info!("資料庫遷移完成！");
        }
        Commands::Status => {
            let statuses = storage::migration_status(pool)
                .await
                .context("無法讀取遷移狀態")?;

            for status in &statuses {
                info!(
                    version = status.version,
                    applied = status.applied,
                    "{}",
                    status.description
                );
            }

            let pending = statuses.iter().filter(|s| !s.applied).count();
            info!("共 {} 個遷移，{} 個尚未套用", statuses.len(), pending);
        }
    }

    Ok(())
}
