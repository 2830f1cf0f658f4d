use anyhow::Result;
use sqlx::{migrate::Migrator, PgPool};
use tracing::info;

// 靜態嵌入遷移目錄（此目錄應放在專案根目錄）
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// 單一遷移的套用狀態
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub version: i64,
    pub description: String,
    pub applied: bool,
}

/// 執行數據庫遷移
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("開始執行數據庫遷移...");

    MIGRATOR.run(pool).await?;
    info!("SQLx 遷移完成");
    Ok(())
}

/// 比對嵌入的遷移與 `_sqlx_migrations` 已套用的版本
pub async fn migration_status(pool: &PgPool) -> Result<Vec<MigrationStatus>> {
    let table_exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = '_sqlx_migrations')",
    )
    .fetch_one(pool)
    .await?;

    let applied: Vec<i64> = if table_exists {
        sqlx::query_scalar("SELECT version FROM _sqlx_migrations WHERE success ORDER BY version")
            .fetch_all(pool)
            .await?
    } else {
        Vec::new()
    };

    Ok(MIGRATOR
        .iter()
        .map(|migration| MigrationStatus {
            version: migration.version,
            description: migration.description.to_string(),
            applied: applied.contains(&migration.version),
        })
        .collect())
}
