use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::storage::{
    models::{Trade, TradeAction, TradeActionInsert, TradeInsert, TradeWithActions},
    repository::DbExecutor,
};

/// 交易儲存庫特性
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradeRepository: Send + Sync {
    async fn insert_trade(&self, trade: &TradeInsert) -> Result<TradeWithActions>;
    async fn get_trade(&self, user_id: &str, trade_id: Uuid) -> Result<Option<TradeWithActions>>;
    async fn get_trades_for_account(&self, user_id: &str, account_id: Uuid) -> Result<Vec<Trade>>;
    /// 整筆替換交易欄位與成交明細
    async fn update_trade(
        &self,
        user_id: &str,
        trade_id: Uuid,
        trade: &TradeInsert,
    ) -> Result<Option<TradeWithActions>>;
    async fn delete_trade(&self, user_id: &str, trade_id: Uuid) -> Result<bool>;
}

/// PostgreSQL 交易儲存庫實現
pub struct PgTradeRepository {
    pool: PgPool,
}

impl PgTradeRepository {
    /// 創建新的 PostgreSQL 交易儲存庫實例
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DbExecutor for PgTradeRepository {
    fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

/// 依序寫入成交明細，序號從 1 開始
async fn insert_actions(
    conn: &mut PgConnection,
    trade_id: Uuid,
    actions: &[TradeActionInsert],
) -> Result<Vec<TradeAction>> {
    let mut inserted = Vec::with_capacity(actions.len());

    for (index, action) in actions.iter().enumerate() {
        let sequence = i32::try_from(index + 1)?;
        let row = sqlx::query_as::<_, TradeAction>(
            "INSERT INTO trade_action (trade_id, sequence, action, date, quantity, price, fee)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *",
        )
        .bind(trade_id)
        .bind(sequence)
        .bind(action.action)
        .bind(action.date)
        .bind(action.quantity)
        .bind(action.price)
        .bind(action.fee)
        .fetch_one(&mut *conn)
        .await?;

        inserted.push(row);
    }

    Ok(inserted)
}

#[async_trait]
impl TradeRepository for PgTradeRepository {
    async fn insert_trade(&self, trade: &TradeInsert) -> Result<TradeWithActions> {
        let mut tx = self.get_pool().begin().await?;

        let created = sqlx::query_as::<_, Trade>(
            "INSERT INTO trade (
                user_id, account_id, symbol, tick_size, tick_value,
                avg_entry_price, avg_exit_price, total_return, total_fees,
                status, notes, screenshots
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *",
        )
        .bind(&trade.user_id)
        .bind(trade.account_id)
        .bind(&trade.symbol)
        .bind(trade.tick_size)
        .bind(trade.tick_value)
        .bind(trade.avg_entry_price)
        .bind(trade.avg_exit_price)
        .bind(trade.total_return)
        .bind(trade.total_fees)
        .bind(trade.status)
        .bind(&trade.notes)
        .bind(&trade.screenshots)
        .fetch_one(&mut *tx)
        .await?;

        let actions = insert_actions(&mut *tx, created.trade_id, &trade.actions).await?;

        tx.commit().await?;

        Ok(TradeWithActions {
            trade: created,
            actions,
        })
    }

    async fn get_trade(&self, user_id: &str, trade_id: Uuid) -> Result<Option<TradeWithActions>> {
        let trade = sqlx::query_as::<_, Trade>(
            "SELECT * FROM trade WHERE trade_id = $1 AND user_id = $2",
        )
        .bind(trade_id)
        .bind(user_id)
        .fetch_optional(self.get_pool())
        .await?;

        let Some(trade) = trade else {
            return Ok(None);
        };

        let actions = sqlx::query_as::<_, TradeAction>(
            "SELECT * FROM trade_action WHERE trade_id = $1 ORDER BY sequence",
        )
        .bind(trade_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(Some(TradeWithActions { trade, actions }))
    }

    async fn get_trades_for_account(&self, user_id: &str, account_id: Uuid) -> Result<Vec<Trade>> {
        let trades = sqlx::query_as::<_, Trade>(
            "SELECT * FROM trade
             WHERE account_id = $1 AND user_id = $2
             ORDER BY created_at DESC",
        )
        .bind(account_id)
        .bind(user_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(trades)
    }

    async fn update_trade(
        &self,
        user_id: &str,
        trade_id: Uuid,
        trade: &TradeInsert,
    ) -> Result<Option<TradeWithActions>> {
        let mut tx = self.get_pool().begin().await?;

        let updated = sqlx::query_as::<_, Trade>(
            "UPDATE trade SET
                account_id = $3, symbol = $4, tick_size = $5, tick_value = $6,
                avg_entry_price = $7, avg_exit_price = $8, total_return = $9,
                total_fees = $10, status = $11, notes = $12, screenshots = $13,
                updated_at = NOW()
             WHERE trade_id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(trade_id)
        .bind(user_id)
        .bind(trade.account_id)
        .bind(&trade.symbol)
        .bind(trade.tick_size)
        .bind(trade.tick_value)
        .bind(trade.avg_entry_price)
        .bind(trade.avg_exit_price)
        .bind(trade.total_return)
        .bind(trade.total_fees)
        .bind(trade.status)
        .bind(&trade.notes)
        .bind(&trade.screenshots)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM trade_action WHERE trade_id = $1")
            .bind(trade_id)
            .execute(&mut *tx)
            .await?;

        let actions = insert_actions(&mut *tx, trade_id, &trade.actions).await?;

        tx.commit().await?;

        Ok(Some(TradeWithActions {
            trade: updated,
            actions,
        }))
    }

    async fn delete_trade(&self, user_id: &str, trade_id: Uuid) -> Result<bool> {
        let mut tx = self.get_pool().begin().await?;

        sqlx::query(
            "DELETE FROM trade_action
             WHERE trade_id IN (SELECT trade_id FROM trade WHERE trade_id = $1 AND user_id = $2)",
        )
        .bind(trade_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM trade WHERE trade_id = $1 AND user_id = $2")
            .bind(trade_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
