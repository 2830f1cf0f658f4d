use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::storage::{
    models::{
        AccountTransaction, TradingAccount, TradingAccountInsert, TradingAccountUpdate,
        TransactionInsert,
    },
    repository::DbExecutor,
};

/// 交易帳戶與資金異動儲存庫特性
///
/// 所有查詢皆以 `user_id` 限定範圍，其他使用者的紀錄視同不存在。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    // 帳戶操作
    async fn insert_account(&self, account: &TradingAccountInsert) -> Result<TradingAccount>;
    async fn get_account(&self, user_id: &str, account_id: Uuid) -> Result<Option<TradingAccount>>;
    async fn get_accounts(&self, user_id: &str) -> Result<Vec<TradingAccount>>;
    async fn get_primary_account(&self, user_id: &str) -> Result<Option<TradingAccount>>;
    async fn update_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        update: &TradingAccountUpdate,
    ) -> Result<Option<TradingAccount>>;
    async fn delete_account(&self, user_id: &str, account_id: Uuid) -> Result<bool>;
    async fn name_exists(&self, user_id: &str, name: &str, exclude: Option<Uuid>) -> Result<bool>;

    // 資金異動操作
    async fn insert_transaction(
        &self,
        user_id: &str,
        account_id: Uuid,
        transaction: &TransactionInsert,
    ) -> Result<Option<AccountTransaction>>;
    async fn get_transactions(&self, user_id: &str, account_id: Uuid) -> Result<Vec<AccountTransaction>>;
    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        transaction: &TransactionInsert,
    ) -> Result<Option<AccountTransaction>>;
    async fn delete_transaction(&self, user_id: &str, transaction_id: Uuid) -> Result<bool>;
}

/// PostgreSQL 交易帳戶儲存庫實現
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// 創建新的 PostgreSQL 交易帳戶儲存庫實例
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl DbExecutor for PgAccountRepository {
    fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

/// 清除使用者其他帳戶的主要標記，`keep` 為保留的帳戶
async fn clear_primary(conn: &mut PgConnection, user_id: &str, keep: Option<Uuid>) -> Result<()> {
    sqlx::query(
        "UPDATE trading_account
         SET is_primary = FALSE, updated_at = NOW()
         WHERE user_id = $1 AND is_primary AND ($2::uuid IS NULL OR account_id <> $2)",
    )
    .bind(user_id)
    .bind(keep)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn insert_transaction_row(
    conn: &mut PgConnection,
    user_id: &str,
    account_id: Uuid,
    transaction: &TransactionInsert,
) -> Result<AccountTransaction> {
    let row = sqlx::query_as::<_, AccountTransaction>(
        "INSERT INTO account_transaction (
            account_id, user_id, type, amount, date, category, description
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *",
    )
    .bind(account_id)
    .bind(user_id)
    .bind(transaction.kind)
    .bind(transaction.amount)
    .bind(transaction.date)
    .bind(transaction.category)
    .bind(&transaction.description)
    .fetch_one(&mut *conn)
    .await?;

    Ok(row)
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn insert_account(&self, account: &TradingAccountInsert) -> Result<TradingAccount> {
        let mut tx = self.get_pool().begin().await?;

        if account.is_primary {
            clear_primary(&mut *tx, &account.user_id, None).await?;
        }

        let created = sqlx::query_as::<_, TradingAccount>(
            "INSERT INTO trading_account (user_id, name, is_active, is_primary)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(&account.user_id)
        .bind(&account.name)
        .bind(account.is_active)
        .bind(account.is_primary)
        .fetch_one(&mut *tx)
        .await?;

        for transaction in &account.transactions {
            insert_transaction_row(&mut *tx, &created.user_id, created.account_id, transaction).await?;
        }

        tx.commit().await?;

        Ok(created)
    }

    async fn get_account(&self, user_id: &str, account_id: Uuid) -> Result<Option<TradingAccount>> {
        let account = sqlx::query_as::<_, TradingAccount>(
            "SELECT * FROM trading_account WHERE account_id = $1 AND user_id = $2",
        )
        .bind(account_id)
        .bind(user_id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(account)
    }

    async fn get_accounts(&self, user_id: &str) -> Result<Vec<TradingAccount>> {
        let accounts = sqlx::query_as::<_, TradingAccount>(
            "SELECT * FROM trading_account WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(accounts)
    }

    async fn get_primary_account(&self, user_id: &str) -> Result<Option<TradingAccount>> {
        let account = sqlx::query_as::<_, TradingAccount>(
            "SELECT * FROM trading_account
             WHERE user_id = $1 AND is_primary AND is_active
             LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(account)
    }

    async fn update_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        update: &TradingAccountUpdate,
    ) -> Result<Option<TradingAccount>> {
        let mut tx = self.get_pool().begin().await?;

        // 鎖定帳戶列，確認歸屬
        let exists = sqlx::query_scalar::<_, Uuid>(
            "SELECT account_id FROM trading_account
             WHERE account_id = $1 AND user_id = $2
             FOR UPDATE",
        )
        .bind(account_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if exists.is_none() {
            return Ok(None);
        }

        if update.is_primary == Some(true) {
            clear_primary(&mut *tx, user_id, Some(account_id)).await?;
        }

        let updated = sqlx::query_as::<_, TradingAccount>(
            "UPDATE trading_account SET
                name = COALESCE($3, name),
                is_active = COALESCE($4, is_active),
                is_primary = COALESCE($5, is_primary),
                updated_at = NOW()
             WHERE account_id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(account_id)
        .bind(user_id)
        .bind(&update.name)
        .bind(update.is_active)
        .bind(update.is_primary)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(transactions) = &update.transactions {
            let keep: Vec<Uuid> = transactions.iter().filter_map(|t| t.transaction_id).collect();

            sqlx::query(
                "DELETE FROM account_transaction
                 WHERE account_id = $1 AND NOT (transaction_id = ANY($2))",
            )
            .bind(account_id)
            .bind(&keep)
            .execute(&mut *tx)
            .await?;

            for upsert in transactions {
                let updated_rows = match upsert.transaction_id {
                    Some(transaction_id) => sqlx::query(
                        "UPDATE account_transaction SET
                            type = $3, amount = $4, date = $5, category = $6,
                            description = $7, updated_at = NOW()
                         WHERE transaction_id = $1 AND account_id = $2",
                    )
                    .bind(transaction_id)
                    .bind(account_id)
                    .bind(upsert.data.kind)
                    .bind(upsert.data.amount)
                    .bind(upsert.data.date)
                    .bind(upsert.data.category)
                    .bind(&upsert.data.description)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected(),
                    None => 0,
                };

                // 不屬於此帳戶的 id 以新紀錄寫入
                if updated_rows == 0 {
                    insert_transaction_row(&mut *tx, user_id, account_id, &upsert.data).await?;
                }
            }
        }

        tx.commit().await?;

        Ok(Some(updated))
    }

    async fn delete_account(&self, user_id: &str, account_id: Uuid) -> Result<bool> {
        // 資金異動與交易由外鍵 ON DELETE CASCADE 一併刪除
        let result = sqlx::query("DELETE FROM trading_account WHERE account_id = $1 AND user_id = $2")
            .bind(account_id)
            .bind(user_id)
            .execute(self.get_pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn name_exists(&self, user_id: &str, name: &str, exclude: Option<Uuid>) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (
                SELECT 1 FROM trading_account
                WHERE user_id = $1 AND name = $2 AND ($3::uuid IS NULL OR account_id <> $3)
            )",
        )
        .bind(user_id)
        .bind(name)
        .bind(exclude)
        .fetch_one(self.get_pool())
        .await?;

        Ok(exists)
    }

    async fn insert_transaction(
        &self,
        user_id: &str,
        account_id: Uuid,
        transaction: &TransactionInsert,
    ) -> Result<Option<AccountTransaction>> {
        // 僅在帳戶屬於該使用者時寫入
        let row = sqlx::query_as::<_, AccountTransaction>(
            "INSERT INTO account_transaction (
                account_id, user_id, type, amount, date, category, description
            )
            SELECT account_id, user_id, $3, $4, $5, $6, $7
            FROM trading_account
            WHERE account_id = $1 AND user_id = $2
            RETURNING *",
        )
        .bind(account_id)
        .bind(user_id)
        .bind(transaction.kind)
        .bind(transaction.amount)
        .bind(transaction.date)
        .bind(transaction.category)
        .bind(&transaction.description)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(row)
    }

    async fn get_transactions(&self, user_id: &str, account_id: Uuid) -> Result<Vec<AccountTransaction>> {
        let rows = sqlx::query_as::<_, AccountTransaction>(
            "SELECT * FROM account_transaction
             WHERE account_id = $1 AND user_id = $2
             ORDER BY date DESC, created_at DESC",
        )
        .bind(account_id)
        .bind(user_id)
        .fetch_all(self.get_pool())
        .await?;

        Ok(rows)
    }

    async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        transaction: &TransactionInsert,
    ) -> Result<Option<AccountTransaction>> {
        let row = sqlx::query_as::<_, AccountTransaction>(
            "UPDATE account_transaction SET
                type = $3, amount = $4, date = $5, category = $6,
                description = $7, updated_at = NOW()
             WHERE transaction_id = $1 AND user_id = $2
             RETURNING *",
        )
        .bind(transaction_id)
        .bind(user_id)
        .bind(transaction.kind)
        .bind(transaction.amount)
        .bind(transaction.date)
        .bind(transaction.category)
        .bind(&transaction.description)
        .fetch_optional(self.get_pool())
        .await?;

        Ok(row)
    }

    async fn delete_transaction(&self, user_id: &str, transaction_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM account_transaction WHERE transaction_id = $1 AND user_id = $2",
        )
        .bind(transaction_id)
        .bind(user_id)
        .execute(self.get_pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
