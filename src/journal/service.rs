//! 交易日誌服務
//!
//! 串接表單驗證、交易統計與儲存層。每個操作都限定於呼叫者的 `user_id`，
//! 不屬於該使用者的紀錄一律回報為不存在。

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::error::{JournalError, JournalResult};
use super::forms::{AccountForm, AccountUpdateForm, TradeForm, TransactionForm};
use super::validator::{
    validate_account, validate_account_name, validate_account_update, validate_trade,
    validate_transaction,
};
use crate::monitor::{Entity, JournalMetrics};
use crate::stats::{AccountSummary, PortfolioSummary};
use crate::storage::models::{AccountTransaction, Trade, TradeWithActions, TradingAccount};
use crate::storage::repository::{AccountRepository, TradeRepository};

/// 儀表板資料：選定帳戶（或主要帳戶）的績效聚合與餘額
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub account: Option<TradingAccount>,
    pub portfolio: PortfolioSummary,
    pub summary: Option<AccountSummary>,
}

pub struct JournalService {
    accounts: Arc<dyn AccountRepository>,
    trades: Arc<dyn TradeRepository>,
}

impl JournalService {
    pub fn new(accounts: Arc<dyn AccountRepository>, trades: Arc<dyn TradeRepository>) -> Self {
        Self { accounts, trades }
    }

    async fn require_account(&self, user_id: &str, account_id: Uuid) -> JournalResult<TradingAccount> {
        self.accounts
            .get_account(user_id, account_id)
            .await?
            .ok_or(JournalError::NotFound("帳戶"))
    }

    // ---- 交易 ----

    pub async fn create_trade(&self, user_id: &str, form: &TradeForm) -> JournalResult<TradeWithActions> {
        let insert = validate_trade(user_id, form)?;
        self.require_account(user_id, insert.account_id).await?;

        let created = self.trades.insert_trade(&insert).await?;
        JournalMetrics::record(Entity::Trade, "create");
        info!(
            trade_id = %created.trade.trade_id,
            symbol = %created.trade.symbol,
            status = %created.trade.status,
            "已建立交易"
        );

        Ok(created)
    }

    /// 以新表單整筆替換交易，成交明細重新編號並重算衍生欄位
    pub async fn update_trade(
        &self,
        user_id: &str,
        trade_id: Uuid,
        form: &TradeForm,
    ) -> JournalResult<TradeWithActions> {
        let insert = validate_trade(user_id, form)?;
        self.require_account(user_id, insert.account_id).await?;

        let updated = self
            .trades
            .update_trade(user_id, trade_id, &insert)
            .await?
            .ok_or(JournalError::NotFound("交易"))?;
        JournalMetrics::record(Entity::Trade, "update");
        info!(trade_id = %trade_id, status = %updated.trade.status, "已更新交易");

        Ok(updated)
    }

    pub async fn delete_trade(&self, user_id: &str, trade_id: Uuid) -> JournalResult<()> {
        if !self.trades.delete_trade(user_id, trade_id).await? {
            return Err(JournalError::NotFound("交易"));
        }
        JournalMetrics::record(Entity::Trade, "delete");
        info!(trade_id = %trade_id, "已刪除交易");

        Ok(())
    }

    pub async fn get_trade(&self, user_id: &str, trade_id: Uuid) -> JournalResult<TradeWithActions> {
        self.trades
            .get_trade(user_id, trade_id)
            .await?
            .ok_or(JournalError::NotFound("交易"))
    }

    pub async fn get_trades_for_account(&self, user_id: &str, account_id: Uuid) -> JournalResult<Vec<Trade>> {
        self.require_account(user_id, account_id).await?;
        Ok(self.trades.get_trades_for_account(user_id, account_id).await?)
    }

    /// 沒有啟用中的主要帳戶時回傳空清單
    pub async fn get_trades_for_primary_account(&self, user_id: &str) -> JournalResult<Vec<Trade>> {
        match self.accounts.get_primary_account(user_id).await? {
            Some(primary) => Ok(self
                .trades
                .get_trades_for_account(user_id, primary.account_id)
                .await?),
            None => {
                debug!(user_id, "使用者沒有主要帳戶");
                Ok(Vec::new())
            }
        }
    }

    // ---- 帳戶 ----

    pub async fn create_account(&self, user_id: &str, form: &AccountForm) -> JournalResult<TradingAccount> {
        let insert = validate_account(user_id, form)?;

        if self.accounts.name_exists(user_id, &insert.name, None).await? {
            return Err(JournalError::duplicate_account_name(&insert.name));
        }

        let created = self.accounts.insert_account(&insert).await?;
        JournalMetrics::record(Entity::Account, "create");
        info!(
            account_id = %created.account_id,
            is_primary = created.is_primary,
            transactions = insert.transactions.len(),
            "已建立帳戶"
        );

        Ok(created)
    }

    pub async fn get_account(&self, user_id: &str, account_id: Uuid) -> JournalResult<TradingAccount> {
        self.require_account(user_id, account_id).await
    }

    pub async fn get_accounts(&self, user_id: &str) -> JournalResult<Vec<TradingAccount>> {
        Ok(self.accounts.get_accounts(user_id).await?)
    }

    /// 主要且啟用中的帳戶
    pub async fn get_primary_account(&self, user_id: &str) -> JournalResult<Option<TradingAccount>> {
        Ok(self.accounts.get_primary_account(user_id).await?)
    }

    pub async fn update_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        form: &AccountUpdateForm,
    ) -> JournalResult<TradingAccount> {
        let update = validate_account_update(form)?;

        if update.is_empty() {
            return self.require_account(user_id, account_id).await;
        }

        if let Some(name) = &update.name {
            if self.accounts.name_exists(user_id, name, Some(account_id)).await? {
                return Err(JournalError::duplicate_account_name(name));
            }
        }

        let updated = self
            .accounts
            .update_account(user_id, account_id, &update)
            .await?
            .ok_or(JournalError::NotFound("帳戶"))?;
        JournalMetrics::record(Entity::Account, "update");
        info!(account_id = %account_id, "已更新帳戶");

        Ok(updated)
    }

    /// 刪除帳戶，其資金異動與交易一併刪除
    pub async fn delete_account(&self, user_id: &str, account_id: Uuid) -> JournalResult<()> {
        if !self.accounts.delete_account(user_id, account_id).await? {
            return Err(JournalError::NotFound("帳戶"));
        }
        JournalMetrics::record(Entity::Account, "delete");
        info!(account_id = %account_id, "已刪除帳戶");

        Ok(())
    }

    /// 名稱比對區分大小寫；`exclude` 用於編輯時排除帳戶本身
    pub async fn is_account_name_taken(
        &self,
        user_id: &str,
        name: &str,
        exclude: Option<Uuid>,
    ) -> JournalResult<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        Ok(self.accounts.name_exists(user_id, name, exclude).await?)
    }

    // ---- 資金異動 ----

    pub async fn add_transaction(
        &self,
        user_id: &str,
        account_id: Uuid,
        form: &TransactionForm,
    ) -> JournalResult<AccountTransaction> {
        let insert = validate_transaction(form)?;

        let created = self
            .accounts
            .insert_transaction(user_id, account_id, &insert)
            .await?
            .ok_or(JournalError::NotFound("帳戶"))?;
        JournalMetrics::record(Entity::Transaction, "create");
        info!(
            account_id = %account_id,
            kind = %created.kind,
            amount = %created.amount,
            "已新增資金異動"
        );

        Ok(created)
    }

    /// 依日期由新到舊
    pub async fn get_account_transactions(
        &self,
        user_id: &str,
        account_id: Uuid,
    ) -> JournalResult<Vec<AccountTransaction>> {
        self.require_account(user_id, account_id).await?;
        Ok(self.accounts.get_transactions(user_id, account_id).await?)
    }

    pub async fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
        form: &TransactionForm,
    ) -> JournalResult<AccountTransaction> {
        let insert = validate_transaction(form)?;

        let updated = self
            .accounts
            .update_transaction(user_id, transaction_id, &insert)
            .await?
            .ok_or(JournalError::NotFound("資金異動"))?;
        JournalMetrics::record(Entity::Transaction, "update");

        Ok(updated)
    }

    pub async fn delete_transaction(&self, user_id: &str, transaction_id: Uuid) -> JournalResult<()> {
        if !self.accounts.delete_transaction(user_id, transaction_id).await? {
            return Err(JournalError::NotFound("資金異動"));
        }
        JournalMetrics::record(Entity::Transaction, "delete");

        Ok(())
    }

    // ---- 讀取模型 ----

    pub async fn account_summary(&self, user_id: &str, account_id: Uuid) -> JournalResult<AccountSummary> {
        self.require_account(user_id, account_id).await?;

        let trades = self.trades.get_trades_for_account(user_id, account_id).await?;
        let transactions = self.accounts.get_transactions(user_id, account_id).await?;

        Ok(AccountSummary::compute(&trades, &transactions))
    }

    /// 預設帳戶：主要帳戶優先，否則為最早建立的帳戶
    async fn default_account(&self, user_id: &str) -> JournalResult<Option<TradingAccount>> {
        if let Some(primary) = self.accounts.get_primary_account(user_id).await? {
            return Ok(Some(primary));
        }

        let accounts = self.accounts.get_accounts(user_id).await?;
        Ok(accounts.into_iter().min_by_key(|account| account.created_at))
    }

    /// 未指定帳戶時使用預設帳戶；使用者沒有任何帳戶時回傳空的聚合結果
    pub async fn dashboard(&self, user_id: &str, account_id: Option<Uuid>) -> JournalResult<Dashboard> {
        let account = match account_id {
            Some(id) => Some(self.require_account(user_id, id).await?),
            None => self.default_account(user_id).await?,
        };

        let Some(account) = account else {
            return Ok(Dashboard {
                account: None,
                portfolio: PortfolioSummary::from_trades::<Trade>(&[]),
                summary: None,
            });
        };

        let trades = self.trades.get_trades_for_account(user_id, account.account_id).await?;
        let transactions = self.accounts.get_transactions(user_id, account.account_id).await?;

        Ok(Dashboard {
            portfolio: PortfolioSummary::from_trades(&trades),
            summary: Some(AccountSummary::compute(&trades, &transactions)),
            account: Some(account),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain_types::{TradeSide, TradeStatus, TransactionType};
    use crate::journal::forms::ActionForm;
    use crate::storage::models::TradeInsert;
    use crate::storage::repository::{MockAccountRepository, MockTradeRepository};
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const USER: &str = "user-1";

    fn account(account_id: Uuid, is_primary: bool) -> TradingAccount {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        TradingAccount {
            account_id,
            user_id: USER.to_string(),
            name: "Main".to_string(),
            is_active: true,
            is_primary,
            created_at: now,
            updated_at: now,
        }
    }

    fn stored_trade(insert: &TradeInsert, day: u32) -> Trade {
        let created = Utc.with_ymd_and_hms(2025, 8, day, 15, 0, 0).unwrap();
        Trade {
            trade_id: Uuid::new_v4(),
            user_id: insert.user_id.clone(),
            account_id: insert.account_id,
            symbol: insert.symbol.clone(),
            tick_size: insert.tick_size,
            tick_value: insert.tick_value,
            avg_entry_price: insert.avg_entry_price,
            avg_exit_price: insert.avg_exit_price,
            total_return: insert.total_return,
            total_fees: insert.total_fees,
            status: insert.status,
            notes: insert.notes.clone(),
            screenshots: insert.screenshots.clone(),
            created_at: created,
            updated_at: created,
        }
    }

    fn trade_form(account_id: Uuid) -> TradeForm {
        let date = Utc.with_ymd_and_hms(2025, 8, 10, 14, 30, 0).unwrap();
        TradeForm {
            account_id,
            symbol: "AAPL".to_string(),
            tick_size: dec!(0.01),
            tick_value: dec!(0.01),
            actions: vec![
                ActionForm { action: TradeSide::Buy, date, qty: dec!(100), price: dec!(100), fee: dec!(1) },
                ActionForm { action: TradeSide::Sell, date, qty: dec!(100), price: dec!(200), fee: dec!(1) },
            ],
            note: None,
            screenshots: vec![],
        }
    }

    fn transaction(kind: TransactionType, amount: Decimal) -> AccountTransaction {
        let date = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        AccountTransaction {
            transaction_id: Uuid::new_v4(),
            account_id: Uuid::nil(),
            user_id: USER.to_string(),
            kind,
            amount,
            date,
            category: None,
            description: None,
            created_at: date,
            updated_at: date,
        }
    }

    fn service(accounts: MockAccountRepository, trades: MockTradeRepository) -> JournalService {
        JournalService::new(Arc::new(accounts), Arc::new(trades))
    }

    #[tokio::test]
    async fn test_create_trade_persists_computed_stats() {
        let account_id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_get_account()
            .withf(move |user, id| user == USER && *id == account_id)
            .returning(move |_, id| Ok(Some(account(id, true))));

        let mut trades = MockTradeRepository::new();
        trades
            .expect_insert_trade()
            .withf(|insert| {
                insert.status == TradeStatus::Closed
                    && insert.total_return == Some(dec!(9998.00))
                    && insert.actions.len() == 2
            })
            .times(1)
            .returning(|insert| {
                Ok(TradeWithActions {
                    trade: stored_trade(insert, 10),
                    actions: vec![],
                })
            });

        let created = service(accounts, trades)
            .create_trade(USER, &trade_form(account_id))
            .await
            .unwrap();

        assert_eq!(created.trade.avg_exit_price, Some(dec!(200.00)));
    }

    #[tokio::test]
    async fn test_create_trade_for_foreign_account_is_not_found() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_get_account().returning(|_, _| Ok(None));
        let mut trades = MockTradeRepository::new();
        trades.expect_insert_trade().never();

        let err = service(accounts, trades)
            .create_trade(USER, &trade_form(Uuid::new_v4()))
            .await
            .unwrap_err();

        assert_matches!(err, JournalError::NotFound(_));
    }

    #[tokio::test]
    async fn test_invalid_trade_never_reaches_storage() {
        let mut form = trade_form(Uuid::new_v4());
        form.actions.clear();

        let err = service(MockAccountRepository::new(), MockTradeRepository::new())
            .create_trade(USER, &form)
            .await
            .unwrap_err();

        assert_matches!(err, JournalError::Validation(_));
    }

    #[tokio::test]
    async fn test_update_missing_trade_is_not_found() {
        let account_id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_get_account()
            .returning(move |_, id| Ok(Some(account(id, false))));
        let mut trades = MockTradeRepository::new();
        trades.expect_update_trade().returning(|_, _, _| Ok(None));

        let err = service(accounts, trades)
            .update_trade(USER, Uuid::new_v4(), &trade_form(account_id))
            .await
            .unwrap_err();

        assert_matches!(err, JournalError::NotFound("交易"));
    }

    #[tokio::test]
    async fn test_delete_trade_reports_missing() {
        let mut trades = MockTradeRepository::new();
        trades.expect_delete_trade().returning(|_, _| Ok(false));

        let err = service(MockAccountRepository::new(), trades)
            .delete_trade(USER, Uuid::new_v4())
            .await
            .unwrap_err();

        assert_matches!(err, JournalError::NotFound(_));
    }

    #[tokio::test]
    async fn test_primary_trades_empty_without_primary() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_get_primary_account().returning(|_| Ok(None));
        let mut trades = MockTradeRepository::new();
        trades.expect_get_trades_for_account().never();

        let trades = service(accounts, trades)
            .get_trades_for_primary_account(USER)
            .await
            .unwrap();

        assert!(trades.is_empty());
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicate_name() {
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_name_exists()
            .withf(|user, name, exclude| user == USER && name == "Main" && exclude.is_none())
            .returning(|_, _, _| Ok(true));
        accounts.expect_insert_account().never();

        let form = AccountForm {
            name: "  Main ".to_string(),
            is_active: true,
            is_primary: false,
            transactions: vec![],
        };
        let err = service(accounts, MockTradeRepository::new())
            .create_account(USER, &form)
            .await
            .unwrap_err();

        assert_matches!(err, JournalError::Conflict(_));
    }

    #[tokio::test]
    async fn test_update_account_excludes_itself_from_name_check() {
        let account_id = Uuid::new_v4();
        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_name_exists()
            .withf(move |_, name, exclude| name == "Renamed" && *exclude == Some(account_id))
            .returning(|_, _, _| Ok(false));
        accounts
            .expect_update_account()
            .withf(|_, _, update| update.name.as_deref() == Some("Renamed") && update.is_primary == Some(true))
            .returning(|_, id, _| Ok(Some(account(id, true))));

        let form = AccountUpdateForm {
            name: Some("Renamed".to_string()),
            is_primary: Some(true),
            ..Default::default()
        };
        let updated = service(accounts, MockTradeRepository::new())
            .update_account(USER, account_id, &form)
            .await
            .unwrap();

        assert!(updated.is_primary);
    }

    #[tokio::test]
    async fn test_blank_name_is_never_taken() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_name_exists().never();

        let taken = service(accounts, MockTradeRepository::new())
            .is_account_name_taken(USER, "   ", None)
            .await
            .unwrap();

        assert!(!taken);
    }

    #[tokio::test]
    async fn test_add_transaction_to_missing_account() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_insert_transaction().returning(|_, _, _| Ok(None));

        let form = TransactionForm {
            kind: TransactionType::Deposit,
            amount: dec!(100),
            date: Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(),
            category: None,
            description: None,
        };
        let err = service(accounts, MockTradeRepository::new())
            .add_transaction(USER, Uuid::new_v4(), &form)
            .await
            .unwrap_err();

        assert_matches!(err, JournalError::NotFound("帳戶"));
    }

    #[tokio::test]
    async fn test_dashboard_uses_primary_account() {
        let primary_id = Uuid::new_v4();
        let closed = validate_trade(USER, &trade_form(primary_id)).unwrap();

        let mut accounts = MockAccountRepository::new();
        accounts
            .expect_get_primary_account()
            .returning(move |_| Ok(Some(account(primary_id, true))));
        accounts.expect_get_transactions().returning(|_, _| {
            Ok(vec![
                transaction(TransactionType::Deposit, dec!(10000)),
                transaction(TransactionType::Withdrawal, dec!(500)),
            ])
        });

        let mut trades = MockTradeRepository::new();
        trades
            .expect_get_trades_for_account()
            .withf(move |_, id| *id == primary_id)
            .returning(move |_, _| Ok(vec![stored_trade(&closed, 10)]));

        let dashboard = service(accounts, trades).dashboard(USER, None).await.unwrap();

        assert_eq!(dashboard.account.map(|a| a.account_id), Some(primary_id));
        assert_eq!(dashboard.portfolio.total_pnl, dec!(9998.00));
        assert_eq!(dashboard.portfolio.win_percentage, dec!(100));
        assert_eq!(dashboard.portfolio.daily_stats["2025-08-10"].trades, 1);

        let summary = dashboard.summary.unwrap();
        assert_eq!(summary.net_deposits, dec!(9500));
        assert_eq!(summary.current_balance, dec!(19498.00));
    }

    #[tokio::test]
    async fn test_dashboard_without_accounts_is_empty() {
        let mut accounts = MockAccountRepository::new();
        accounts.expect_get_primary_account().returning(|_| Ok(None));
        accounts.expect_get_accounts().returning(|_| Ok(Vec::new()));

        let dashboard = service(accounts, MockTradeRepository::new())
            .dashboard(USER, None)
            .await
            .unwrap();

        assert!(dashboard.account.is_none());
        assert!(dashboard.summary.is_none());
        assert_eq!(dashboard.portfolio.total_pnl, Decimal::ZERO);
        assert!(dashboard.portfolio.daily_stats.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_falls_back_to_oldest_account() {
        let oldest_id = Uuid::new_v4();
        let newer_id = Uuid::new_v4();
        let closed = validate_trade(USER, &trade_form(oldest_id)).unwrap();

        let mut accounts = MockAccountRepository::new();
        accounts.expect_get_primary_account().returning(|_| Ok(None));
        accounts.expect_get_accounts().returning(move |_| {
            let mut newer = account(newer_id, false);
            newer.created_at = Utc.with_ymd_and_hms(2025, 8, 5, 0, 0, 0).unwrap();
            Ok(vec![newer, account(oldest_id, false)])
        });
        accounts
            .expect_get_transactions()
            .withf(move |_, id| *id == oldest_id)
            .returning(|_, _| Ok(Vec::new()));

        let mut trades = MockTradeRepository::new();
        trades
            .expect_get_trades_for_account()
            .withf(move |_, id| *id == oldest_id)
            .returning(move |_, _| Ok(vec![stored_trade(&closed, 10)]));

        let dashboard = service(accounts, trades).dashboard(USER, None).await.unwrap();

        assert_eq!(dashboard.account.map(|a| a.account_id), Some(oldest_id));
        assert_eq!(dashboard.portfolio.total_pnl, dec!(9998.00));
    }
}
