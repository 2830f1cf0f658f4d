//! 需要 PostgreSQL：以 `DATABASE_URL` 指向可建立測試資料庫的實例，
//! 並使用 `cargo test -- --ignored` 執行。

mod common;

use anyhow::Result;
use common::{account_insert, action_insert, deposit, open_trade_insert};
use rust_decimal_macros::dec;
use sqlx::PgPool;
use trade_journal::domain_types::TradeSide;
use trade_journal::journal::JournalError;
use trade_journal::storage::models::{TradingAccountUpdate, TransactionUpsert};
use trade_journal::storage::{AccountRepository, PgAccountRepository, PgTradeRepository, TradeRepository};

const USER: &str = "user-1";

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_only_one_primary_account(pool: PgPool) -> Result<()> {
    let repo = PgAccountRepository::new(pool);

    let first = repo.insert_account(&account_insert(USER, "Main", true)).await?;
    let second = repo.insert_account(&account_insert(USER, "Swing", true)).await?;

    let primary = repo.get_primary_account(USER).await?;
    assert_eq!(primary.map(|a| a.account_id), Some(second.account_id));

    let update = TradingAccountUpdate {
        is_primary: Some(true),
        ..Default::default()
    };
    repo.update_account(USER, first.account_id, &update).await?;

    let accounts = repo.get_accounts(USER).await?;
    let primaries: Vec<_> = accounts.iter().filter(|a| a.is_primary).collect();
    assert_eq!(primaries.len(), 1);
    assert_eq!(primaries[0].account_id, first.account_id);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_account_names_are_unique_per_user(pool: PgPool) -> Result<()> {
    let repo = PgAccountRepository::new(pool);

    let main = repo.insert_account(&account_insert(USER, "Main", false)).await?;
    repo.insert_account(&account_insert("user-2", "Main", false)).await?;

    assert!(repo.name_exists(USER, "Main", None).await?);
    assert!(!repo.name_exists(USER, "Main", Some(main.account_id)).await?);
    assert!(!repo.name_exists(USER, "Other", None).await?);

    let duplicate = repo.insert_account(&account_insert(USER, "Main", false)).await;
    let error = JournalError::from(duplicate.unwrap_err());
    assert!(matches!(error, JournalError::Conflict(_)));

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_accounts_are_scoped_to_user(pool: PgPool) -> Result<()> {
    let repo = PgAccountRepository::new(pool);

    let account = repo.insert_account(&account_insert(USER, "Main", true)).await?;

    assert!(repo.get_account("intruder", account.account_id).await?.is_none());
    assert!(!repo.delete_account("intruder", account.account_id).await?);
    assert!(repo
        .insert_transaction("intruder", account.account_id, &deposit(dec!(10)))
        .await?
        .is_none());
    assert!(repo.get_primary_account("intruder").await?.is_none());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_transaction_upsert_replaces_list(pool: PgPool) -> Result<()> {
    let repo = PgAccountRepository::new(pool);

    let mut insert = account_insert(USER, "Main", false);
    insert.transactions = vec![deposit(dec!(1000)), deposit(dec!(500))];
    let account = repo.insert_account(&insert).await?;

    let existing = repo.get_transactions(USER, account.account_id).await?;
    assert_eq!(existing.len(), 2);
    let kept = existing
        .iter()
        .find(|t| t.amount == dec!(1000))
        .map(|t| t.transaction_id);

    let update = TradingAccountUpdate {
        transactions: Some(vec![
            TransactionUpsert {
                transaction_id: kept,
                data: deposit(dec!(1200)),
            },
            TransactionUpsert {
                transaction_id: None,
                data: deposit(dec!(50)),
            },
        ]),
        ..Default::default()
    };
    repo.update_account(USER, account.account_id, &update).await?;

    let mut amounts: Vec<_> = repo
        .get_transactions(USER, account.account_id)
        .await?
        .into_iter()
        .map(|t| t.amount)
        .collect();
    amounts.sort();
    assert_eq!(amounts, vec![dec!(50), dec!(1200)]);

    let transactions = repo.get_transactions(USER, account.account_id).await?;
    assert!(transactions.iter().any(|t| Some(t.transaction_id) == kept));

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_trade_update_resequences_actions(pool: PgPool) -> Result<()> {
    let accounts = PgAccountRepository::new(pool.clone());
    let trades = PgTradeRepository::new(pool);

    let account = accounts.insert_account(&account_insert(USER, "Main", true)).await?;
    let created = trades
        .insert_trade(&open_trade_insert(
            USER,
            account.account_id,
            vec![
                action_insert(TradeSide::Buy, dec!(1), dec!(5000)),
                action_insert(TradeSide::Buy, dec!(1), dec!(5010)),
            ],
        ))
        .await?;
    assert_eq!(created.actions.iter().map(|a| a.sequence).collect::<Vec<_>>(), vec![1, 2]);

    let replacement = open_trade_insert(
        USER,
        account.account_id,
        vec![
            action_insert(TradeSide::Buy, dec!(2), dec!(5005)),
            action_insert(TradeSide::Sell, dec!(1), dec!(5020)),
            action_insert(TradeSide::Sell, dec!(1), dec!(5030)),
        ],
    );
    let updated = trades
        .update_trade(USER, created.trade.trade_id, &replacement)
        .await?
        .expect("trade exists");

    assert_eq!(updated.actions.iter().map(|a| a.sequence).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert_eq!(updated.actions[1].action, TradeSide::Sell);

    let fetched = trades.get_trade(USER, created.trade.trade_id).await?.expect("trade exists");
    assert_eq!(fetched.actions.len(), 3);

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_account_delete_cascades(pool: PgPool) -> Result<()> {
    let accounts = PgAccountRepository::new(pool.clone());
    let trades = PgTradeRepository::new(pool);

    let mut insert = account_insert(USER, "Main", true);
    insert.transactions = vec![deposit(dec!(1000))];
    let account = accounts.insert_account(&insert).await?;
    let trade = trades
        .insert_trade(&open_trade_insert(
            USER,
            account.account_id,
            vec![action_insert(TradeSide::Buy, dec!(1), dec!(100))],
        ))
        .await?;

    assert!(accounts.delete_account(USER, account.account_id).await?);

    assert!(trades.get_trade(USER, trade.trade.trade_id).await?.is_none());
    assert!(accounts.get_transactions(USER, account.account_id).await?.is_empty());
    assert!(accounts.get_primary_account(USER).await?.is_none());

    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_delete_trade_removes_actions(pool: PgPool) -> Result<()> {
    let accounts = PgAccountRepository::new(pool.clone());
    let trades = PgTradeRepository::new(pool.clone());

    let account = accounts.insert_account(&account_insert(USER, "Main", true)).await?;
    let trade = trades
        .insert_trade(&open_trade_insert(
            USER,
            account.account_id,
            vec![action_insert(TradeSide::Buy, dec!(1), dec!(100))],
        ))
        .await?;

    assert!(!trades.delete_trade("intruder", trade.trade.trade_id).await?);
    assert!(trades.delete_trade(USER, trade.trade.trade_id).await?);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trade_action WHERE trade_id = $1")
        .bind(trade.trade.trade_id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(remaining, 0);

    Ok(())
}
