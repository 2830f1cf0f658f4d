//! 表單驗證
//!
//! 驗證通過的表單轉換為儲存層的插入模型；交易的衍生欄位在此同時算出。

use rust_decimal::Decimal;
use thiserror::Error;

use super::forms::{AccountForm, AccountUpdateForm, TradeForm, TransactionForm};
use crate::domain_types::{ActionEntry, TickSpec, TickSpecError};
use crate::stats::compute_trade_stats;
use crate::storage::models::{
    TradeActionInsert, TradeInsert, TradingAccountInsert, TradingAccountUpdate, TransactionInsert,
    TransactionUpsert,
};

pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_NOTE_LEN: usize = 500;
pub const MIN_ACCOUNT_NAME_LEN: usize = 2;
pub const MAX_ACCOUNT_NAME_LEN: usize = 50;

/// 數值欄位可儲存的整數位數與小數位數
#[derive(Debug, Clone, Copy)]
struct ColumnPrecision {
    integer_digits: u32,
    scale: u32,
}

/// `NUMERIC(20, 8)`：數量、價格與跳動規格
const QUANTITY_COLUMN: ColumnPrecision = ColumnPrecision {
    integer_digits: 12,
    scale: 8,
};

/// `NUMERIC(20, 2)`：手續費、資金異動金額與衍生損益
const MONEY_COLUMN: ColumnPrecision = ColumnPrecision {
    integer_digits: 18,
    scale: 2,
};

impl ColumnPrecision {
    fn fits(&self, value: Decimal) -> bool {
        let limit = Decimal::from(10u64.pow(self.integer_digits));
        value.normalize().scale() <= self.scale && value.abs() < limit
    }
}

/// 表單驗證錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("交易代號長度必須介於 1 到 {max} 個字元", max = MAX_SYMBOL_LEN)]
    SymbolLength,

    #[error(transparent)]
    Tick(#[from] TickSpecError),

    #[error("至少需要一筆成交紀錄")]
    NoActions,

    #[error("第 {0} 筆成交的數量必須大於 0")]
    NonPositiveQuantity(usize),

    #[error("第 {0} 筆成交的價格必須大於 0")]
    NonPositivePrice(usize),

    #[error("第 {0} 筆成交的手續費不可為負數")]
    NegativeFee(usize),

    #[error("備註不可超過 {max} 個字元", max = MAX_NOTE_LEN)]
    NoteTooLong,

    #[error("帳戶名稱長度必須介於 {min} 到 {max} 個字元", min = MIN_ACCOUNT_NAME_LEN, max = MAX_ACCOUNT_NAME_LEN)]
    AccountNameLength,

    #[error("資金異動金額必須大於 0")]
    NonPositiveAmount,

    #[error("第 {position} 筆成交的 {field} 超出可儲存的範圍或精度")]
    ActionOutOfRange { position: usize, field: &'static str },

    #[error("{0} 超出可儲存的範圍或精度")]
    OutOfRange(&'static str),
}

fn ensure_fits(value: Decimal, column: ColumnPrecision, field: &'static str) -> Result<(), FormError> {
    if column.fits(value) {
        Ok(())
    } else {
        Err(FormError::OutOfRange(field))
    }
}

/// 驗證交易表單並計算衍生欄位
pub fn validate_trade(user_id: &str, form: &TradeForm) -> Result<TradeInsert, FormError> {
    let symbol = form.symbol.trim();
    let symbol_len = symbol.chars().count();
    if symbol_len == 0 || symbol_len > MAX_SYMBOL_LEN {
        return Err(FormError::SymbolLength);
    }

    let tick = TickSpec::new(form.tick_size, form.tick_value)?;
    ensure_fits(tick.tick_size(), QUANTITY_COLUMN, "tick_size")?;
    ensure_fits(tick.tick_value(), QUANTITY_COLUMN, "tick_value")?;

    if form.actions.is_empty() {
        return Err(FormError::NoActions);
    }

    let mut actions = Vec::with_capacity(form.actions.len());
    for (index, action) in form.actions.iter().enumerate() {
        let position = index + 1;
        if action.qty <= Decimal::ZERO {
            return Err(FormError::NonPositiveQuantity(position));
        }
        if action.price <= Decimal::ZERO {
            return Err(FormError::NonPositivePrice(position));
        }
        if action.fee < Decimal::ZERO {
            return Err(FormError::NegativeFee(position));
        }

        let out_of_range = [
            (action.qty, QUANTITY_COLUMN, "qty"),
            (action.price, QUANTITY_COLUMN, "price"),
            (action.fee, MONEY_COLUMN, "fee"),
        ]
        .into_iter()
        .find(|(value, column, _)| !column.fits(*value));
        if let Some((_, _, field)) = out_of_range {
            return Err(FormError::ActionOutOfRange { position, field });
        }

        actions.push(TradeActionInsert {
            action: action.action,
            date: action.date,
            quantity: action.qty,
            price: action.price,
            fee: action.fee,
        });
    }

    let notes = match form.note.as_deref().map(str::trim) {
        Some(note) if note.chars().count() > MAX_NOTE_LEN => return Err(FormError::NoteTooLong),
        Some(note) if !note.is_empty() => Some(note.to_string()),
        _ => None,
    };

    let entries: Vec<ActionEntry> = actions
        .iter()
        .map(|a| ActionEntry::new(a.action, a.date, a.quantity, a.price, a.fee))
        .collect();
    let stats = compute_trade_stats(&entries, tick);

    // 數量已平衡卻無法算出損益，代表結果超出可表示的範圍
    if stats.net_qty.is_zero() && stats.total_sell_qty > Decimal::ZERO && stats.total_return.is_none() {
        return Err(FormError::OutOfRange("total_return"));
    }
    ensure_fits(stats.avg_entry_price, MONEY_COLUMN, "avg_entry_price")?;
    if let Some(avg_exit_price) = stats.avg_exit_price {
        ensure_fits(avg_exit_price, MONEY_COLUMN, "avg_exit_price")?;
    }
    if let Some(total_return) = stats.total_return {
        ensure_fits(total_return, MONEY_COLUMN, "total_return")?;
    }
    ensure_fits(stats.total_fees, MONEY_COLUMN, "total_fees")?;

    Ok(TradeInsert {
        user_id: user_id.to_string(),
        account_id: form.account_id,
        symbol: symbol.to_string(),
        tick_size: tick.tick_size(),
        tick_value: tick.tick_value(),
        avg_entry_price: stats.avg_entry_price,
        avg_exit_price: stats.avg_exit_price,
        total_return: stats.total_return,
        total_fees: stats.total_fees,
        status: stats.status,
        notes,
        screenshots: form.screenshots.clone(),
        actions,
    })
}

/// 驗證帳戶名稱，回傳去除前後空白的名稱
pub fn validate_account_name(name: &str) -> Result<String, FormError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(MIN_ACCOUNT_NAME_LEN..=MAX_ACCOUNT_NAME_LEN).contains(&len) {
        return Err(FormError::AccountNameLength);
    }
    Ok(trimmed.to_string())
}

/// 驗證資金異動
pub fn validate_transaction(form: &TransactionForm) -> Result<TransactionInsert, FormError> {
    if form.amount <= Decimal::ZERO {
        return Err(FormError::NonPositiveAmount);
    }
    ensure_fits(form.amount, MONEY_COLUMN, "amount")?;

    Ok(TransactionInsert {
        kind: form.kind,
        amount: form.amount,
        date: form.date,
        category: form.category,
        description: form
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

/// 驗證建立帳戶表單（含初始資金異動）
pub fn validate_account(user_id: &str, form: &AccountForm) -> Result<TradingAccountInsert, FormError> {
    let name = validate_account_name(&form.name)?;
    let transactions = form
        .transactions
        .iter()
        .map(validate_transaction)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TradingAccountInsert {
        user_id: user_id.to_string(),
        name,
        is_active: form.is_active,
        is_primary: form.is_primary,
        transactions,
    })
}

/// 驗證帳戶更新表單
pub fn validate_account_update(form: &AccountUpdateForm) -> Result<TradingAccountUpdate, FormError> {
    let name = form.name.as_deref().map(validate_account_name).transpose()?;

    let transactions = form
        .transactions
        .as_ref()
        .map(|list| {
            list.iter()
                .map(|upsert| {
                    Ok(TransactionUpsert {
                        transaction_id: upsert.id,
                        data: validate_transaction(&upsert.transaction)?,
                    })
                })
                .collect::<Result<Vec<_>, FormError>>()
        })
        .transpose()?;

    Ok(TradingAccountUpdate {
        name,
        is_active: form.is_active,
        is_primary: form.is_primary,
        transactions,
    })
}
