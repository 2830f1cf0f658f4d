// domain_types.rs - 交易日誌領域類型
//
// 提供整個系統共用的基本領域類型：
// - 買賣方向、交易狀態、出入金類型等枚舉
// - 經驗證的最小跳動規格 (TickSpec)
// - 計算核心使用的成交動作 (ActionEntry)

pub mod action;
pub mod types;

pub use action::{ActionEntry, TickSpec, TickSpecError};
pub use types::{TradeSide, TradeStatus, TransactionCategory, TransactionType};
