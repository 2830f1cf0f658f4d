// journal.rs - 交易日誌業務流程
//
// - forms: 呼叫端輸入
// - validator: 表單規則與轉換
// - service: 帳戶、資金異動與交易的操作入口

pub mod error;
pub mod forms;
pub mod service;
pub mod validator;

pub use error::{JournalError, JournalResult};
pub use forms::{
    AccountForm, AccountUpdateForm, ActionForm, TradeForm, TransactionForm, TransactionUpsertForm,
};
pub use service::{Dashboard, JournalService};
pub use validator::FormError;
