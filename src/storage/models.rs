pub mod account;
pub mod trade;
pub mod transaction;

// 重新匯出常用模型類型
pub use account::*;
pub use trade::*;
pub use transaction::*;
