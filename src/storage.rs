pub mod database;
pub mod migrations;
pub mod models;
pub mod repository;

// 只匯出必要的數據庫功能
pub use database::*;

// 匯出主要的模型
pub use models::{AccountTransaction, Trade, TradeAction, TradeWithActions, TradingAccount};

// 匯出主要的倉儲接口和實現
pub use repository::{
    AccountRepository, DbExecutor, PgAccountRepository, PgTradeRepository, TradeRepository,
};

// 匯出遷移功能
pub use migrations::*;
