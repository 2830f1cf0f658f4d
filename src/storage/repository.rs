use sqlx::PgPool;

pub mod account;
pub mod trade;

// 重新導出常用類型
pub use account::{AccountRepository, PgAccountRepository};
pub use trade::{PgTradeRepository, TradeRepository};

#[cfg(test)]
pub use account::MockAccountRepository;
#[cfg(test)]
pub use trade::MockTradeRepository;

/// 提供連接池的倉儲
pub trait DbExecutor {
    fn get_pool(&self) -> &PgPool;
}
