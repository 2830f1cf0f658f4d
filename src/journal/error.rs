use thiserror::Error;

use super::validator::FormError;

/// 交易日誌服務錯誤
#[derive(Error, Debug)]
pub enum JournalError {
    #[error(transparent)]
    Validation(#[from] FormError),

    #[error("找不到{0}")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("儲存層錯誤: {0}")]
    Storage(anyhow::Error),
}

pub type JournalResult<T> = Result<T, JournalError>;

impl JournalError {
    pub fn duplicate_account_name(name: &str) -> Self {
        JournalError::Conflict(format!("帳戶名稱「{}」已存在", name))
    }

    /// 指標使用的錯誤分類
    pub fn kind(&self) -> &'static str {
        match self {
            JournalError::Validation(_) => "validation",
            JournalError::NotFound(_) => "not_found",
            JournalError::Conflict(_) => "conflict",
            JournalError::Storage(_) => "storage",
        }
    }
}

impl From<anyhow::Error> for JournalError {
    fn from(err: anyhow::Error) -> Self {
        // 併發寫入時由唯一索引擋下的名稱或主要帳戶衝突
        let unique_violation = err
            .downcast_ref::<sqlx::Error>()
            .and_then(|e| e.as_database_error())
            .is_some_and(|db| db.is_unique_violation());

        if unique_violation {
            JournalError::Conflict("資料與現有紀錄衝突".to_string())
        } else {
            JournalError::Storage(err)
        }
    }
}
