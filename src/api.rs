// api.rs - API服務模組，宣告子模組
//
// 對外提供交易日誌的 REST 介面：
// - 簽名驗證與呼叫者識別
// - 帳戶、資金異動、交易與儀表板路由
// - 服務錯誤到 HTTP 回應的對應

/// REST API實現
pub mod rest;
/// 請求簽名驗證
pub mod auth;
/// 錯誤回應
pub mod error;
/// API路由定義
pub mod routes;
/// API處理器模組
pub mod handlers;
/// 處理器共享狀態
pub mod state;

pub use error::{ApiError, ApiResult};
pub use rest::RestApi;
pub use state::AppState;
