/// 配置管理模組
///
/// 本模組負責加載、驗證和管理系統配置。
/// 依 `JOURNAL_ENV` 在開發與生產兩種環境之間選擇配置文件。
pub mod loader;
pub mod manager;
pub mod types;
pub mod validation;

// 重新導出常用組件
pub use loader::{ConfigExt, ConfigLoader, Environment};
pub use manager::{get_config, init_config};
pub use types::*;
pub use validation::{ValidationError, ValidationUtils, Validator};
