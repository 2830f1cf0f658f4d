use config::ConfigError;
use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::loader::{ConfigLoader, Environment};
use crate::config::types::ApplicationConfig;
use crate::config::validation::Validator;

// 全局配置實例
static CONFIG: OnceCell<ApplicationConfig> = OnceCell::new();

/// 獲取應用程序配置實例，尚未初始化時回傳 `None`
pub fn get_config() -> Option<&'static ApplicationConfig> {
    CONFIG.get()
}

/// 初始化配置（在應用程序啟動時調用）
pub fn init_config() -> Result<&'static ApplicationConfig, ConfigError> {
    if let Some(existing) = CONFIG.get() {
        warn!("配置已經被初始化，跳過重複初始化");
        return Ok(existing);
    }

    let app_config = ApplicationConfig::load_from_env()?;
    debug!("配置初始化成功，環境：{:?}", Environment::from_env());

    Ok(CONFIG.get_or_init(|| app_config))
}

impl ApplicationConfig {
    /// 從環境變數指定的環境加載配置
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        debug!("從環境加載配置: {:?}", env);
        Self::from_source(ConfigLoader::load(env)?)
    }

    /// 反序列化並驗證配置，驗證失敗視為載入失敗
    pub fn from_source(source: config::Config) -> Result<Self, ConfigError> {
        let app_config: ApplicationConfig = source.try_deserialize()?;

        app_config
            .validate()
            .map_err(|err| ConfigError::Message(format!("配置驗證失敗: {}", err)))?;
        debug!("配置驗證通過");

        Ok(app_config)
    }
}
