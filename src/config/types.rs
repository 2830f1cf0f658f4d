use serde::{Serialize, Deserialize};
use crate::config::validation::{ValidationError, ValidationUtils, Validator};

/// 應用程序配置結構
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    pub database: DatabaseConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
    pub rest_api: RestApiConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
}

impl Validator for ApplicationConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證各個部分的配置
        self.database.validate()?;
        self.log.validate()?;
        self.server.validate()?;
        self.rest_api.validate()?;
        self.monitor.validate()?;

        Ok(())
    }
}

/// 數據庫配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Validator for DatabaseConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.host, "database.host")?;
        ValidationUtils::not_empty(&self.username, "database.username")?;
        ValidationUtils::not_empty(&self.database, "database.database")?;
        ValidationUtils::in_range(self.port, 1, 65535, "database.port")?;
        ValidationUtils::in_range(self.max_connections, self.min_connections, 1000, "database.max_connections")?;

        Ok(())
    }
}

impl DatabaseConfig {
    /// 獲取最大生命週期持續時間
    pub fn max_lifetime(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.max_lifetime_secs)
    }

    /// 獲取獲取連接超時持續時間
    pub fn acquire_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.acquire_timeout_secs)
    }

    /// 獲取閒置超時持續時間
    pub fn idle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_timeout_secs)
    }
}

/// 日誌配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub format: String,
    /// 設定後額外輸出每日輪替的日誌檔
    #[serde(default)]
    pub directory: Option<String>,
}

impl Validator for LogConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證日誌級別
        ValidationUtils::one_of(
            &self.level.to_lowercase(),
            &["trace", "debug", "info", "warn", "error"].iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            "log.level"
        )?;

        // 驗證日誌格式
        ValidationUtils::one_of(
            &self.format.to_lowercase(),
            &["pretty", "json"].iter().map(|s| s.to_string()).collect::<Vec<String>>(),
            "log.format"
        )?;

        if let Some(directory) = &self.directory {
            ValidationUtils::not_empty(directory, "log.directory")?;
        }

        Ok(())
    }
}

/// 伺服器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub enable_compression: bool,
    pub max_body_size: u64,
}

impl Validator for ServerConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::not_empty(&self.host, "server.host")?;
        ValidationUtils::in_range(self.port, 1, 65535, "server.port")?;
        ValidationUtils::in_range(self.max_body_size, 1024, 64 * 1024 * 1024, "server.max_body_size")?;

        Ok(())
    }
}

/// REST API 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestApiConfig {
    pub base_path: String,
    pub api_key: String,
    pub secret_key: String,
    pub request_timeout: u64,
    pub cors_allow_all: bool,
    pub cors_origins: Vec<String>,
}

impl Validator for RestApiConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        // 驗證API配置
        ValidationUtils::not_empty(&self.base_path, "rest_api.base_path")?;
        ValidationUtils::not_empty(&self.api_key, "rest_api.api_key")?;
        ValidationUtils::not_empty(&self.secret_key, "rest_api.secret_key")?;
        ValidationUtils::in_range(self.request_timeout, 1, 300, "rest_api.request_timeout")?;

        if !self.base_path.starts_with('/') {
            return Err(ValidationError::InvalidValue(
                "rest_api.base_path 必須以 / 開頭".to_string()
            ));
        }

        // 如果不允許所有來源，必須指定允許的來源
        if !self.cors_allow_all && self.cors_origins.is_empty() {
            return Err(ValidationError::InvalidValue(
                "未指定允許的CORS來源，且未啟用允許所有來源".to_string()
            ));
        }

        Ok(())
    }
}

/// 監控配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub metrics_enabled: bool,
    pub metrics_host: String,
    pub metrics_port: u16,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_host: "127.0.0.1".to_string(),
            metrics_port: 9090,
        }
    }
}

impl Validator for MonitorConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        ValidationUtils::check_dependency(
            self.metrics_enabled,
            !self.metrics_host.trim().is_empty(),
            "monitor.metrics_enabled",
            "monitor.metrics_host",
        )?;
        ValidationUtils::in_range(self.metrics_port, 1, 65535, "monitor.metrics_port")?;

        Ok(())
    }
}
