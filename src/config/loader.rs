use config::{Config, ConfigError, Environment as ConfigEnvironment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// 選擇環境的環境變數
pub const ENV_VAR: &str = "JOURNAL_ENV";

/// 覆寫配置項的環境變數前綴（例如 `JOURNAL__SERVER__PORT`）
pub const ENV_PREFIX: &str = "JOURNAL";

/// 環境類型枚舉
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// 從環境變數取得當前環境設定
    pub fn from_env() -> Self {
        match env::var(ENV_VAR)
            .unwrap_or_else(|_| "development".into())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            _ => Environment::Development,
        }
    }

    /// 轉換為配置文件名
    pub fn as_filename(&self) -> &'static str {
        match self {
            Environment::Development => "development.toml",
            Environment::Production => "production.toml",
        }
    }
}

/// 配置加載器，負責根據環境加載適當的配置
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置目錄，預設為 `config`，可由 `CONFIG_DIR` 覆寫
    pub fn config_dir() -> PathBuf {
        PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into()))
    }

    /// 載入指定環境的配置
    pub fn load(env: Environment) -> Result<Config, ConfigError> {
        Self::load_from_dir(&Self::config_dir(), env)
    }

    /// 從指定目錄載入配置
    pub fn load_from_dir(config_dir: &Path, env: Environment) -> Result<Config, ConfigError> {
        let config_path = config_dir.join(env.as_filename());

        Config::builder()
            // 加載環境特定配置
            .add_source(File::from(config_path))
            // 從環境變數加載配置（優先級高於文件配置）
            .add_source(
                ConfigEnvironment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
    }

    /// 載入當前環境的配置
    pub fn load_current() -> Result<Config, ConfigError> {
        Self::load(Environment::from_env())
    }
}

/// 配置獲取輔助特性
pub trait ConfigExt {
    /// 從配置中獲取並反序列化指定部分
    fn get_section<'a, T: Deserialize<'a>>(&'a self, section: &str) -> Result<T, ConfigError>;
}

impl ConfigExt for Config {
    fn get_section<'a, T: Deserialize<'a>>(&'a self, section: &str) -> Result<T, ConfigError> {
        self.get(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_environment_from_env() {
        env::remove_var(ENV_VAR);
        assert_eq!(Environment::from_env(), Environment::Development);

        env::set_var(ENV_VAR, "PRODUCTION");
        assert_eq!(Environment::from_env(), Environment::Production);

        env::set_var(ENV_VAR, "staging");
        assert_eq!(Environment::from_env(), Environment::Development);

        // 清理環境變數
        env::remove_var(ENV_VAR);
    }

    #[test]
    fn test_environment_as_filename() {
        assert_eq!(Environment::Development.as_filename(), "development.toml");
        assert_eq!(Environment::Production.as_filename(), "production.toml");
    }

    #[test]
    #[serial]
    fn test_load_from_dir_with_env_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("development.toml"),
            "[server]\nhost = \"127.0.0.1\"\nport = 3000\n",
        )
        .unwrap();

        env::set_var("JOURNAL__SERVER__PORT", "4100");
        let config = ConfigLoader::load_from_dir(dir.path(), Environment::Development).unwrap();
        env::remove_var("JOURNAL__SERVER__PORT");

        let host: String = config.get_section("server.host").unwrap();
        let port: u16 = config.get_section("server.port").unwrap();
        assert_eq!(host, "127.0.0.1");
        assert_eq!(port, 4100);
    }

    #[test]
    fn test_load_from_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load_from_dir(&dir.path().join("nope"), Environment::Production).is_err());
    }
}
