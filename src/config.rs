use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub xendit: XenditConfig,
    #[serde(default)]
    pub order: OrderConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XenditConfig {
    pub secret_key: String,
    /// 回调请求头 x-callback-token 的期望值
    pub callback_token: String,
    #[serde(default = "default_xendit_base_url")]
    pub base_url: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for XenditConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            callback_token: String::new(),
            base_url: default_xendit_base_url(),
            currency: default_currency(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    #[serde(default = "default_number_prefix")]
    pub number_prefix: String,
    #[serde(default = "default_store_code")]
    pub store_code: String,
    #[serde(default = "default_expires_in_hours")]
    pub expires_in_hours: i64,
    #[serde(default)]
    pub frontend_base_url: String,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            number_prefix: default_number_prefix(),
            store_code: default_store_code(),
            expires_in_hours: default_expires_in_hours(),
            frontend_base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub public_base_url: String,
}

fn default_xendit_base_url() -> String {
    "https://api.xendit.co".to_string()
}

fn default_currency() -> String {
    "IDR".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_number_prefix() -> String {
    "INV".to_string()
}

fn default_store_code() -> String {
    "RK".to_string()
}

fn default_expires_in_hours() -> i64 {
    24
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env()?,
            Err(e) => {
                return Err(format!("Unable to read config file {config_path}: {e}").into());
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn parse(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        toml::from_str(config_str)
            .map_err(|e| format!("Failed to parse config file: {e}").into())
    }

    /// 无配置文件：使用环境变量与默认值构建
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // 数据库 URL 在无配置文件时必须提供
        let database_url = get_env("DATABASE_URL")
            .ok_or("DATABASE_URL is not set and no config.toml was found")?;

        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET")
                    .unwrap_or_else(|| "change-me-in-production".to_string()),
                access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 86_400i64),
                refresh_token_expires_in: get_env_parse("JWT_REFRESH_EXPIRES_IN", 2_592_000i64),
            },
            xendit: XenditConfig {
                secret_key: get_env("XENDIT_SECRET_KEY").unwrap_or_default(),
                callback_token: get_env("XENDIT_CALLBACK_TOKEN").unwrap_or_default(),
                base_url: get_env("XENDIT_BASE_URL").unwrap_or_else(default_xendit_base_url),
                currency: get_env("XENDIT_CURRENCY").unwrap_or_else(default_currency),
                request_timeout_secs: get_env_parse(
                    "XENDIT_TIMEOUT_SECS",
                    default_request_timeout_secs(),
                ),
            },
            order: OrderConfig {
                number_prefix: get_env("ORDER_NUMBER_PREFIX")
                    .unwrap_or_else(default_number_prefix),
                store_code: get_env("ORDER_STORE_CODE").unwrap_or_else(default_store_code),
                expires_in_hours: get_env_parse(
                    "ORDER_EXPIRES_IN_HOURS",
                    default_expires_in_hours(),
                ),
                frontend_base_url: get_env("FRONTEND_BASE_URL").unwrap_or_default(),
            },
            storage: StorageConfig {
                public_base_url: get_env("STORAGE_SERVICE_URL").unwrap_or_default(),
            },
        })
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.refresh_token_expires_in = n;
        }

        // Xendit
        if let Ok(v) = env::var("XENDIT_SECRET_KEY") {
            self.xendit.secret_key = v;
        }
        if let Ok(v) = env::var("XENDIT_CALLBACK_TOKEN") {
            self.xendit.callback_token = v;
        }
        if let Ok(v) = env::var("XENDIT_BASE_URL") {
            self.xendit.base_url = v;
        }
        if let Ok(v) = env::var("XENDIT_CURRENCY") {
            self.xendit.currency = v;
        }
        if let Ok(v) = env::var("XENDIT_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.xendit.request_timeout_secs = n;
        }

        // 订单
        if let Ok(v) = env::var("ORDER_NUMBER_PREFIX") {
            self.order.number_prefix = v;
        }
        if let Ok(v) = env::var("ORDER_STORE_CODE") {
            self.order.store_code = v;
        }
        if let Ok(v) = env::var("ORDER_EXPIRES_IN_HOURS")
            && let Ok(n) = v.parse()
        {
            self.order.expires_in_hours = n;
        }
        if let Ok(v) = env::var("FRONTEND_BASE_URL") {
            self.order.frontend_base_url = v;
        }
        if let Ok(v) = env::var("STORAGE_SERVICE_URL") {
            self.storage.public_base_url = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_file_uses_defaults() {
        let config = Config::parse(
            r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "postgres://localhost/store"
            max_connections = 5

            [jwt]
            secret = "s3cret"
            access_token_expires_in = 3600
            refresh_token_expires_in = 7200
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.xendit.currency, "IDR");
        assert_eq!(config.xendit.base_url, "https://api.xendit.co");
        assert_eq!(config.xendit.request_timeout_secs, 15);
        assert_eq!(config.order.number_prefix, "INV");
        assert_eq!(config.order.store_code, "RK");
        assert_eq!(config.order.expires_in_hours, 24);
    }

    #[test]
    fn test_parse_partial_section() {
        let config = Config::parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/store"
            max_connections = 5

            [jwt]
            secret = "s3cret"
            access_token_expires_in = 3600
            refresh_token_expires_in = 7200

            [xendit]
            secret_key = "xnd_development_abc"
            callback_token = "cb-token"
            currency = "PHP"

            [order]
            store_code = "JKT"
            "#,
        )
        .unwrap();

        assert_eq!(config.xendit.callback_token, "cb-token");
        assert_eq!(config.xendit.currency, "PHP");
        assert_eq!(config.order.store_code, "JKT");
        assert_eq!(config.order.number_prefix, "INV");
    }

    #[test]
    fn test_parse_rejects_missing_sections() {
        assert!(Config::parse("[server]\nhost = \"x\"\nport = 1\n").is_err());
    }
}
