use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Bark 推送地址，未配置时只在日志里打印通知内容
    pub bark_url: Option<String>,
    /// 页面上"电话联系"按钮使用的号码
    pub phone_number: Option<String>,
    pub data_dir: PathBuf,
    /// 配置后使用 Redis 作为存储，否则使用本地 JSON 文件
    pub redis_url: Option<String>,
    pub notify_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3000,
            bark_url: None,
            phone_number: None,
            data_dir: PathBuf::from("data"),
            redis_url: None,
            notify_delay_secs: 30,
        }
    }
}

// 未设置或为空的变量视为未配置
fn optional_var(key: &str) -> Result<Option<String>, env::VarError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();
        let server_port = match optional_var("SERVER_PORT")? {
            Some(port) => Some(port),
            None => optional_var("PORT")?,
        };

        Ok(Config {
            server_host: optional_var("SERVER_HOST")?.unwrap_or(defaults.server_host),
            server_port: server_port
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.server_port),
            bark_url: optional_var("BARK_URL")?.map(|url| url.trim_end_matches('/').to_string()),
            phone_number: optional_var("PHONE_NUMBER")?,
            data_dir: optional_var("DATA_DIR")?
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            redis_url: optional_var("REDIS_URL")?,
            notify_delay_secs: optional_var("NOTIFY_DELAY_SECS")?
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.notify_delay_secs),
        })
    }

    pub fn notify_delay(&self) -> Duration {
        Duration::from_secs(self.notify_delay_secs)
    }

    pub fn store_file(&self) -> PathBuf {
        self.data_dir.join("store.json")
    }
}
