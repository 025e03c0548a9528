use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
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

/// 调度器配置: 各后台扫描的节奏与最低在售活动数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// 生命周期扫描间隔 (激活 + 到期开奖), 秒
    pub lifecycle_interval_secs: u64,
    /// 供给扫描间隔 (维持最低在售活动数), 秒
    pub supply_interval_secs: u64,
    /// boost 过期扫描间隔, 秒
    pub boost_interval_secs: u64,
    /// upcoming + active 活动的最低数量
    pub min_open_raffles: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            lifecycle_interval_secs: 15,
            supply_interval_secs: 120,
            boost_interval_secs: 3600,
            min_open_raffles: 3,
        }
    }
}

impl Config {
    pub fn from_toml() -> anyhow::Result<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // 尝试读取配置文件，如果不存在则完全依赖环境变量
        let config_result = std::fs::read_to_string(&config_path);

        let mut config: Config = match config_result {
            Ok(config_str) => {
                // 有配置文件：先解析再用环境变量覆盖
                toml::from_str(&config_str)
                    .with_context(|| format!("解析配置文件失败: {config_path}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                // 无配置文件：使用环境变量与默认值构建
                fn get_env(name: &str) -> Option<String> {
                    env::var(name).ok()
                }
                fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
                    env::var(name)
                        .ok()
                        .and_then(|v| v.parse::<T>().ok())
                        .unwrap_or(default)
                }

                // 数据库 URL 在无配置文件时必须提供
                let database_url = get_env("DATABASE_URL")
                    .context("缺少 DATABASE_URL 环境变量，且未找到配置文件 config.toml")?;

                Config {
                    server: ServerConfig {
                        host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                        port: get_env_parse("SERVER_PORT", 8080u16),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                    },
                    scheduler: SchedulerConfig {
                        lifecycle_interval_secs: get_env_parse(
                            "SCHEDULER_LIFECYCLE_INTERVAL_SECS",
                            15u64,
                        ),
                        supply_interval_secs: get_env_parse(
                            "SCHEDULER_SUPPLY_INTERVAL_SECS",
                            120u64,
                        ),
                        boost_interval_secs: get_env_parse(
                            "SCHEDULER_BOOST_INTERVAL_SECS",
                            3600u64,
                        ),
                        min_open_raffles: get_env_parse("SCHEDULER_MIN_OPEN_RAFFLES", 3u64),
                    },
                }
            }
            Err(e) => {
                return Err(anyhow::anyhow!("无法读取配置文件 {config_path}: {e}"));
            }
        };

        // 环境变量覆盖（即便文件存在时也覆盖）
        if let Ok(v) = env::var("SERVER_HOST") {
            config.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            config.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            config.database.max_connections = mc;
        }
        if let Ok(v) = env::var("SCHEDULER_LIFECYCLE_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.scheduler.lifecycle_interval_secs = n;
        }
        if let Ok(v) = env::var("SCHEDULER_SUPPLY_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.scheduler.supply_interval_secs = n;
        }
        if let Ok(v) = env::var("SCHEDULER_BOOST_INTERVAL_SECS")
            && let Ok(n) = v.parse()
        {
            config.scheduler.boost_interval_secs = n;
        }
        if let Ok(v) = env::var("SCHEDULER_MIN_OPEN_RAFFLES")
            && let Ok(n) = v.parse()
        {
            config.scheduler.min_open_raffles = n;
        }

        Ok(config)
    }
}
