use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub insight: InsightConfig,
    pub auth: AuthConfig,
    pub notifications: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Внешний генератор описаний компаний (OpenAI-совместимый API)
#[derive(Debug, Deserialize, Clone)]
pub struct InsightConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_endpoint: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: i32,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Принимать любую непустую пару логин/пароль
    pub demo_mode: bool,
    #[serde(default)]
    pub admin_username: Option<String>,
    /// PHC-строка argon2
    #[serde(default)]
    pub admin_password_hash: Option<String>,
    pub token_lifetime_hours: i64,
    /// Если не задан, генерируется при каждом запуске
    #[serde(default)]
    pub jwt_secret: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    pub ttl_secs: i64,
}

impl NotificationConfig {
    /// Время жизни уведомления; вне диапазона `1..=86400` секунд это ошибка конфигурации
    pub fn ttl(&self) -> anyhow::Result<chrono::Duration> {
        chrono::Duration::try_seconds(self.ttl_secs)
            .filter(|ttl| (1..=86_400).contains(&ttl.num_seconds()))
            .ok_or_else(|| {
                anyhow::anyhow!("notifications.ttl_secs {} is out of range", self.ttl_secs)
            })
    }
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "0.0.0.0"
port = 3000

[insight]
model = "gpt-4o-mini"
temperature = 0.7
max_tokens = 200
timeout_secs = 20

[auth]
demo_mode = true
token_lifetime_hours = 24

[notifications]
ttl_secs = 5
"#;

impl Config {
    /// Встроенная конфигурация без переопределений из окружения
    pub fn embedded() -> anyhow::Result<Self> {
        Ok(toml::from_str(DEFAULT_CONFIG)?)
    }

    /// Переопределения из переменных окружения
    fn apply_env(&mut self) {
        let api_key = std::env::var("INSIGHT_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_some() {
            self.insight.api_key = api_key;
        }

        if let Ok(port) = std::env::var("BACKEND_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid BACKEND_PORT: {}", port),
            }
        }
    }
}

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Environment variables are applied on top.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = load_file_or_default()?;
    config.apply_env();
    Ok(config)
}

fn load_file_or_default() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    Config::embedded()
}
