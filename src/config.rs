use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Which blob backend to use: "local" or "s3"
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub local: LocalConfig,
    #[serde(default)]
    pub s3: S3Config,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalConfig {
    #[serde(default = "default_media_dir")]
    pub media_dir: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct S3Config {
    /// Endpoint host without scheme, e.g. "s3.us-east-1.amazonaws.com".
    /// Left empty, the host is derived from the region.
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Optional public base URL recorded on items instead of the bucket URL
    pub public_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    /// "*" or a comma-separated list of allowed origins
    #[serde(default = "default_cors_origins")]
    pub allowed_origins: String,
}

impl CorsConfig {
    /// Parsed origin list; "*" stays a single wildcard entry
    pub fn origin_list(&self) -> Vec<String> {
        if self.allowed_origins.trim() == "*" {
            return vec!["*".to_string()];
        }
        self.allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_db_path() -> String {
    "data/medstory.db".to_string()
}

fn default_backend() -> String {
    "local".to_string()
}

fn default_media_dir() -> String {
    "data/media".to_string()
}

fn default_cors_origins() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            local: LocalConfig::default(),
            s3: S3Config::default(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            media_dir: default_media_dir(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_cors_origins(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.ensure_directories()?;
        Ok(config)
    }

    /// Load configuration from config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["config.toml", "data/config.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: MS_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        // Server overrides
        if let Ok(val) = env::var("MS_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("MS_CONF_SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        // Database overrides
        if let Ok(val) = env::var("MS_CONF_DATABASE_PATH") {
            self.database.path = val;
        }

        // Storage overrides
        if let Ok(val) = env::var("MS_CONF_STORAGE_BACKEND") {
            self.storage.backend = val;
        }
        if let Ok(val) = env::var("MS_CONF_STORAGE_MEDIA_DIR") {
            self.storage.local.media_dir = val;
        }
        if let Ok(val) = env::var("MS_CONF_S3_ENDPOINT") {
            self.storage.s3.endpoint = val;
        }
        if let Ok(val) = env::var("MS_CONF_S3_REGION") {
            self.storage.s3.region = val;
        }
        if let Ok(val) = env::var("MS_CONF_S3_BUCKET") {
            self.storage.s3.bucket = val;
        }
        if let Ok(val) = env::var("MS_CONF_S3_ACCESS_KEY") {
            self.storage.s3.access_key = val;
        }
        if let Ok(val) = env::var("MS_CONF_S3_SECRET_KEY") {
            self.storage.s3.secret_key = val;
        }
        if let Ok(val) = env::var("MS_CONF_S3_PUBLIC_BASE") {
            if !val.trim().is_empty() {
                self.storage.s3.public_base = Some(val);
            }
        }

        // CORS overrides
        if let Ok(val) = env::var("MS_CONF_CORS_ORIGINS") {
            self.cors.allowed_origins = val;
        }
    }

    /// Ensure required directories exist
    fn ensure_directories(&self) -> anyhow::Result<()> {
        // Ensure database directory exists
        if let Some(parent) = Path::new(&self.database.path).parent() {
            fs::create_dir_all(parent)?;
        }

        // Ensure media directory exists for the local backend
        if self.storage.backend == "local" {
            fs::create_dir_all(&self.storage.local.media_dir)?;
        }

        Ok(())
    }
}
