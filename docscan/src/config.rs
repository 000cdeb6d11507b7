use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

/// Read an env var, treating an empty string the same as unset.
fn non_empty_env(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub storage: Option<StorageConfig>,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub max_connections: usize,
    pub busy_timeout_ms: u64,
}

/// Azure Blob Storage settings. Absent when no connection string is set,
/// in which case uploads are not persisted.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub connection_string: String,
    pub container: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub languages: String,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model: "local/tesseract".to_string(),
            api_key: None,
            base_url: None,
            languages: "eng".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "file:docscan.db".to_string(),
            auth_token: None,
            max_connections: 16,
            busy_timeout_ms: 5000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("DOCSCAN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("DOCSCAN_PORT", 8000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:docscan.db".to_string()),
                auth_token: non_empty_env("DATABASE_AUTH_TOKEN"),
                max_connections: parse_env_or("DATABASE_MAX_CONNECTIONS", 16).max(1),
                busy_timeout_ms: parse_env_or("DATABASE_BUSY_TIMEOUT_MS", 5000),
            },
            storage: non_empty_env("AZURE_STORAGE_CONNECTION_STRING").map(|connection_string| {
                StorageConfig {
                    connection_string,
                    container: env::var("AZURE_STORAGE_CONTAINER_NAME")
                        .unwrap_or_else(|_| "documents".to_string()),
                    timeout_secs: parse_env_or("STORAGE_TIMEOUT", 30).max(1),
                }
            }),
            ocr: OcrConfig {
                model: env::var("OCR_MODEL").unwrap_or_else(|_| "local/tesseract".to_string()),
                api_key: non_empty_env("OCR_API_KEY"),
                base_url: non_empty_env("OCR_BASE_URL"),
                languages: env::var("OCR_LANGUAGES").unwrap_or_else(|_| "eng".to_string()),
                timeout_secs: parse_env_or("OCR_TIMEOUT", 60).max(1),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known OCR providers reachable through an OpenAI-compatible vision API.
pub const KNOWN_OCR_API_PROVIDERS: &[&str] = &["openai"];

/// Split an OCR model name into (provider, model).
///
/// `openai/gpt-4o-mini` -> `("openai", "gpt-4o-mini")`. Anything without a
/// known provider prefix is treated as a local engine.
pub fn parse_ocr_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_OCR_API_PROVIDERS.contains(&prefix_lower.as_str()) || prefix_lower == "local" {
            return (prefix, rest);
        }
    }
    ("local", model)
}
