use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ArticleConfig {
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub store: StoreConfig,
    pub http: HttpConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// Applied to both connect and server selection.
    pub timeout_secs: u64,
}

impl MongoConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON array of articles loaded into the in-memory backend at startup.
    pub seed_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    MongoDb,
    Memory,
}

#[derive(Debug, Clone, Default)]
pub struct HttpConfig {
    /// Mount point for the article routes, e.g. `/api`. Empty mounts at the root.
    pub path_prefix: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ApiConfig {
    /// Return store failure detail to clients instead of a generic message.
    pub expose_store_errors: bool,
    /// Answer unknown ids with `200 {data: null}` instead of 404.
    pub null_on_missing: bool,
}

impl ArticleConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: StoreBackend = get_env("STORE_BACKEND", Some("mongodb"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        // The URI is only mandatory when MongoDB actually backs the store.
        let uri_default = match backend {
            StoreBackend::MongoDb => None,
            StoreBackend::Memory => Some("mongodb://localhost:27017"),
        };

        Ok(ArticleConfig {
            common: common_config,
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", uri_default, is_prod && uri_default.is_none())?,
                database: get_env("MONGODB_DATABASE", Some("news"), is_prod)?,
                collection: get_env("MONGODB_COLLECTION", Some("articles"), false)?,
                timeout_secs: parse_env("MONGODB_TIMEOUT_SECS", 10)?,
            },
            store: StoreConfig {
                backend,
                seed_path: env::var("STORE_SEED_PATH").ok().filter(|p| !p.is_empty()),
            },
            http: HttpConfig {
                path_prefix: env::var("HTTP_PATH_PREFIX").ok(),
            },
            api: ApiConfig {
                expose_store_errors: parse_env("API_EXPOSE_STORE_ERRORS", false)?,
                null_on_missing: parse_env("API_NULL_ON_MISSING", false)?,
            },
        })
    }

    /// Normalised route prefix: `None` for the root, otherwise `/segment` without a trailing slash.
    pub fn path_prefix(&self) -> Option<String> {
        let raw = self.http.path_prefix.as_deref()?.trim().trim_matches('/');
        if raw.is_empty() {
            None
        } else {
            Some(format!("/{}", raw))
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mongodb" | "mongo" => Ok(StoreBackend::MongoDb),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
        }),
        Err(_) => Ok(default),
    }
}
