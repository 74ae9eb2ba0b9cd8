//! Configuration management
//!
//! Handles configuration from environment variables and TOML config files
//! with defaults matching the local development layout (CSV export and
//! resumes in the parent directory, JSON state files next to the server).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Local file locations
    pub storage: StorageConfig,

    /// Hosted database connection
    pub database: DatabaseConfig,

    /// Remote document fetching
    pub fetch: FetchConfig,

    /// Classification dictionary override
    pub classifier: ClassifierConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(mut self) -> Result<Self, ConfigError> {
        self.apply_env()?;
        Ok(self)
    }

    /// Load from `HRDASH_CONFIG` if set, otherwise defaults, then apply env
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var("HRDASH_CONFIG") {
            Ok(path) => Self::from_file(path)?.with_env_override(),
            Err(_) => Self::from_env(),
        }
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            self.server.port = parse_env("API_PORT", port)?;
        }
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            self.server.cors_origins = split_list(&origins);
        }

        // Storage
        if let Ok(dir) = std::env::var("HRDASH_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Ok(dirs) = std::env::var("HRDASH_FALLBACK_DIRS") {
            self.storage.fallback_dirs = split_list(&dirs).into_iter().map(PathBuf::from).collect();
        }
        if let Ok(path) = std::env::var("HRDASH_CACHE_PATH") {
            self.storage.cache_path = PathBuf::from(path);
        }

        // Database
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.postgres_url = Some(url);
            }
        }

        // Fetching
        if let Ok(secs) = std::env::var("FETCH_TIMEOUT_SECS") {
            self.fetch.timeout_secs = parse_env("FETCH_TIMEOUT_SECS", secs)?;
        }

        // Classifier
        if let Ok(path) = std::env::var("HRDASH_DICTIONARY") {
            self.classifier.dictionary_path = Some(PathBuf::from(path));
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(json) = std::env::var("LOG_JSON") {
            self.logging.json_format = json == "1" || json.eq_ignore_ascii_case("true");
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            // Vite dev server
            cors_origins: vec!["http://localhost:5173".to_string()],
        }
    }
}

/// Local file locations
///
/// Relative state-file paths are resolved against the working directory;
/// `candidates_csv` is resolved against `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the CSV export and resume files
    pub data_dir: PathBuf,

    /// Directories searched when a resume is missing from `data_dir`
    pub fallback_dirs: Vec<PathBuf>,

    /// Submission export file name
    pub candidates_csv: PathBuf,

    /// Metadata cache file
    pub cache_path: PathBuf,

    /// Job descriptions file
    pub jobs_path: PathBuf,

    /// Candidate status file
    pub status_path: PathBuf,

    /// Interview feedback file
    pub feedback_path: PathBuf,
}

impl StorageConfig {
    /// Full path of the submission export
    pub fn candidates_csv_path(&self) -> PathBuf {
        self.data_dir.join(&self.candidates_csv)
    }

    /// Data directory followed by the fallback directories
    pub fn search_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(self.data_dir.clone())
            .chain(self.fallback_dirs.iter().cloned())
            .collect()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".."),
            fallback_dirs: vec![PathBuf::from(".")],
            candidates_csv: PathBuf::from("Recruitment.csv"),
            cache_path: PathBuf::from("metadata_cache.json"),
            jobs_path: PathBuf::from("jobs.json"),
            status_path: PathBuf::from("status.json"),
            feedback_path: PathBuf::from("interviews.json"),
        }
    }
}

/// Hosted database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL; local files are used when unset
    pub postgres_url: Option<String>,

    /// PostgreSQL connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            postgres_url: None,
            pool_size: 5,
        }
    }
}

/// Remote document fetching
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

/// Classification dictionary source
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ClassifierConfig {
    /// TOML file replacing the built-in dictionary
    pub dictionary_path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,

    /// Include file/line in logs
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            include_location: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.fetch.timeout_secs, 10);
        assert!(config.database.postgres_url.is_none());
        assert_eq!(
            config.storage.candidates_csv_path(),
            PathBuf::from("../Recruitment.csv")
        );
    }

    #[test]
    fn test_search_dirs_order() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("/data"),
            fallback_dirs: vec![PathBuf::from("/backend"), PathBuf::from("/srv")],
            ..Default::default()
        };
        assert_eq!(
            storage.search_dirs(),
            vec![
                PathBuf::from("/data"),
                PathBuf::from("/backend"),
                PathBuf::from("/srv")
            ]
        );
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9000\n\n[storage]\ndata_dir = \"/srv/resumes\"\n"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/resumes"));
        assert_eq!(config.storage.cache_path, PathBuf::from("metadata_cache.json"));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = AppConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        let err = parse_env::<u16>("API_PORT", "eighty".to_string()).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));
        assert_eq!(parse_env::<u64>("FETCH_TIMEOUT_SECS", " 15 ".to_string()).unwrap(), 15);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list("http://a.test, ,http://b.test"),
            vec!["http://a.test", "http://b.test"]
        );
    }
}
