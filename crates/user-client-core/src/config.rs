//! Layered configuration loading.
//!
//! Sources, lowest priority first: serde defaults, one config file,
//! environment variables. `.env` files only seed the process environment.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use crate::logging::{init_logging, LogFormat};

/// Separator between nesting levels in environment variable names.
const ENV_SEPARATOR: &str = "__";

/// Error type for configuration operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// Failed to parse configuration.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            Self::Parse(msg) => write!(f, "Failed to parse config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Supported config file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    DotEnv,
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        let file_name = path.file_name()?.to_str()?;
        if file_name == ".env" || file_name.starts_with(".env.") {
            return Some(Self::DotEnv);
        }

        let ext = path.extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "env" => Some(Self::DotEnv),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn file_format(self) -> Option<config::FileFormat> {
        match self {
            Self::DotEnv => None,
            Self::Toml => Some(config::FileFormat::Toml),
            Self::Yaml => Some(config::FileFormat::Yaml),
            Self::Json => Some(config::FileFormat::Json),
        }
    }
}

/// Configuration builder.
///
/// # Example
///
/// ```ignore
/// use user_client_core::ConfigBuilder;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct MyConfig {
///     endpoint: String,
/// }
///
/// let config: MyConfig = ConfigBuilder::new()
///     .with_dotenv()
///     .with_env_prefix("MY_APP")
///     .with_config_file("client.toml")
///     .build()?;
/// ```
#[derive(Default)]
pub struct ConfigBuilder {
    load_default_dotenv: bool,
    config_files: Vec<PathBuf>,
    env_prefix: Option<String>,
    #[cfg(feature = "tracing")]
    init_logging: bool,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load environment variables from `.env` file in current directory.
    pub fn with_dotenv(mut self) -> Self {
        self.load_default_dotenv = true;
        self
    }

    /// Load a configuration file.
    ///
    /// File format is detected from the name:
    /// - `.env`, `.env.*`, `*.env` - Environment variables (multiple allowed)
    /// - `.toml` / `.yaml` / `.json` - Config file (last one used)
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_files.push(path.into());
        self
    }

    /// Only read environment variables starting with `<PREFIX>__`.
    ///
    /// `MY_APP__CHANNEL__ENDPOINT` then maps to `channel.endpoint`.
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Initialize logging from environment variables (`LOG_FORMAT`, `RUST_LOG`).
    #[cfg(feature = "tracing")]
    pub fn with_logging_from_env(mut self) -> Self {
        self.init_logging = true;
        self
    }

    /// Build and return the configuration.
    pub fn build<C: DeserializeOwned>(self) -> Result<C, ConfigError> {
        if self.load_default_dotenv {
            let _ = dotenvy::dotenv();
        }

        let mut main_config_file: Option<(PathBuf, ConfigFormat)> = None;
        let mut unsupported: Option<&PathBuf> = None;

        for path in &self.config_files {
            match ConfigFormat::from_path(path) {
                Some(ConfigFormat::DotEnv) => {
                    if path.exists() {
                        let _ = dotenvy::from_path(path);
                    }
                }
                Some(format) => {
                    main_config_file = Some((path.clone(), format));
                }
                None => {
                    unsupported.get_or_insert(path);
                }
            }
        }

        // After every .env file, so LOG_FORMAT and RUST_LOG can come from them.
        #[cfg(feature = "tracing")]
        if self.init_logging {
            init_logging(LogFormat::from_env(), "info");
        }

        if let Some(path) = unsupported {
            return Err(ConfigError::Parse(format!(
                "unsupported config file type: {}",
                path.display()
            )));
        }

        let env = env_source(self.env_prefix.as_deref());
        let mut builder = config::Config::builder();

        if let Some((path, format)) = main_config_file {
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            tracing::debug!(path = %path.display(), ?format, "Loading config file");
            if let Some(file_format) = format.file_format() {
                builder = builder.add_source(config::File::from(path.as_path()).format(file_format));
            }
        }

        builder
            .add_source(env)
            .build()
            .and_then(|c| c.try_deserialize::<C>())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn env_source(prefix: Option<&str>) -> config::Environment {
    let env = match prefix {
        Some(prefix) => config::Environment::with_prefix(prefix).prefix_separator(ENV_SEPARATOR),
        None => config::Environment::default(),
    };

    env.separator(ENV_SEPARATOR).try_parsing(true)
}
