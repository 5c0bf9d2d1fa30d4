use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub internal_port: u16,
    pub debug: bool,
    pub human_logs: bool,
    pub service_name: String,
    pub pdf_blank_path: PathBuf,
    pub workspace_root: PathBuf,
    pub tool_timeout_seconds: u64,
    pub max_request_size_mb: usize,
    pub tools: ToolPaths,
}

/// Executables for the external document tools.
#[derive(Debug, Clone)]
pub struct ToolPaths {
    pub latexmk: String,
    pub qpdf: String,
    pub convert: String,
}

/// Logging switches, read before the full configuration so that its
/// warnings have a subscriber to go to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogSettings {
    pub debug: bool,
    pub human: bool,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            debug: env_flag("DEBUG"),
            human: env_flag("HUMAN"),
        }
    }

    /// Default `EnvFilter` directives when `RUST_LOG` is unset.
    pub fn default_filter(&self) -> &'static str {
        if self.debug {
            "pressroom=debug,tower_http=debug"
        } else {
            "pressroom=info,tower_http=info"
        }
    }
}

fn env_flag(var_name: &str) -> bool {
    env::var(var_name)
        .ok()
        .and_then(|val| val.trim().parse().ok())
        .unwrap_or(false)
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            latexmk: "latexmk".to_string(),
            qpdf: "qpdf".to_string(),
            convert: "convert".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 50051,
            internal_port: 50052,
            debug: false,
            human_logs: false,
            service_name: "pressroom".to_string(),
            pdf_blank_path: PathBuf::from("/pressroom/blank.pdf"),
            workspace_root: env::temp_dir(),
            tool_timeout_seconds: 300,
            max_request_size_mb: 1024,
            tools: ToolPaths::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            server_host: Self::string_env_var("SERVER_HOST", &defaults.server_host),
            server_port: Self::parse_env_var("PORT", defaults.server_port)
                .context("Failed to parse PORT")?,
            internal_port: Self::parse_env_var("INTERNAL_PORT", defaults.internal_port)
                .context("Failed to parse INTERNAL_PORT")?,
            debug: Self::parse_env_var("DEBUG", defaults.debug)
                .context("Failed to parse DEBUG")?,
            human_logs: Self::parse_env_var("HUMAN", defaults.human_logs)
                .context("Failed to parse HUMAN")?,
            service_name: Self::string_env_var("SERVICE_NAME", &defaults.service_name),
            pdf_blank_path: env::var_os("PDF_BLANK_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.pdf_blank_path),
            workspace_root: env::var_os("WORKSPACE_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.workspace_root),
            tool_timeout_seconds: Self::parse_env_var(
                "TOOL_TIMEOUT_SECONDS",
                defaults.tool_timeout_seconds,
            )
            .context("Failed to parse TOOL_TIMEOUT_SECONDS")?,
            max_request_size_mb: Self::parse_env_var(
                "MAX_REQUEST_SIZE_MB",
                defaults.max_request_size_mb,
            )
            .context("Failed to parse MAX_REQUEST_SIZE_MB")?,
            tools: ToolPaths {
                latexmk: Self::string_env_var("LATEXMK_BIN", &defaults.tools.latexmk),
                qpdf: Self::string_env_var("QPDF_BIN", &defaults.tools.qpdf),
                convert: Self::string_env_var("CONVERT_BIN", &defaults.tools.convert),
            },
        };

        config.validate()?;

        if !config.pdf_blank_path.is_file() {
            warn!(
                path = %config.pdf_blank_path.display(),
                "Blank page PDF not found; merges with force_even will fail"
            );
        }

        Ok(config)
    }

    fn string_env_var(var_name: &str, default: &str) -> String {
        env::var(var_name).unwrap_or_else(|_| {
            info!("{} not set, using default: {}", var_name, default);
            default.to_string()
        })
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.trim().parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("PORT must be greater than 0"));
        }
        if self.internal_port == 0 {
            return Err(anyhow::anyhow!("INTERNAL_PORT must be greater than 0"));
        }
        if self.server_port == self.internal_port {
            return Err(anyhow::anyhow!("PORT and INTERNAL_PORT must differ"));
        }
        if self.tool_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("TOOL_TIMEOUT_SECONDS must be greater than 0"));
        }
        if self.max_request_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_REQUEST_SIZE_MB must be greater than 0"));
        }
        if self.max_request_size_mb.checked_mul(1024 * 1024).is_none() {
            return Err(anyhow::anyhow!(
                "MAX_REQUEST_SIZE_MB of {} overflows the byte limit",
                self.max_request_size_mb
            ));
        }
        Ok(())
    }

    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.tool_timeout_seconds)
    }

    pub fn max_request_size_bytes(&self) -> usize {
        self.max_request_size_mb.saturating_mul(1024 * 1024)
    }
}
