//! Configuration module

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "Models/fraud_detection_model.onnx";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// ONNX model artifact
    pub model_path: PathBuf,

    /// Sidecar with feature names and model type
    pub model_metadata_path: PathBuf,

    /// ONNX Runtime intra-op threads
    pub ort_intra_threads: usize,

    /// Environment (development, production)
    pub environment: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = PathBuf::from(
            lookup("MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string()),
        );

        let model_metadata_path = lookup("MODEL_METADATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| model_path.with_extension("json"));

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            model_path,
            model_metadata_path,

            ort_intra_threads: lookup("ORT_INTRA_THREADS")
                .and_then(|t| t.parse().ok())
                .filter(|&t| t > 0)
                .unwrap_or(1),

            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),

            log_format: lookup("LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
