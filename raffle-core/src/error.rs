use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Page rendering error: {0}")]
    Page(#[from] PageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Draw error: {0}")]
    Draw(#[from] DrawError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("Failed to launch browser: {details}")]
    BrowserLaunch { details: String },

    #[error("Failed to navigate to {target}: {details}")]
    NavigationFailed { target: String, details: String },

    #[error("Timed out after {timeout_ms}ms waiting for '{selector}'")]
    WaitTimeout { selector: String, timeout_ms: u64 },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Script evaluation failed: {details}")]
    ScriptFailed { details: String },

    #[error("Invalid page response: {details}")]
    InvalidResponse { details: String },

    #[error("Browser connection lost")]
    ConnectionLost,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrawError {
    #[error("Insufficient eligible pool: {available} available, {requested} requested")]
    InsufficientPool { available: usize, requested: usize },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("Configuration validation failed: {reason}")]
    ValidationFailed { reason: String },

    #[error("Configuration parsing error: {0}")]
    Parse(#[from] toml::de::Error),
}
