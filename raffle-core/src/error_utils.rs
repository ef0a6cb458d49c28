use crate::error::*;
use tracing::{error, info, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Page(e) => {
                error!("Page error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            CoreError::Draw(e) => {
                error!("Draw error details: {:?}", e);
            }
            CoreError::Io(_) => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Page(e) => e.user_friendly_message(),
            CoreError::Config(e) => e.user_friendly_message(),
            CoreError::Draw(e) => e.user_friendly_message(),
            CoreError::Io(_) => {
                "Could not read from the terminal. Please run the raffle interactively.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Page(_) => "PAGE".to_string(),
            CoreError::Config(_) => "CONFIG".to_string(),
            CoreError::Draw(_) => "DRAW".to_string(),
            CoreError::Io(_) => "IO".to_string(),
        }
    }
}

impl ErrorExt for PageError {
    fn log_error(&self) -> &Self {
        error!("PageError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("PageError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            PageError::BrowserLaunch { .. } => {
                "Could not start Chrome. Install Chrome or set CHROME_BIN.".to_string()
            }
            PageError::NavigationFailed { target, .. } => {
                format!("Could not open {}. Please check the address.", target)
            }
            PageError::WaitTimeout { selector, .. } => format!(
                "The page did not show '{}' in time. It may have changed layout or you may not be logged in.",
                selector
            ),
            PageError::ElementNotFound { selector } => {
                format!("Could not find '{}' on the page.", selector)
            }
            PageError::ConnectionLost => {
                "The browser window was closed or crashed.".to_string()
            }
            _ => "The browser reported an error. Please try again.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            PageError::BrowserLaunch { .. } => "PAGE_BROWSER_LAUNCH".to_string(),
            PageError::NavigationFailed { .. } => "PAGE_NAVIGATION_FAILED".to_string(),
            PageError::WaitTimeout { .. } => "PAGE_WAIT_TIMEOUT".to_string(),
            PageError::ElementNotFound { .. } => "PAGE_ELEMENT_NOT_FOUND".to_string(),
            PageError::ScriptFailed { .. } => "PAGE_SCRIPT_FAILED".to_string(),
            PageError::InvalidResponse { .. } => "PAGE_INVALID_RESPONSE".to_string(),
            PageError::ConnectionLost => "PAGE_CONNECTION_LOST".to_string(),
        }
    }
}

impl ErrorExt for DrawError {
    fn log_error(&self) -> &Self {
        error!("DrawError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("DrawError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            DrawError::InsufficientPool {
                available,
                requested,
            } => format!(
                "Not enough eligible participants after exclusions ({}) < {}",
                available, requested
            ),
        }
    }

    fn error_code(&self) -> String {
        match self {
            DrawError::InsufficientPool { .. } => "DRAW_INSUFFICIENT_POOL".to_string(),
        }
    }
}

impl ErrorExt for ConfigError {
    fn log_error(&self) -> &Self {
        error!("ConfigError: {}", self);
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("ConfigError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            ConfigError::FileNotFound { path } => {
                format!("Configuration file '{}' not found.", path)
            }
            ConfigError::MissingField { field } => {
                format!("Required field '{}' is missing.", field)
            }
            ConfigError::InvalidValue { field, value } => {
                format!("Invalid value '{}' for '{}'.", value, field)
            }
            ConfigError::ValidationFailed { reason } => {
                format!("Configuration is not usable: {}.", reason)
            }
            ConfigError::Parse(_) => {
                "Configuration file format is invalid. Please check the settings.".to_string()
            }
        }
    }

    fn error_code(&self) -> String {
        match self {
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND".to_string(),
            ConfigError::MissingField { .. } => "CONFIG_MISSING_FIELD".to_string(),
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE".to_string(),
            ConfigError::ValidationFailed { .. } => "CONFIG_VALIDATION_FAILED".to_string(),
            ConfigError::Parse(_) => "CONFIG_PARSE_ERROR".to_string(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ErrorReporter;

impl ErrorReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report_error(&self, error: &CoreError) {
        error.log_error();
        info!("Error code: {}", error.error_code());
        info!("User message: {}", error.user_friendly_message());
    }

    pub fn report_warning(&self, error: &CoreError) {
        error.log_warn();
        info!("Warning code: {}", error.error_code());
    }
}
