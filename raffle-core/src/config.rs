//! Raffle configuration.
//!
//! Every field has a default matching the Naver Cafe layout, so a config file
//! only needs to name what differs.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaffleConfig {
    pub site: SiteConfig,
    pub comments: CommentSelectors,
    pub profile: ProfileSelectors,
    pub timing: TimingConfig,
    pub browser: BrowserConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Base URL relative profile links are resolved against.
    pub base_url: String,
    pub login_url: String,
    /// Frame holding the article and its comments, if any.
    pub frame_selector: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://cafe.naver.com".to_string(),
            login_url: "https://nid.naver.com/nidlogin.login".to_string(),
            frame_selector: Some("iframe#cafe_main".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentSelectors {
    pub comment_box: String,
    pub author: String,
    pub content: String,
    pub profile_link: String,
    pub profile_attribute: String,
    pub active_page: String,
}

impl Default for CommentSelectors {
    fn default() -> Self {
        Self {
            comment_box: "ul.comment_list > li.CommentItem".to_string(),
            author: "a.comment_nickname".to_string(),
            content: "span.text_comment".to_string(),
            profile_link: "a.comment_thumb".to_string(),
            profile_attribute: "href".to_string(),
            active_page: ".ArticlePaginate .btn.number[aria-pressed=\"true\"]".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSelectors {
    pub stats_region: String,
    pub counter: String,
    pub counter_value: String,
    /// Label of the written-posts counter.
    pub posts_label: String,
}

impl Default for ProfileSelectors {
    fn default() -> Self {
        Self {
            stats_region: ".info_area".to_string(),
            counter: ".count".to_string(),
            counter_value: "em.num".to_string(),
            posts_label: "작성글".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub pagination_wait_ms: u64,
    pub profile_wait_ms: u64,
    pub page_settle_ms: u64,
    pub poll_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            pagination_wait_ms: 5000,
            profile_wait_ms: 5000,
            page_settle_ms: 1500,
            poll_interval_ms: 100,
        }
    }
}

impl TimingConfig {
    pub fn pagination_wait(&self) -> Duration {
        Duration::from_millis(self.pagination_wait_ms)
    }

    pub fn profile_wait(&self) -> Duration {
        Duration::from_millis(self.profile_wait_ms)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub chrome_executable: Option<String>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            // Manual login needs a visible window.
            headless: false,
            chrome_executable: None,
            window_width: 1280,
            window_height: 900,
        }
    }
}

impl RaffleConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: RaffleConfig = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            debug!("Failed to read config {}: {}", path.display(), e);
            ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
        })?;
        let config = Self::from_toml_str(&raw)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("No configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = url::Url::parse(&self.site.base_url).map_err(|_| ConfigError::InvalidValue {
            field: "site.base_url".to_string(),
            value: self.site.base_url.clone(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "site.base_url".to_string(),
                value: self.site.base_url.clone(),
            });
        }

        if self.timing.pagination_wait_ms == 0 || self.timing.profile_wait_ms == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "wait timeouts must be greater than zero".to_string(),
            });
        }
        if self.timing.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed {
                reason: "poll interval must be greater than zero".to_string(),
            });
        }

        let required = [
            ("comments.comment_box", &self.comments.comment_box),
            ("comments.author", &self.comments.author),
            ("comments.content", &self.comments.content),
            ("comments.profile_link", &self.comments.profile_link),
            ("comments.active_page", &self.comments.active_page),
            ("profile.stats_region", &self.profile.stats_region),
            ("profile.counter", &self.profile.counter),
            ("profile.posts_label", &self.profile.posts_label),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn resolve_profile_url(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let base = url::Url::parse(&self.site.base_url).ok()?;
        base.join(href).ok().map(String::from)
    }
}
