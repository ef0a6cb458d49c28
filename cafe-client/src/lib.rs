//! Chromium-backed page rendering for Naver Cafe threads.

pub mod browser;
pub mod metrics;
pub mod scripts;

pub use browser::{ChromeRenderer, LaunchOptions};
pub use metrics::{MetricsCollector, OperationMetrics, OperationRecord, RenderMetrics};
