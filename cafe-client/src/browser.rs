use crate::metrics::{MetricsCollector, OperationRecord, RenderMetrics};
use crate::scripts;
use async_trait::async_trait;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use raffle_core::{
    find_labeled_count, ExtractedRecord, FieldRule, PageControl, PageError, PageRenderer,
    ProfileSelectors, StatCounter,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Launch options for the Chromium session.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub window_size: (u32, u32),
    pub poll_interval: Duration,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: false,
            chrome_executable: None,
            window_size: (1280, 900),
            poll_interval: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LocatedControl {
    found: bool,
    tag: String,
    label: String,
}

/// [`PageRenderer`] backed by a single Chromium tab.
pub struct ChromeRenderer {
    browser: Mutex<Browser>,
    page: Page,
    handler: JoinHandle<()>,
    frame: Mutex<Option<String>>,
    poll_interval: Duration,
    metrics: Arc<MetricsCollector>,
}

impl ChromeRenderer {
    pub async fn launch(options: LaunchOptions) -> Result<Self, PageError> {
        let executable = options
            .chrome_executable
            .clone()
            .or_else(|| std::env::var("CHROME_BIN").ok().map(PathBuf::from));

        let mut builder = chromiumoxide::BrowserConfig::builder()
            .window_size(options.window_size.0, options.window_size.1);
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(ref path) = executable {
            info!("Using Chrome binary: {}", path.display());
            builder = builder.chrome_executable(path);
        }
        let config = builder
            .build()
            .map_err(|details| PageError::BrowserLaunch { details })?;

        let (browser, mut handler) =
            Browser::launch(config)
                .await
                .map_err(|e| PageError::BrowserLaunch {
                    details: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
            debug!("Browser handler loop finished");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| PageError::BrowserLaunch {
                details: e.to_string(),
            })?;

        info!(
            "Chrome launched (headless={}, window={}x{})",
            options.headless, options.window_size.0, options.window_size.1
        );

        Ok(Self {
            browser: Mutex::new(browser),
            page,
            handler,
            frame: Mutex::new(None),
            poll_interval: options.poll_interval,
            metrics: Arc::new(MetricsCollector::new()),
        })
    }

    pub async fn get_metrics(&self) -> RenderMetrics {
        self.metrics.get_metrics().await
    }

    pub async fn export_metrics(&self) -> Result<String, serde_json::Error> {
        self.metrics.export_metrics().await
    }

    pub async fn close(self) -> Result<(), PageError> {
        let mut browser = self.browser.into_inner();
        browser.close().await.map_err(|e| map_cdp_error(e.to_string()))?;
        if let Err(e) = browser.wait().await {
            warn!("Chrome did not exit cleanly: {}", e);
        }
        self.handler.abort();
        info!("Chrome closed");
        Ok(())
    }

    async fn current_frame(&self) -> Option<String> {
        self.frame.lock().await.clone()
    }

    async fn evaluate<T: DeserializeOwned>(&self, script: String) -> Result<T, PageError> {
        let params = EvaluateParams::builder()
            .expression(script)
            .return_by_value(true)
            .build()
            .map_err(|details| PageError::ScriptFailed { details })?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| map_cdp_error(e.to_string()))?;

        result
            .into_value::<T>()
            .map_err(|e| PageError::InvalidResponse {
                details: e.to_string(),
            })
    }

    async fn observe<T>(
        &self,
        operation: &'static str,
        started: Instant,
        result: Result<T, PageError>,
    ) -> Result<T, PageError> {
        self.metrics
            .record(OperationRecord {
                operation,
                latency: started.elapsed(),
                success: result.is_ok(),
                timed_out: matches!(result, Err(PageError::WaitTimeout { .. })),
            })
            .await;
        result
    }

    async fn poll_presence(
        &self,
        frame: Option<&str>,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), PageError> {
        let deadline = Instant::now() + timeout;
        let script = scripts::presence(frame, selector);

        loop {
            match self.evaluate::<bool>(script.clone()).await {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(PageError::ConnectionLost) => return Err(PageError::ConnectionLost),
                // The document may be mid-navigation; keep polling.
                Err(e) => debug!("Presence check for '{}' failed: {}", selector, e),
            }

            if Instant::now() >= deadline {
                return Err(PageError::WaitTimeout {
                    selector: selector.to_string(),
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn locate(&self, anchor: &str, offset: usize) -> Result<Option<PageControl>, PageError> {
        let frame = self.current_frame().await;
        let located: LocatedControl = self
            .evaluate(scripts::locate_control(frame.as_deref(), anchor, offset))
            .await?;

        if !located.found {
            return Ok(None);
        }
        Ok(Some(PageControl {
            anchor: anchor.to_string(),
            offset,
            tag_name: located.tag,
            label: located.label,
        }))
    }
}

/// Errors that mean the browser process or websocket is gone.
fn map_cdp_error(message: String) -> PageError {
    if message.contains("receiver is gone")
        || message.contains("channel closed")
        || message.contains("connection reset")
        || message.contains("broken pipe")
    {
        warn!("Browser connection died ({})", message);
        return PageError::ConnectionLost;
    }
    PageError::ScriptFailed { details: message }
}

#[async_trait]
impl PageRenderer for ChromeRenderer {
    async fn navigate(&self, target: &str) -> Result<(), PageError> {
        let started = Instant::now();
        *self.frame.lock().await = None;

        debug!("Navigating to {}", target);
        let result = self
            .page
            .goto(target)
            .await
            .map(|_| ())
            .map_err(|e| match map_cdp_error(e.to_string()) {
                PageError::ConnectionLost => PageError::ConnectionLost,
                _ => PageError::NavigationFailed {
                    target: target.to_string(),
                    details: e.to_string(),
                },
            });
        self.observe("navigate", started, result).await
    }

    async fn enter_frame(&self, selector: &str, timeout: Duration) -> Result<(), PageError> {
        let started = Instant::now();
        let result = self.poll_presence(None, selector, timeout).await;
        if result.is_ok() {
            debug!("Scoping queries to frame '{}'", selector);
            *self.frame.lock().await = Some(selector.to_string());
        }
        self.observe("enter_frame", started, result).await
    }

    async fn wait_for_presence(&self, selector: &str, timeout: Duration) -> Result<(), PageError> {
        let started = Instant::now();
        let frame = self.current_frame().await;
        let result = self.poll_presence(frame.as_deref(), selector, timeout).await;
        self.observe("wait_for_presence", started, result).await
    }

    async fn extract_all(
        &self,
        container: &str,
        fields: &[FieldRule],
    ) -> Result<Vec<ExtractedRecord>, PageError> {
        let started = Instant::now();
        let frame = self.current_frame().await;
        let result = self
            .evaluate::<Vec<Vec<Option<String>>>>(scripts::extract_all(
                frame.as_deref(),
                container,
                fields,
            ))
            .await
            .map(|rows| rows.into_iter().map(ExtractedRecord::new).collect());
        self.observe("extract_all", started, result).await
    }

    async fn locate_active_control(
        &self,
        selector: &str,
    ) -> Result<Option<PageControl>, PageError> {
        let started = Instant::now();
        let result = self.locate(selector, 0).await;
        self.observe("locate_control", started, result).await
    }

    async fn locate_next_control(
        &self,
        current: &PageControl,
    ) -> Result<Option<PageControl>, PageError> {
        let started = Instant::now();
        let result = self.locate(&current.anchor, current.offset + 1).await;
        self.observe("locate_control", started, result).await
    }

    async fn activate(&self, control: &PageControl) -> Result<(), PageError> {
        let started = Instant::now();
        let frame = self.current_frame().await;
        let result = match self
            .evaluate::<bool>(scripts::click_control(
                frame.as_deref(),
                &control.anchor,
                control.offset,
            ))
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => Err(PageError::ElementNotFound {
                selector: format!("{} (+{})", control.anchor, control.offset),
            }),
            Err(e) => Err(e),
        };
        self.observe("activate", started, result).await
    }

    async fn read_statistic(
        &self,
        region: &ProfileSelectors,
        label: &str,
    ) -> Result<u64, PageError> {
        let started = Instant::now();
        let frame = self.current_frame().await;
        let counters = format!("{} {}", region.stats_region, region.counter);
        let result = self
            .evaluate::<Vec<StatCounter>>(scripts::stat_counters(
                frame.as_deref(),
                &counters,
                &region.counter_value,
            ))
            .await
            .map(|counters| find_labeled_count(&counters, label));
        self.observe("read_statistic", started, result).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors_are_detected() {
        assert_eq!(
            map_cdp_error("send failed: receiver is gone".to_string()),
            PageError::ConnectionLost
        );
        assert!(matches!(
            map_cdp_error("Uncaught TypeError".to_string()),
            PageError::ScriptFailed { .. }
        ));
    }

    #[test]
    fn test_default_launch_options() {
        let options = LaunchOptions::default();
        assert!(!options.headless);
        assert_eq!(options.window_size, (1280, 900));
        assert_eq!(options.poll_interval, Duration::from_millis(100));
    }
}
