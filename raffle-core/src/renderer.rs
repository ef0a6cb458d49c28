//! Capability interface over a live rendered document.
//!
//! The raffle pipeline only ever talks to a [`PageRenderer`]; the Chromium
//! implementation lives in `cafe-client` and tests use an in-memory fake.

use crate::config::ProfileSelectors;
use crate::error::PageError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldSource {
    Text,
    Attribute(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    pub selector: String,
    pub source: FieldSource,
}

impl FieldRule {
    pub fn text(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            source: FieldSource::Text,
        }
    }

    pub fn attribute(selector: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            source: FieldSource::Attribute(attribute.into()),
        }
    }
}

/// Values extracted from one element, aligned with the rules that produced
/// them. A missing sub-element yields `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub values: Vec<Option<String>>,
}

impl ExtractedRecord {
    pub fn new(values: Vec<Option<String>>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(|v| v.as_deref())
    }
}

/// A located pagination control: the element matched by `anchor`, walked
/// `offset` siblings forward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageControl {
    pub anchor: String,
    pub offset: usize,
    pub tag_name: String,
    pub label: String,
}

impl PageControl {
    /// Only `<button>` siblings advance the comment list.
    pub fn is_page_advance(&self) -> bool {
        self.tag_name.eq_ignore_ascii_case("button")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatCounter {
    pub label: String,
    pub value: Option<String>,
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Loads `target` in the page and resets any frame scope.
    async fn navigate(&self, target: &str) -> Result<(), PageError>;

    /// Scopes later queries to the document of the frame matched by
    /// `selector`.
    async fn enter_frame(&self, selector: &str, timeout: Duration) -> Result<(), PageError>;

    async fn wait_for_presence(&self, selector: &str, timeout: Duration) -> Result<(), PageError>;

    async fn extract_all(
        &self,
        container: &str,
        fields: &[FieldRule],
    ) -> Result<Vec<ExtractedRecord>, PageError>;

    async fn locate_active_control(&self, selector: &str)
        -> Result<Option<PageControl>, PageError>;

    async fn locate_next_control(
        &self,
        current: &PageControl,
    ) -> Result<Option<PageControl>, PageError>;

    async fn activate(&self, control: &PageControl) -> Result<(), PageError>;

    /// Reads the numeric value of the counter labeled `label`, 0 when no
    /// counter matches or its value does not parse.
    async fn read_statistic(
        &self,
        region: &ProfileSelectors,
        label: &str,
    ) -> Result<u64, PageError>;
}

/// Picks the last counter whose label contains `label` and parses its value.
pub fn find_labeled_count(counters: &[StatCounter], label: &str) -> u64 {
    counters
        .iter()
        .filter(|counter| counter.label.contains(label))
        .last()
        .map(|counter| parse_counter_value(counter.value.as_deref().unwrap_or("")))
        .unwrap_or(0)
}

pub fn parse_counter_value(raw: &str) -> u64 {
    let digits: String = raw
        .replace(',', "")
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter(label: &str, value: Option<&str>) -> StatCounter {
        StatCounter {
            label: label.to_string(),
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_counter_value() {
        assert_eq!(parse_counter_value("1,234"), 1234);
        assert_eq!(parse_counter_value(" 42 "), 42);
        assert_eq!(parse_counter_value("17개"), 17);
        assert_eq!(parse_counter_value(""), 0);
        assert_eq!(parse_counter_value("n/a"), 0);
    }

    #[test]
    fn test_find_labeled_count() {
        let counters = vec![
            counter("방문 12", Some("12")),
            counter("작성글 1,020", Some("1,020")),
            counter("댓글 88", Some("88")),
        ];
        assert_eq!(find_labeled_count(&counters, "작성글"), 1020);
        assert_eq!(find_labeled_count(&counters, "구독"), 0);
    }

    #[test]
    fn test_last_matching_counter_wins() {
        let counters = vec![counter("작성글", Some("3")), counter("작성글", Some("9"))];
        assert_eq!(find_labeled_count(&counters, "작성글"), 9);
    }

    #[test]
    fn test_missing_value_counts_as_zero() {
        let counters = vec![counter("작성글", None)];
        assert_eq!(find_labeled_count(&counters, "작성글"), 0);
    }

    #[test]
    fn test_only_buttons_advance() {
        let mut control = PageControl {
            anchor: ".btn".to_string(),
            offset: 1,
            tag_name: "BUTTON".to_string(),
            label: "2".to_string(),
        };
        assert!(control.is_page_advance());
        control.tag_name = "SPAN".to_string();
        assert!(!control.is_page_advance());
    }
}
