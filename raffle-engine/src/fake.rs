//! In-memory [`PageRenderer`] serving fixture thread pages and profiles.

use async_trait::async_trait;
use raffle_core::{
    ExtractedRecord, FieldRule, PageControl, PageError, PageRenderer, ProfileSelectors,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub const THREAD_URL: &str = "https://cafe.naver.com/testcafe/1";

pub fn record(author: &str, text: &str, href: &str) -> ExtractedRecord {
    ExtractedRecord::new(vec![
        Some(author.to_string()),
        Some(text.to_string()),
        Some(href.to_string()),
    ])
}

/// What follows the active page button on a fixture page.
#[derive(Debug, Clone, Copy)]
pub enum NextControl {
    Button,
    Element(&'static str),
    NoSuccessor,
    NoPagination,
}

#[derive(Debug, Clone)]
pub struct FakePage {
    records: Vec<ExtractedRecord>,
    next: Option<NextControl>,
    renders: bool,
}

impl FakePage {
    pub fn new(records: Vec<ExtractedRecord>) -> Self {
        Self {
            records,
            next: None,
            renders: true,
        }
    }

    pub fn with_next(mut self, next: NextControl) -> Self {
        self.next = Some(next);
        self
    }

    pub fn never_renders(mut self) -> Self {
        self.renders = false;
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub enum FakeProfile {
    Posts(u64),
    NavigationFails,
    NeverRenders,
    ScriptFails,
}

#[derive(Debug, Clone, PartialEq)]
enum View {
    Blank,
    Thread,
    Profile(String),
}

#[derive(Debug)]
struct State {
    view: View,
    page: usize,
    frame: Option<String>,
    navigations: Vec<String>,
    activated: Vec<String>,
}

pub struct FakeRenderer {
    pages: Vec<FakePage>,
    profiles: HashMap<String, FakeProfile>,
    state: Mutex<State>,
}

impl FakeRenderer {
    /// A renderer already showing the first page of the thread.
    pub fn with_thread(pages: Vec<FakePage>) -> Self {
        Self {
            pages,
            profiles: HashMap::new(),
            state: Mutex::new(State {
                view: View::Thread,
                page: 0,
                frame: None,
                navigations: Vec::new(),
                activated: Vec::new(),
            }),
        }
    }

    /// A renderer that shows the thread only once navigated to [`THREAD_URL`].
    pub fn blank(pages: Vec<FakePage>) -> Self {
        let renderer = Self::with_thread(pages);
        renderer.state.lock().unwrap().view = View::Blank;
        renderer
    }

    pub fn with_profile(mut self, url: &str, profile: FakeProfile) -> Self {
        self.profiles.insert(url.to_string(), profile);
        self
    }

    /// Labels of the controls activated so far.
    pub fn activated(&self) -> Vec<String> {
        self.state.lock().unwrap().activated.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn frame(&self) -> Option<String> {
        self.state.lock().unwrap().frame.clone()
    }

    fn next_control(&self, page: usize) -> NextControl {
        let fixture = &self.pages[page];
        fixture.next.unwrap_or(if page + 1 < self.pages.len() {
            NextControl::Button
        } else {
            NextControl::NoSuccessor
        })
    }

    fn timeout(selector: &str, timeout: Duration) -> PageError {
        PageError::WaitTimeout {
            selector: selector.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }
    }
}

#[async_trait]
impl PageRenderer for FakeRenderer {
    async fn navigate(&self, target: &str) -> Result<(), PageError> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(target.to_string());
        state.frame = None;

        if target == THREAD_URL {
            state.view = View::Thread;
            state.page = 0;
            return Ok(());
        }

        match self.profiles.get(target) {
            Some(FakeProfile::NavigationFails) => Err(PageError::NavigationFailed {
                target: target.to_string(),
                details: "net::ERR_CONNECTION_RESET".to_string(),
            }),
            Some(_) => {
                state.view = View::Profile(target.to_string());
                Ok(())
            }
            None => {
                state.view = View::Blank;
                Ok(())
            }
        }
    }

    async fn enter_frame(&self, selector: &str, _timeout: Duration) -> Result<(), PageError> {
        self.state.lock().unwrap().frame = Some(selector.to_string());
        Ok(())
    }

    async fn wait_for_presence(&self, selector: &str, timeout: Duration) -> Result<(), PageError> {
        let state = self.state.lock().unwrap();
        match &state.view {
            View::Thread if self.pages.get(state.page).map_or(false, |p| p.renders) => Ok(()),
            View::Profile(url) => match self.profiles.get(url) {
                Some(FakeProfile::NeverRenders) => Err(Self::timeout(selector, timeout)),
                _ => Ok(()),
            },
            _ => Err(Self::timeout(selector, timeout)),
        }
    }

    async fn extract_all(
        &self,
        _container: &str,
        _fields: &[FieldRule],
    ) -> Result<Vec<ExtractedRecord>, PageError> {
        let state = self.state.lock().unwrap();
        match state.view {
            View::Thread => Ok(self.pages[state.page].records.clone()),
            _ => Ok(Vec::new()),
        }
    }

    async fn locate_active_control(
        &self,
        selector: &str,
    ) -> Result<Option<PageControl>, PageError> {
        let state = self.state.lock().unwrap();
        if state.view != View::Thread {
            return Ok(None);
        }
        match self.next_control(state.page) {
            NextControl::NoPagination => Ok(None),
            _ => Ok(Some(PageControl {
                anchor: selector.to_string(),
                offset: 0,
                tag_name: "BUTTON".to_string(),
                label: (state.page + 1).to_string(),
            })),
        }
    }

    async fn locate_next_control(
        &self,
        current: &PageControl,
    ) -> Result<Option<PageControl>, PageError> {
        let state = self.state.lock().unwrap();
        let tag = match self.next_control(state.page) {
            NextControl::Button => "BUTTON",
            NextControl::Element(tag) => tag,
            NextControl::NoSuccessor | NextControl::NoPagination => return Ok(None),
        };
        Ok(Some(PageControl {
            anchor: current.anchor.clone(),
            offset: current.offset + 1,
            tag_name: tag.to_string(),
            label: (state.page + 2).to_string(),
        }))
    }

    async fn activate(&self, control: &PageControl) -> Result<(), PageError> {
        let mut state = self.state.lock().unwrap();
        if state.page + 1 >= self.pages.len() {
            return Err(PageError::ElementNotFound {
                selector: control.anchor.clone(),
            });
        }
        state.page += 1;
        state.activated.push(control.label.clone());
        Ok(())
    }

    async fn read_statistic(
        &self,
        _region: &ProfileSelectors,
        _label: &str,
    ) -> Result<u64, PageError> {
        let state = self.state.lock().unwrap();
        let View::Profile(url) = &state.view else {
            return Ok(0);
        };
        match self.profiles.get(url) {
            Some(FakeProfile::Posts(posts)) => Ok(*posts),
            Some(FakeProfile::ScriptFails) => Err(PageError::ScriptFailed {
                details: "Cannot read properties of null".to_string(),
            }),
            _ => Ok(0),
        }
    }
}
