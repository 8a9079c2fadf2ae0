use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::driver::{ElementHandle, Target, UiDriver};
use crate::error::{UiError, UiResult};
use crate::selectors::Selectors;

/// A recorded driver call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
    Navigate(String),
    Click(String),
    Focus(String),
    Type { selector: String, text: String },
    Key(String),
    Evaluate(String),
}

/// A scripted page model for testing.
///
/// Icons are revealed in batches as the page is scrolled. Clicking an icon
/// opens the detail popup (unless told otherwise), `KeyA` adds the icon whose
/// popup is open, `Escape` closes it.
#[derive(Clone)]
pub struct MockDriver {
    state: Arc<Mutex<MockPage>>,
}

struct MockPage {
    icon_selector: String,
    total_icons: usize,
    reveal_per_scroll: usize,
    revealed: usize,
    elements: HashSet<String>,
    texts: HashMap<String, String>,
    popup_selector: Option<String>,
    popup_open: bool,
    last_clicked: Option<usize>,
    no_popup: HashSet<usize>,
    failing_clicks: HashSet<usize>,
    navigation_failures: u32,
    actions: Vec<MockAction>,
    added: Vec<usize>,
}

impl MockDriver {
    /// A page whose `icon_selector` matches `total_icons` icons once fully scrolled.
    pub fn new(icon_selector: impl Into<String>, total_icons: usize) -> Self {
        let page = MockPage {
            icon_selector: icon_selector.into(),
            total_icons,
            reveal_per_scroll: total_icons.max(1),
            revealed: 0,
            elements: HashSet::from(["body".to_string()]),
            texts: HashMap::new(),
            popup_selector: None,
            popup_open: false,
            last_clicked: None,
            no_popup: HashSet::new(),
            failing_clicks: HashSet::new(),
            navigation_failures: 0,
            actions: Vec::new(),
            added: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(page)),
        }
    }

    /// A fully working collection page for `selectors`, titled `header`.
    pub fn collection_page(selectors: &Selectors, total_icons: usize, header: &str) -> Self {
        Self::new(&selectors.grid_icon, total_icons)
            .with_element(&selectors.icons_grid)
            .with_element(&selectors.add_to_collection_label)
            .with_element(&selectors.add_to_collection_content)
            .with_element(&selectors.new_collection_button)
            .with_element(&selectors.new_collection_container)
            .with_element(&selectors.new_collection_input)
            .with_element(&selectors.page_body)
            .with_text(&selectors.header_collection_name, header)
            .with_popup(&selectors.detail_view)
    }

    pub fn reveal_per_scroll(self, count: usize) -> Self {
        self.state.lock().unwrap().reveal_per_scroll = count.max(1);
        self
    }

    pub fn with_element(self, selector: impl Into<String>) -> Self {
        self.state.lock().unwrap().elements.insert(selector.into());
        self
    }

    pub fn without_element(self, selector: &str) -> Self {
        self.state.lock().unwrap().elements.remove(selector);
        self
    }

    pub fn with_text(self, selector: impl Into<String>, text: impl Into<String>) -> Self {
        let selector = selector.into();
        let mut state = self.state.lock().unwrap();
        state.elements.insert(selector.clone());
        state.texts.insert(selector, text.into());
        drop(state);
        self
    }

    /// `selector` matches only while an icon's detail popup is open.
    pub fn with_popup(self, selector: impl Into<String>) -> Self {
        self.state.lock().unwrap().popup_selector = Some(selector.into());
        self
    }

    /// Clicking these icons does not open the popup.
    pub fn no_popup_for(self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.state.lock().unwrap().no_popup.extend(indices);
        self
    }

    /// Clicking these icons fails.
    pub fn failing_clicks(self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.state.lock().unwrap().failing_clicks.extend(indices);
        self
    }

    /// The next `count` navigations fail.
    pub fn failing_navigations(self, count: u32) -> Self {
        self.state.lock().unwrap().navigation_failures = count;
        self
    }

    pub fn actions(&self) -> Vec<MockAction> {
        self.state.lock().unwrap().actions.clone()
    }

    /// Indices of icons added to a collection, in order.
    pub fn added(&self) -> Vec<usize> {
        self.state.lock().unwrap().added.clone()
    }

    pub fn navigations(&self) -> usize {
        self.count(|a| matches!(a, MockAction::Navigate(_)))
    }

    pub fn scrolls(&self) -> usize {
        self.count(|a| matches!(a, MockAction::Evaluate(_)))
    }

    fn count(&self, pred: impl Fn(&MockAction) -> bool) -> usize {
        self.state.lock().unwrap().actions.iter().filter(|a| pred(a)).count()
    }
}

impl MockPage {
    fn is_present(&self, selector: &str) -> bool {
        if selector == self.icon_selector {
            return self.revealed > 0;
        }
        if self.popup_selector.as_deref() == Some(selector) {
            return self.popup_open;
        }
        self.elements.contains(selector)
    }

    fn icon_index(&self, handle: &ElementHandle) -> Option<usize> {
        handle
            .id()
            .strip_prefix("icon-")
            .and_then(|i| i.parse().ok())
            .filter(|i| *i < self.revealed)
    }
}

impl UiDriver for MockDriver {
    fn navigate(&self, url: &str) -> impl Future<Output = UiResult<()>> + Send {
        let state = self.state.clone();
        let url = url.to_string();
        async move {
            let mut page = state.lock().unwrap();
            page.actions.push(MockAction::Navigate(url.clone()));

            if page.navigation_failures > 0 {
                page.navigation_failures -= 1;
                return Err(UiError::Navigation {
                    url,
                    message: "net::ERR_CONNECTION_RESET".to_string(),
                });
            }

            page.revealed = page.reveal_per_scroll.min(page.total_icons);
            page.popup_open = false;
            page.last_clicked = None;
            Ok(())
        }
    }

    fn find_all(&self, selector: &str) -> impl Future<Output = UiResult<Vec<ElementHandle>>> + Send {
        let state = self.state.clone();
        let selector = selector.to_string();
        async move {
            let page = state.lock().unwrap();
            let handles = if selector == page.icon_selector {
                (0..page.revealed)
                    .map(|i| ElementHandle::new(format!("icon-{i}")))
                    .collect()
            } else if page.is_present(&selector) {
                vec![ElementHandle::new(selector)]
            } else {
                vec![]
            };
            Ok(handles)
        }
    }

    fn click(&self, target: &Target) -> impl Future<Output = UiResult<()>> + Send {
        let state = self.state.clone();
        let target = target.clone();
        async move {
            let mut page = state.lock().unwrap();
            match target {
                Target::Element(handle) => {
                    page.actions.push(MockAction::Click(handle.id().to_string()));
                    if let Some(index) = page.icon_index(&handle) {
                        if page.failing_clicks.contains(&index) {
                            return Err(UiError::Driver(format!("click on icon {index} failed")));
                        }
                        page.last_clicked = Some(index);
                        page.popup_open = !page.no_popup.contains(&index);
                    } else if !page.is_present(handle.id()) {
                        return Err(UiError::ElementNotFound(handle.id().to_string()));
                    }
                }
                Target::Selector(selector) => {
                    page.actions.push(MockAction::Click(selector.clone()));
                    if !page.is_present(&selector) {
                        return Err(UiError::ElementNotFound(selector));
                    }
                }
            }
            Ok(())
        }
    }

    fn focus(&self, selector: &str) -> impl Future<Output = UiResult<()>> + Send {
        let state = self.state.clone();
        let selector = selector.to_string();
        async move {
            let mut page = state.lock().unwrap();
            page.actions.push(MockAction::Focus(selector.clone()));
            if !page.is_present(&selector) {
                return Err(UiError::ElementNotFound(selector));
            }
            Ok(())
        }
    }

    fn type_text(&self, selector: &str, text: &str) -> impl Future<Output = UiResult<()>> + Send {
        let state = self.state.clone();
        let selector = selector.to_string();
        let text = text.to_string();
        async move {
            let mut page = state.lock().unwrap();
            if !page.is_present(&selector) {
                return Err(UiError::ElementNotFound(selector));
            }
            page.actions.push(MockAction::Type { selector, text });
            Ok(())
        }
    }

    fn press_key(&self, key: &str) -> impl Future<Output = UiResult<()>> + Send {
        let state = self.state.clone();
        let key = key.to_string();
        async move {
            let mut page = state.lock().unwrap();
            match key.as_str() {
                "KeyA" if page.popup_open => {
                    if let Some(index) = page.last_clicked {
                        page.added.push(index);
                    }
                }
                "Escape" => page.popup_open = false,
                _ => {}
            }
            page.actions.push(MockAction::Key(key));
            Ok(())
        }
    }

    fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = UiResult<ElementHandle>> + Send {
        let state = self.state.clone();
        let selector = selector.to_string();
        async move {
            let page = state.lock().unwrap();
            if page.is_present(&selector) {
                Ok(ElementHandle::new(selector))
            } else {
                Err(UiError::Timeout {
                    selector,
                    timeout_ms: timeout.as_millis() as u64,
                })
            }
        }
    }

    fn evaluate(&self, script: &str) -> impl Future<Output = UiResult<serde_json::Value>> + Send {
        let state = self.state.clone();
        let script = script.to_string();
        async move {
            let mut page = state.lock().unwrap();
            if script.contains("scrollBy") {
                page.revealed = (page.revealed + page.reveal_per_scroll).min(page.total_icons);
            }
            page.actions.push(MockAction::Evaluate(script));
            Ok(serde_json::Value::Null)
        }
    }

    fn text_content(&self, selector: &str) -> impl Future<Output = UiResult<String>> + Send {
        let state = self.state.clone();
        let selector = selector.to_string();
        async move {
            let page = state.lock().unwrap();
            page.texts
                .get(&selector)
                .map(|t| t.trim().to_string())
                .ok_or(UiError::ElementNotFound(selector))
        }
    }
}
