use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::error::UiResult;

/// Opaque reference to an element on the current page, minted by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Something to click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Element(ElementHandle),
    Selector(String),
}

impl From<ElementHandle> for Target {
    fn from(handle: ElementHandle) -> Self {
        Target::Element(handle)
    }
}

impl From<&str> for Target {
    fn from(selector: &str) -> Self {
        Target::Selector(selector.to_string())
    }
}

/// Remote UI driver: the browser capabilities the collection workflow needs.
///
/// Implementations wrap an external automation backend; nothing in this
/// workspace launches or controls a browser.
pub trait UiDriver: Send + Sync {
    /// Load `url` and wait for the page to settle.
    fn navigate(&self, url: &str) -> impl Future<Output = UiResult<()>> + Send;

    /// All elements currently matching `selector`, in document order.
    fn find_all(&self, selector: &str) -> impl Future<Output = UiResult<Vec<ElementHandle>>> + Send;

    fn click(&self, target: &Target) -> impl Future<Output = UiResult<()>> + Send;

    fn focus(&self, selector: &str) -> impl Future<Output = UiResult<()>> + Send;

    /// Type `text` into the element matching `selector`.
    fn type_text(&self, selector: &str, text: &str) -> impl Future<Output = UiResult<()>> + Send;

    /// Press a key by its DOM code (`"KeyA"`, `"Escape"`, `"Enter"`).
    fn press_key(&self, key: &str) -> impl Future<Output = UiResult<()>> + Send;

    /// Wait until `selector` matches, failing with `UiError::Timeout` after `timeout`.
    fn wait_for(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> impl Future<Output = UiResult<ElementHandle>> + Send;

    /// Evaluate a script in the page.
    fn evaluate(&self, script: &str) -> impl Future<Output = UiResult<serde_json::Value>> + Send;

    /// Trimmed text content of the first element matching `selector`.
    fn text_content(&self, selector: &str) -> impl Future<Output = UiResult<String>> + Send;
}
