//! Adds every icon of a catalog collection page to a new, same-named
//! collection of the logged-in user.

use std::future::Future;

use tracing::{debug, error, info, warn};

use iconbatch_core::{retry_if, ItemProcessor, ItemResult, Pacing, RetryPolicy};
use iconbatch_state::ProgressStore;

use crate::driver::{ElementHandle, Target, UiDriver};
use crate::error::{UiError, UiResult};
use crate::selectors::{Selectors, Timeouts};

const SCROLL_SCRIPT: &str = "window.scrollBy(0, window.innerHeight)";

/// Icons tried, in order, when probing for the detail popup.
const POPUP_PROBE_ICONS: usize = 3;

/// Scroll cycles without new icons before the grid counts as fully loaded.
const STABLE_CYCLES: u32 = 2;

/// Everything the processor needs besides the driver and the store.
#[derive(Debug, Clone, Default)]
pub struct ProcessorSettings {
    pub selectors: Selectors,
    pub timeouts: Timeouts,
    pub pacing: Pacing,
    pub retry: RetryPolicy,
}

/// Per-collection routine run by the batch runner.
///
/// Progress is written after every icon, so an interrupted run resumes at
/// the first icon not yet added.
pub struct CollectionProcessor<D, S> {
    driver: D,
    store: S,
    settings: ProcessorSettings,
}

impl<D: UiDriver, S: ProgressStore> CollectionProcessor<D, S> {
    pub fn new(driver: D, store: S, settings: ProcessorSettings) -> Self {
        Self {
            driver,
            store,
            settings,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Navigate to a collection and wait for its icon grid.
    pub async fn open_collection(&self, url: &str) -> UiResult<()> {
        retry_if(
            &self.settings.retry,
            move || self.navigate_and_wait(url),
            UiError::is_retryable,
        )
        .await
    }

    async fn navigate_and_wait(&self, url: &str) -> UiResult<()> {
        let selectors = &self.settings.selectors;
        let timeouts = &self.settings.timeouts;

        info!(url = %url, "Navigating to collection");
        self.driver.navigate(url).await?;

        debug!("Waiting for icons to appear");
        self.driver
            .wait_for(&selectors.grid_icon, timeouts.grid_icon)
            .await?;
        debug!("Waiting for icons grid to appear");
        self.driver.wait_for(&selectors.icons_grid, timeouts.grid).await?;
        Ok(())
    }

    /// Scroll until the icon count stops growing; returns the final count.
    pub async fn load_all_icons(&self) -> UiResult<usize> {
        let pacing = &self.settings.pacing;
        let mut loaded = 0;
        let mut stable_cycles = 0;

        loop {
            let current = self
                .driver
                .find_all(&self.settings.selectors.grid_icon)
                .await?
                .len();

            if current > loaded {
                loaded = current;
                stable_cycles = 0;
                self.driver.evaluate(SCROLL_SCRIPT).await?;
            } else {
                stable_cycles += 1;
                if stable_cycles >= STABLE_CYCLES {
                    break;
                }
            }
            pacing.pause(pacing.scroll).await;
        }

        debug!(icons = loaded, "Icon grid fully loaded");
        Ok(loaded)
    }

    /// Open the detail popup via one of the first icons.
    async fn open_detail_popup(&self, icons: &[ElementHandle]) -> bool {
        let pacing = &self.settings.pacing;

        for (i, icon) in icons.iter().take(POPUP_PROBE_ICONS).enumerate() {
            let attempt = async {
                self.driver.click(&Target::Element(icon.clone())).await?;
                pacing.pause(pacing.popup).await;
                self.driver
                    .wait_for(
                        &self.settings.selectors.detail_view,
                        self.settings.timeouts.popup_probe,
                    )
                    .await
            };

            match attempt.await {
                Ok(_) => {
                    debug!(icon = i + 1, "Detail popup opened");
                    return true;
                }
                Err(e) => warn!(icon = i + 1, error = %e, "Detail popup did not open"),
            }
        }

        false
    }

    /// Create a collection named after the page header.
    pub async fn create_collection(&self, icons: &[ElementHandle]) -> UiResult<String> {
        let selectors = &self.settings.selectors;
        let element_timeout = self.settings.timeouts.element;
        let pacing = &self.settings.pacing;

        if !self.open_detail_popup(icons).await {
            warn!("Detail popup never opened; trying to create the collection anyway");
        }

        let name = self
            .driver
            .text_content(&selectors.header_collection_name)
            .await?;
        info!(name = %name, "Creating collection");

        self.driver
            .wait_for(&selectors.add_to_collection_label, element_timeout)
            .await?;
        self.driver
            .click(&Target::Selector(selectors.add_to_collection_label.clone()))
            .await?;
        self.driver
            .wait_for(&selectors.add_to_collection_content, element_timeout)
            .await?;

        self.driver
            .wait_for(&selectors.new_collection_button, element_timeout)
            .await?;
        self.driver
            .click(&Target::Selector(selectors.new_collection_button.clone()))
            .await?;

        self.driver
            .wait_for(&selectors.new_collection_container, element_timeout)
            .await?;
        self.driver
            .wait_for(&selectors.new_collection_input, element_timeout)
            .await?;
        self.driver
            .type_text(&selectors.new_collection_input, &name)
            .await?;
        self.driver.press_key("Enter").await?;
        pacing.pause(pacing.collection).await;

        info!(name = %name, "Submitted new collection");
        Ok(name)
    }

    /// Open an icon's popup, add it with `A`, close the popup.
    async fn add_icon(&self, icon: &ElementHandle) -> UiResult<()> {
        let pacing = &self.settings.pacing;

        self.driver.click(&Target::Element(icon.clone())).await?;
        pacing.pause(pacing.action).await;
        self.driver.focus(&self.settings.selectors.page_body).await?;
        self.driver.press_key("KeyA").await?;
        pacing.pause(pacing.action).await;
        self.driver.press_key("Escape").await?;
        pacing.pause(pacing.action).await;
        Ok(())
    }

    async fn process_collection(&self, url: &str, resume_offset: u64) -> UiResult<ItemResult> {
        // Failing to reach the grid fails the whole item.
        self.open_collection(url).await?;

        let mut processed = resume_offset;
        let mut total = 0;

        match self
            .add_icons(url, resume_offset, &mut processed, &mut total)
            .await
        {
            Ok(success) => Ok(ItemResult {
                processed,
                total,
                success,
            }),
            Err(e) => {
                error!(url = %url, processed, total, error = %e, "Collection processing aborted");
                self.store.update(url, total, processed, false);
                Ok(ItemResult {
                    processed,
                    total,
                    success: false,
                })
            }
        }
    }

    async fn add_icons(
        &self,
        url: &str,
        resume_offset: u64,
        processed: &mut u64,
        total: &mut u64,
    ) -> UiResult<bool> {
        *total = self.load_all_icons().await? as u64;
        info!(icons = *total, resume_offset, "Found icons");

        let icons = self
            .driver
            .find_all(&self.settings.selectors.grid_icon)
            .await?;

        if resume_offset == 0 {
            if let Err(e) = self.create_collection(&icons).await {
                error!(url = %url, error = %e, "Failed to create collection");
                self.store.update(url, *total, *processed, false);
            }
        }

        let mut success = true;
        for (i, icon) in icons.iter().enumerate().skip(resume_offset as usize) {
            match self.add_icon(icon).await {
                Ok(()) => {
                    *processed = i as u64 + 1;
                    self.store.update(url, *total, *processed, true);
                }
                Err(e) => {
                    warn!(icon = i + 1, error = %e, "Failed to add icon");
                    success = false;
                    self.store.update(url, *total, *processed, false);
                }
            }
        }

        Ok(success)
    }
}

impl<D: UiDriver, S: ProgressStore> ItemProcessor for CollectionProcessor<D, S> {
    type Error = UiError;

    fn process(
        &mut self,
        key: &str,
        resume_offset: u64,
    ) -> impl Future<Output = Result<ItemResult, UiError>> + Send {
        self.process_collection(key, resume_offset)
    }
}
