use std::time::Duration;

use serde::{Deserialize, Serialize};

/// CSS selectors into the icon catalog.
///
/// Every field can be overridden from config when the site markup changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub grid_icon: String,
    pub icons_grid: String,
    pub detail_view: String,
    pub add_to_collection_label: String,
    pub add_to_collection_content: String,
    pub new_collection_button: String,
    pub new_collection_container: String,
    pub new_collection_input: String,
    pub header_collection_name: String,
    pub page_body: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            grid_icon: ".app-grid-icon__image".to_string(),
            icons_grid: ".grid-icons".to_string(),
            detail_view: ".app-accordion2__content".to_string(),
            add_to_collection_label: ".accordion-to-collection .i8-dropdown__label".to_string(),
            add_to_collection_content: ".accordion-to-collection .i8-dropdown__content"
                .to_string(),
            new_collection_button: ".accordion-to-collection .new-collection__button".to_string(),
            new_collection_container: "div.new-collection__container".to_string(),
            new_collection_input:
                r#"div.new-collection__container input[placeholder="Collection name..."]"#
                    .to_string(),
            header_collection_name: ".author-group-header h3".to_string(),
            page_body: "body".to_string(),
        }
    }
}

/// Upper bounds for waits on page state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// First grid icon after navigation.
    pub grid_icon: Duration,
    /// The grid container after navigation.
    pub grid: Duration,
    /// Dropdowns, buttons and inputs of the add-to-collection flow.
    pub element: Duration,
    /// Per-icon probe for the detail popup.
    pub popup_probe: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            grid_icon: Duration::from_secs(10),
            grid: Duration::from_secs(15),
            element: Duration::from_secs(5),
            popup_probe: Duration::from_secs(2),
        }
    }
}
