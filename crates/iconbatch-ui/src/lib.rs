mod driver;
mod error;
mod mock;
mod processor;
mod selectors;

pub use driver::{ElementHandle, Target, UiDriver};
pub use error::{UiError, UiResult};
pub use mock::{MockAction, MockDriver};
pub use processor::{CollectionProcessor, ProcessorSettings};
pub use selectors::{Selectors, Timeouts};
