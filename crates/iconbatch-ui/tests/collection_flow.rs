use std::sync::Arc;
use std::time::Duration;

use iconbatch_core::{BatchRunner, ItemOutcome, ItemProcessor, Pacing, RetryPolicy};
use iconbatch_state::{MemoryStore, ProgressStore};
use iconbatch_ui::{CollectionProcessor, MockAction, MockDriver, ProcessorSettings, Selectors};

const URL_A: &str = "https://icons.example/authors/x/set-a";
const URL_B: &str = "https://icons.example/authors/x/set-b";

fn settings() -> ProcessorSettings {
    ProcessorSettings {
        pacing: Pacing::none(),
        retry: RetryPolicy::try_new(3, Duration::from_millis(10)).unwrap(),
        ..Default::default()
    }
}

fn typed_collection_names(driver: &MockDriver) -> Vec<String> {
    let input = Selectors::default().new_collection_input;
    driver
        .actions()
        .into_iter()
        .filter_map(|a| match a {
            MockAction::Type { selector, text } if selector == input => Some(text),
            _ => None,
        })
        .collect()
}

#[tokio::test(start_paused = true)]
async fn fresh_collection_is_created_and_filled() {
    let selectors = Selectors::default();
    let driver = MockDriver::collection_page(&selectors, 5, "  Human Civilization Vol.1 ")
        .reveal_per_scroll(2);
    let store = Arc::new(MemoryStore::new());
    let mut processor = CollectionProcessor::new(driver.clone(), store.clone(), settings());

    let result = processor.process(URL_A, 0).await.unwrap();

    assert_eq!((result.processed, result.total, result.success), (5, 5, true));
    assert_eq!(driver.added(), vec![0, 1, 2, 3, 4]);
    assert_eq!(driver.scrolls(), 3);
    assert_eq!(
        typed_collection_names(&driver),
        vec!["Human Civilization Vol.1".to_string()]
    );

    let record = store.load().get(URL_A).cloned().unwrap();
    assert_eq!((record.processed, record.total, record.success), (5, 5, true));
}

#[tokio::test(start_paused = true)]
async fn resumed_collection_skips_setup_and_done_icons() {
    let selectors = Selectors::default();
    let driver = MockDriver::collection_page(&selectors, 5, "Set A");
    let store = Arc::new(MemoryStore::new());
    store.update(URL_A, 5, 3, false);

    let runner = BatchRunner::new(store.clone());
    let mut processor = CollectionProcessor::new(driver.clone(), store.clone(), settings());

    let report = runner.run([URL_A], &mut processor).await;

    assert_eq!(report.items[0].resume_offset, 3);
    assert_eq!(driver.added(), vec![3, 4]);
    assert!(typed_collection_names(&driver).is_empty());
    assert_eq!(store.load().resume_offset(URL_A), 5);
}

#[tokio::test(start_paused = true)]
async fn failed_icon_marks_collection_unsuccessful() {
    let selectors = Selectors::default();
    let driver = MockDriver::collection_page(&selectors, 5, "Set A").failing_clicks([1]);
    let store = Arc::new(MemoryStore::new());
    let runner = BatchRunner::new(store.clone());
    let mut processor = CollectionProcessor::new(driver.clone(), store.clone(), settings());

    let report = runner.run([URL_A], &mut processor).await;

    assert_eq!(report.incomplete(), 1);
    assert_eq!(driver.added(), vec![0, 2, 3, 4]);
    let record = store.load().get(URL_A).cloned().unwrap();
    assert_eq!((record.processed, record.success), (5, false));
}

#[tokio::test(start_paused = true)]
async fn setup_failure_still_adds_icons() {
    let selectors = Selectors::default();
    let driver = MockDriver::collection_page(&selectors, 3, "Set A")
        .without_element(&selectors.new_collection_button);
    let store = Arc::new(MemoryStore::new());
    let mut processor = CollectionProcessor::new(driver.clone(), store.clone(), settings());

    let result = processor.process(URL_A, 0).await.unwrap();

    assert!(typed_collection_names(&driver).is_empty());
    assert_eq!(driver.added(), vec![0, 1, 2]);
    assert_eq!(result.processed, 3);
}

#[tokio::test(start_paused = true)]
async fn popup_probe_falls_through_to_collection_creation() {
    let selectors = Selectors::default();
    let driver = MockDriver::collection_page(&selectors, 4, "Set A").no_popup_for([0, 1, 2]);
    let store = Arc::new(MemoryStore::new());
    let mut processor = CollectionProcessor::new(driver.clone(), store, settings());

    processor.process(URL_A, 0).await.unwrap();

    let icon_clicks = driver
        .actions()
        .into_iter()
        .take_while(|a| !matches!(a, MockAction::Type { .. }))
        .filter(|a| matches!(a, MockAction::Click(id) if id.starts_with("icon-")))
        .count();
    assert_eq!(icon_clicks, 3);
    assert_eq!(typed_collection_names(&driver), vec!["Set A".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn flaky_navigation_is_retried() {
    let selectors = Selectors::default();
    let driver = MockDriver::collection_page(&selectors, 2, "Set A").failing_navigations(2);
    let store = Arc::new(MemoryStore::new());
    let mut processor = CollectionProcessor::new(driver.clone(), store, settings());

    let result = processor.process(URL_A, 0).await.unwrap();

    assert_eq!(driver.navigations(), 3);
    assert!(result.success);
}

#[tokio::test(start_paused = true)]
async fn missing_grid_fails_item_but_not_batch() {
    let selectors = Selectors::default();
    let broken = MockDriver::collection_page(&selectors, 2, "Set A")
        .without_element(&selectors.icons_grid);
    let store = Arc::new(MemoryStore::new());
    let prior = store.update(URL_A, 10, 4, false);

    let runner = BatchRunner::new(store.clone());
    let mut processor = CollectionProcessor::new(broken.clone(), store.clone(), settings());
    let report = runner.run([URL_A], &mut processor).await;

    assert!(matches!(report.items[0].outcome, ItemOutcome::Failed { .. }));
    assert_eq!(broken.navigations(), 3);
    assert_eq!(store.load().get(URL_A), Some(&prior));

    let working = MockDriver::collection_page(&selectors, 2, "Set B");
    let mut processor = CollectionProcessor::new(working, store.clone(), settings());
    let report = runner.run([URL_B], &mut processor).await;

    assert_eq!(report.succeeded(), 1);
    assert_eq!(store.load().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn batch_of_two_with_one_unreachable() {
    let selectors = Selectors::default();
    // One driver serves both URLs; the first navigation attempts all fail.
    let driver = MockDriver::collection_page(&selectors, 3, "Set").failing_navigations(3);
    let store = Arc::new(MemoryStore::new());
    let runner = BatchRunner::new(store.clone());
    let mut processor = CollectionProcessor::new(driver.clone(), store.clone(), settings());

    let report = runner.run([URL_A, URL_B], &mut processor).await;

    assert_eq!((report.failed(), report.succeeded()), (1, 1));
    let progress = store.load();
    assert!(progress.get(URL_A).is_none());
    let b = progress.get(URL_B).unwrap();
    assert_eq!((b.processed, b.total, b.success), (3, 3, true));
}
