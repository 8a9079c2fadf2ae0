use std::fmt::Display;
use std::future::Future;

use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use iconbatch_state::ProgressStore;

/// What a processor reports back for one work item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemResult {
    /// Sub-items completed, counting those done in earlier runs.
    pub processed: u64,
    /// Sub-items discovered for the item.
    pub total: u64,
    /// Whether every sub-item attempted in this run went through.
    pub success: bool,
}

/// Processes a single work item, starting at `resume_offset`.
pub trait ItemProcessor: Send {
    type Error: Display + Send;

    fn process(
        &mut self,
        key: &str,
        resume_offset: u64,
    ) -> impl Future<Output = Result<ItemResult, Self::Error>> + Send;
}

/// How one work item ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The processor returned; progress was persisted.
    Finished(ItemResult),
    /// The processor failed; stored progress was left as it was.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub key: String,
    pub resume_offset: u64,
    pub outcome: ItemOutcome,
}

/// Per-item outcomes of one batch run, in input order.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    /// Items that finished with `success = true`.
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Finished(r) if r.success))
    }

    /// Items that finished but had sub-item failures.
    pub fn incomplete(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Finished(r) if !r.success))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|i| pred(&i.outcome)).count()
    }
}

/// Runs work items in order, resuming each from its stored progress.
///
/// A failing item never stops the batch.
pub struct BatchRunner<S> {
    store: S,
}

impl<S: ProgressStore> BatchRunner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn run<I, K, P>(&self, keys: I, processor: &mut P) -> BatchReport
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
        P: ItemProcessor,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let run_id = Uuid::new_v4();
        let span = info_span!("batch", %run_id);

        async {
            info!(items = keys.len(), "Starting batch");

            let mut items = Vec::with_capacity(keys.len());
            for (index, key) in keys.into_iter().enumerate() {
                items.push(self.run_item(index, key, processor).await);
            }

            let report = BatchReport { run_id, items };
            info!(
                succeeded = report.succeeded(),
                incomplete = report.incomplete(),
                failed = report.failed(),
                "Batch finished"
            );
            report
        }
        .instrument(span)
        .await
    }

    async fn run_item<P: ItemProcessor>(
        &self,
        index: usize,
        key: String,
        processor: &mut P,
    ) -> ItemReport {
        let span = info_span!("item", index, key = %key);

        async move {
            let resume_offset = self.store.load().resume_offset(&key);
            info!(resume_offset, "Processing item");

            let outcome = match processor.process(&key, resume_offset).await {
                Ok(result) => {
                    if result.processed > result.total {
                        warn!(
                            processed = result.processed,
                            total = result.total,
                            "Processor reported more processed than total"
                        );
                    }
                    self.store
                        .update(&key, result.total, result.processed, result.success);
                    info!(
                        processed = result.processed,
                        total = result.total,
                        success = result.success,
                        "Item finished"
                    );
                    ItemOutcome::Finished(result)
                }
                Err(e) => {
                    error!(error = %e, "Item failed, continuing with next");
                    ItemOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };

            ItemReport {
                key,
                resume_offset,
                outcome,
            }
        }
        .instrument(span)
        .await
    }
}
