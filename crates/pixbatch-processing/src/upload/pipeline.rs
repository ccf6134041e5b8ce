//! Bounded-concurrency batch pipeline: read -> transform -> key -> upload.
//!
//! Each item moves `Pending -> Transforming -> Uploading -> Succeeded | Failed`
//! independently of its siblings. At most `concurrency_limit` items are in
//! flight at once; results land in a slot per input index, so the summary is in
//! input order whatever order the items finish in.

use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use pixbatch_core::{
    BatchSummary, FailureKind, ItemState, StorageKey, UploadItem, UploadOutcome, UploadResult,
};
use pixbatch_storage::{build_key, validate_partition};

use super::{failure_from, PipelineError, Uploader};
use crate::image::{ImageTransformer, TransformError};
use crate::source::ByteSource;

pub struct BatchPipeline {
    source: Arc<dyn ByteSource>,
    transformer: ImageTransformer,
    uploader: Uploader,
    cancel: Option<CancellationToken>,
}

impl BatchPipeline {
    pub fn new(
        source: Arc<dyn ByteSource>,
        transformer: ImageTransformer,
        uploader: Uploader,
    ) -> Self {
        Self {
            source,
            transformer,
            uploader,
            cancel: None,
        }
    }

    /// Items that have not reached the store when `token` fires fail as `Cancelled`.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Run every item to a terminal state.
    ///
    /// Only an invalid `partition` aborts the batch. A `concurrency_limit` of 0
    /// is treated as 1.
    #[tracing::instrument(skip(self, items), fields(items = items.len()))]
    pub async fn run(
        &self,
        items: &[UploadItem],
        partition: &str,
        concurrency_limit: usize,
    ) -> Result<BatchSummary, PipelineError> {
        validate_partition(partition).map_err(|e| PipelineError::InvalidInput(e.to_string()))?;

        let limit = concurrency_limit.max(1);
        let start = std::time::Instant::now();

        let mut slots: Vec<Option<UploadResult>> = vec![None; items.len()];
        let mut completed = stream::iter(items.iter().enumerate())
            .map(|(index, item)| async move { (index, self.process_item(item, partition).await) })
            .buffer_unordered(limit);

        while let Some((index, result)) = completed.next().await {
            slots[index] = Some(result);
        }

        let results = slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| PipelineError::Internal("item finished without a result".to_string()))?;

        let summary = BatchSummary::from_results(results);

        tracing::info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            concurrency = limit,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Batch finished"
        );

        Ok(summary)
    }

    async fn process_item(&self, item: &UploadItem, partition: &str) -> UploadResult {
        let name = item.logical_name();
        let key = build_key(partition, name);
        // Failure records fall back to the logical name when no key can be built.
        let record_key = key
            .as_ref()
            .ok()
            .cloned()
            .unwrap_or_else(|| StorageKey::from(name));

        let finish = |outcome: UploadOutcome| {
            tracing::debug!(item = %name, state = %outcome.state(), "Item settled");
            UploadResult {
                item: item.clone(),
                key: record_key.clone(),
                outcome,
            }
        };

        if self.is_cancelled() {
            return finish(cancelled());
        }

        tracing::debug!(item = %name, state = %ItemState::Transforming, "Item started");

        let data = match self.source.read_bytes(item.source()).await {
            Ok(data) => data,
            Err(e) => return finish(failure_from(&e, name)),
        };

        let transformer = self.transformer;
        let directive = item.directive().clone();
        let transformed =
            tokio::task::spawn_blocking(move || transformer.transform(&data, &directive)).await;

        let output = match transformed {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return finish(failure_from(&e, name)),
            Err(join_error) => {
                let e = TransformError::Encode(format!("transform task failed: {}", join_error));
                return finish(failure_from(&e, name));
            }
        };

        let key = match key {
            Ok(key) => key,
            Err(e) => return finish(failure_from(&e, name)),
        };

        if self.is_cancelled() {
            return finish(cancelled());
        }

        tracing::debug!(
            item = %name,
            key = %key,
            state = %ItemState::Uploading,
            size_bytes = output.data.len(),
            "Item transformed"
        );

        let content_type = output.content_type();
        let outcome = self.uploader.upload(&key, output.data, content_type).await;
        finish(outcome)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|token| token.is_cancelled())
    }
}

fn cancelled() -> UploadOutcome {
    UploadOutcome::failure(FailureKind::Cancelled, "batch cancelled before upload")
}
