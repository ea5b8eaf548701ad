use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{stream::BoxStream, StreamExt};

use crate::{
    converter::{ConversionError, Converter},
    domain::{AppError, BatchEvent, BatchJob, DownloadOutcome, DownloadRequest},
    utils::{normalize_url, sanitize_filename, split_batch},
};

/// Runs conversions off the event loop and reports plain-data outcomes.
///
/// Holds no per-download state: every call works on its own request, so
/// independent single downloads never share anything mutable.
#[derive(Clone)]
pub struct DownloadCoordinator {
    converter: Arc<dyn Converter>,
}

impl DownloadCoordinator {
    pub fn new(converter: Arc<dyn Converter>) -> Self {
        Self { converter }
    }

    /// Build a single-mode request from the raw form fields.
    pub fn prepare_download(
        &self,
        raw_url: &str,
        raw_name: &str,
        destination_folder: &Path,
    ) -> Result<DownloadRequest, AppError> {
        let url = normalize_url(raw_url);
        if url.is_empty() {
            return Err(AppError::InvalidInput(
                "Please enter a YouTube URL".to_string(),
            ));
        }

        let desired_name = Some(sanitize_filename(raw_name))
            .map(|name| name.trim_matches(|c| c == '.' || c == ' ').to_string())
            .filter(|name| !name.is_empty());

        Ok(DownloadRequest::new(url, destination_folder).with_name(desired_name))
    }

    /// Build a batch from multi-line text, keeping input order and duplicates.
    pub fn prepare_batch(
        &self,
        raw_text: &str,
        destination_folder: &Path,
    ) -> Result<BatchJob, AppError> {
        let urls = split_batch(raw_text);
        if urls.is_empty() {
            return Err(AppError::EmptyBatch);
        }
        Ok(BatchJob::new(urls, destination_folder))
    }

    /// Run one conversion to completion. Never fails: errors become `Failure`.
    pub async fn download(&self, request: DownloadRequest) -> DownloadOutcome {
        let url = request.url.clone();
        tracing::info!("[single] download started for {}", url);

        match self.convert_in_background(request).await {
            Ok(file_name) => {
                tracing::info!("[single] download succeeded: {}", file_name);
                DownloadOutcome::Success { file_name }
            }
            Err(e) => {
                tracing::warn!("[single] download failed for {}: {}", url, e);
                DownloadOutcome::Failure {
                    error_message: e.to_string(),
                }
            }
        }
    }

    /// Process every URL of the batch strictly one after another.
    ///
    /// Yields one `ItemFinished` per URL in input order, then a single
    /// `Completed`, whatever the individual outcomes.
    pub fn batch_stream(&self, job: BatchJob) -> BoxStream<'static, BatchEvent> {
        let total = job.len();
        let (urls, destination_folder) = job.into_parts();
        tracing::info!("[batch] downloading {} URLs", total);

        futures::stream::unfold(
            BatchRuntimeState::Running {
                coordinator: self.clone(),
                urls: urls.into_iter(),
                destination_folder,
                index: 0,
                total,
                succeeded: 0,
                failed: 0,
            },
            |state| async move {
                match state {
                    BatchRuntimeState::Running {
                        coordinator,
                        mut urls,
                        destination_folder,
                        index,
                        total,
                        mut succeeded,
                        mut failed,
                    } => match urls.next() {
                        Some(raw_url) => {
                            let index = index + 1;
                            let request =
                                DownloadRequest::new(normalize_url(&raw_url), &destination_folder);

                            let outcome = match coordinator.convert_in_background(request).await {
                                Ok(file_name) => {
                                    succeeded += 1;
                                    tracing::info!(
                                        "[batch] item {}/{} done: {}",
                                        index,
                                        total,
                                        file_name
                                    );
                                    DownloadOutcome::Success { file_name }
                                }
                                Err(e) => {
                                    failed += 1;
                                    tracing::warn!(
                                        "[batch] item {}/{} failed ({}): {}",
                                        index,
                                        total,
                                        raw_url,
                                        e
                                    );
                                    DownloadOutcome::Failure {
                                        error_message: e.to_string(),
                                    }
                                }
                            };

                            Some((
                                BatchEvent::ItemFinished {
                                    index,
                                    total,
                                    url: raw_url,
                                    outcome,
                                },
                                BatchRuntimeState::Running {
                                    coordinator,
                                    urls,
                                    destination_folder,
                                    index,
                                    total,
                                    succeeded,
                                    failed,
                                },
                            ))
                        }
                        None => {
                            tracing::info!(
                                "[batch] complete: {} succeeded, {} failed",
                                succeeded,
                                failed
                            );
                            Some((
                                BatchEvent::Completed { succeeded, failed },
                                BatchRuntimeState::Finished,
                            ))
                        }
                    },
                    BatchRuntimeState::Finished => None,
                }
            },
        )
        .boxed()
    }

    /// The blocking converter runs on tokio's blocking pool; a panic there
    /// comes back as a join error instead of tearing anything down.
    async fn convert_in_background(&self, request: DownloadRequest) -> Result<String, AppError> {
        let converter = Arc::clone(&self.converter);

        tokio::task::spawn_blocking(move || {
            converter.convert(
                &request.url,
                &request.destination_folder,
                request.desired_name.as_deref(),
            )
        })
        .await
        .map_err(|e| ConversionError::Join(e.to_string()))
        .and_then(|result| result)
        .map_err(|e| AppError::Conversion(e.to_string()))
    }
}

enum BatchRuntimeState {
    Running {
        coordinator: DownloadCoordinator,
        urls: std::vec::IntoIter<String>,
        destination_folder: PathBuf,
        index: usize,
        total: usize,
        succeeded: usize,
        failed: usize,
    },
    Finished,
}
