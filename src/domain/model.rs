use std::path::PathBuf;

/// One URL-to-file conversion, fixed at the moment the user submits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub desired_name: Option<String>,
    pub destination_folder: PathBuf,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>, destination_folder: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            desired_name: None,
            destination_folder: destination_folder.into(),
        }
    }

    pub fn with_name(mut self, desired_name: Option<String>) -> Self {
        self.desired_name = desired_name;
        self
    }
}

/// Terminal result of a single conversion. Produced exactly once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Success { file_name: String },
    Failure { error_message: String },
}

impl DownloadOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DownloadOutcome::Success { .. })
    }
}

/// Ordered list of bare URLs for one batch run. The list never changes once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    urls: Vec<String>,
    destination_folder: PathBuf,
}

impl BatchJob {
    pub fn new(urls: Vec<String>, destination_folder: impl Into<PathBuf>) -> Self {
        Self {
            urls,
            destination_folder: destination_folder.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn into_parts(self) -> (Vec<String>, PathBuf) {
        (self.urls, self.destination_folder)
    }
}

/// Snapshot emitted by the batch worker. Carries owned copies of everything
/// the status line needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// `index` is 1-based. `url` is the line as the user typed it.
    ItemFinished {
        index: usize,
        total: usize,
        url: String,
        outcome: DownloadOutcome,
    },
    Completed {
        succeeded: usize,
        failed: usize,
    },
}

impl BatchEvent {
    pub fn status_line(&self) -> String {
        match self {
            BatchEvent::ItemFinished {
                index,
                total,
                outcome: DownloadOutcome::Success { file_name },
                ..
            } => format!("Downloaded {}/{}: {}", index, total, file_name),
            BatchEvent::ItemFinished {
                index, total, url, ..
            } => format!("Failed {}/{}: {}", index, total, url),
            BatchEvent::Completed { .. } => "Batch download complete!".to_string(),
        }
    }

    pub fn severity(&self) -> StatusSeverity {
        match self {
            BatchEvent::ItemFinished { outcome, .. } if outcome.is_success() => {
                StatusSeverity::Success
            }
            BatchEvent::ItemFinished { .. } => StatusSeverity::Failure,
            BatchEvent::Completed { .. } => StatusSeverity::BatchComplete,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Idle,
    InProgress,
    Success,
    Failure,
    BatchComplete,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_status_lines() {
        let ok = BatchEvent::ItemFinished {
            index: 1,
            total: 2,
            url: "url1".to_string(),
            outcome: DownloadOutcome::Success {
                file_name: "Song A.mp3".to_string(),
            },
        };
        let failed = BatchEvent::ItemFinished {
            index: 2,
            total: 2,
            url: "url2".to_string(),
            outcome: DownloadOutcome::Failure {
                error_message: "boom".to_string(),
            },
        };

        assert_eq!(ok.status_line(), "Downloaded 1/2: Song A.mp3");
        assert_eq!(ok.severity(), StatusSeverity::Success);
        // Failures echo the raw line, not the normalized URL
        assert_eq!(failed.status_line(), "Failed 2/2: url2");
        assert_eq!(failed.severity(), StatusSeverity::Failure);
        assert_eq!(
            BatchEvent::Completed {
                succeeded: 1,
                failed: 1
            }
            .status_line(),
            "Batch download complete!"
        );
    }
}
