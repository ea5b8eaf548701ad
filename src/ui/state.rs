use std::path::PathBuf;

use crate::domain::{BatchEvent, DownloadOutcome, StatusSeverity};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub message: String,
    pub severity: StatusSeverity,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: "Idle".to_string(),
            severity: StatusSeverity::Idle,
        }
    }
}

/// Presentation state. Owned by the event loop and only ever changed from
/// `update`; background work reaches it through messages.
#[derive(Debug, Clone)]
pub struct UiState {
    pub status: StatusLine,
    pub download_enabled: bool,
    pub batch_toggle_enabled: bool,
    pub batch_mode: bool,
    pub output_folder: PathBuf,
}

impl UiState {
    pub fn new(output_folder: PathBuf) -> Self {
        Self {
            status: StatusLine::default(),
            download_enabled: true,
            batch_toggle_enabled: true,
            batch_mode: false,
            output_folder,
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>, severity: StatusSeverity) {
        let message = message.into();
        tracing::info!("[status] {}", message);
        self.status = StatusLine { message, severity };
    }

    pub fn is_batch_running(&self) -> bool {
        !self.download_enabled && !self.batch_toggle_enabled
    }

    pub fn toggle_batch_mode(&mut self) {
        if self.batch_toggle_enabled {
            self.batch_mode = !self.batch_mode;
            tracing::info!(
                "[ui] batch mode {}",
                if self.batch_mode { "on" } else { "off" }
            );
        }
    }

    pub fn select_folder(&mut self, folder: PathBuf) {
        tracing::info!("[ui] output folder set to {}", folder.display());
        self.output_folder = folder;
    }

    pub fn begin_single(&mut self) {
        self.set_status("Downloading...", StatusSeverity::InProgress);
    }

    pub fn finish_single(&mut self, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Success { .. } => {
                self.set_status("Download complete!", StatusSeverity::Success)
            }
            DownloadOutcome::Failure { .. } => {
                self.set_status("Failed to download", StatusSeverity::Failure)
            }
        }
    }

    /// Lock both triggers for the duration of the batch.
    pub fn begin_batch(&mut self) {
        self.download_enabled = false;
        self.batch_toggle_enabled = false;
        self.set_status("Starting batch download...", StatusSeverity::InProgress);
    }

    pub fn apply_batch_event(&mut self, event: &BatchEvent) {
        self.set_status(event.status_line(), event.severity());
        if let BatchEvent::Completed { succeeded, failed } = event {
            tracing::info!("[batch] {} downloaded, {} failed", succeeded, failed);
            self.download_enabled = true;
            self.batch_toggle_enabled = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> UiState {
        UiState::new(PathBuf::from("/music"))
    }

    #[test]
    fn test_initial_state() {
        let state = state();
        assert_eq!(state.status, StatusLine::default());
        assert_eq!(state.status.message, "Idle");
        assert!(state.download_enabled && state.batch_toggle_enabled);
        assert!(!state.batch_mode);
    }

    #[test]
    fn test_single_lifecycle() {
        let mut state = state();
        state.begin_single();
        assert_eq!(state.status.severity, StatusSeverity::InProgress);
        assert_eq!(state.status.message, "Downloading...");

        state.finish_single(&DownloadOutcome::Failure {
            error_message: "nope".to_string(),
        });
        assert_eq!(state.status.message, "Failed to download");
        assert_eq!(state.status.severity, StatusSeverity::Failure);

        state.finish_single(&DownloadOutcome::Success {
            file_name: "a.mp3".to_string(),
        });
        assert_eq!(state.status.message, "Download complete!");
        assert!(state.download_enabled);
    }

    #[test]
    fn test_batch_locks_and_restores_controls() {
        let mut state = state();
        state.toggle_batch_mode();
        state.begin_batch();
        assert!(state.is_batch_running());

        // Toggling is ignored while the batch runs
        state.toggle_batch_mode();
        assert!(state.batch_mode);

        state.apply_batch_event(&BatchEvent::ItemFinished {
            index: 1,
            total: 2,
            url: "url1".to_string(),
            outcome: DownloadOutcome::Success {
                file_name: "Song A.mp3".to_string(),
            },
        });
        assert_eq!(state.status.message, "Downloaded 1/2: Song A.mp3");
        assert!(state.is_batch_running());

        state.apply_batch_event(&BatchEvent::ItemFinished {
            index: 2,
            total: 2,
            url: "url2".to_string(),
            outcome: DownloadOutcome::Failure {
                error_message: "gone".to_string(),
            },
        });
        assert_eq!(state.status.message, "Failed 2/2: url2");
        assert_eq!(state.status.severity, StatusSeverity::Failure);

        state.apply_batch_event(&BatchEvent::Completed {
            succeeded: 1,
            failed: 1,
        });
        assert_eq!(state.status.message, "Batch download complete!");
        assert_eq!(state.status.severity, StatusSeverity::BatchComplete);
        assert!(state.download_enabled && state.batch_toggle_enabled);
        assert!(!state.is_batch_running());
    }

    #[test]
    fn test_select_folder() {
        let mut state = state();
        state.select_folder(PathBuf::from("/elsewhere"));
        assert_eq!(state.output_folder, PathBuf::from("/elsewhere"));
    }
}
