use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use iced::Task;
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};

use crate::application::{DebounceTicket, Debouncer, DownloadCoordinator};
use crate::config::AppConfig;
use crate::converter::YtDlpConverter;
use crate::domain::{BatchEvent, DownloadOutcome};
use crate::preview::{PreviewClient, PreviewImage};
use crate::ui::{DownloadMessage, DownloadView, UiState};
use crate::utils::extract_video_id;

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
    preview_client: PreviewClient,
    url_debouncer: Debouncer,
    /// Bumped whenever the preview is reset or a new lookup starts
    preview_generation: u64,
}

impl Default for DownloadApp {
    fn default() -> Self {
        Self::new(AppConfig::from_env())
    }
}

impl DownloadApp {
    pub fn new(config: AppConfig) -> Self {
        let converter = Arc::new(YtDlpConverter::new(&config));
        tracing::info!(
            "[app] using {} with output folder {}",
            config.ytdlp_program,
            config.default_output_folder.display()
        );

        Self {
            view: DownloadView::new(UiState::new(config.default_output_folder.clone())),
            coordinator: DownloadCoordinator::new(converter),
            preview_client: PreviewClient::new(&config),
            url_debouncer: Debouncer::new(config.debounce_delay),
            preview_generation: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    /// The URL field has been quiet for the debounce interval
    UrlSettled(DebounceTicket),
    /// Thumbnail for the lookup with the given generation
    PreviewLoaded(u64, PreviewImage),
    FolderSelected(Option<PathBuf>),
    /// Terminal result of a single-mode download
    DownloadFinished(DownloadOutcome),
    Batch(BatchEvent),
    NoticeDismissed,
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::UrlChanged(_) => return schedule_url_check(app),
                DownloadMessage::SelectFolderPressed => {
                    return Task::perform(
                        async {
                            AsyncFileDialog::new()
                                .pick_folder()
                                .await
                                .map(|handle| handle.path().to_path_buf())
                        },
                        Message::FolderSelected,
                    );
                }
                DownloadMessage::DownloadPressed => {
                    return if app.view.state.batch_mode {
                        start_batch(app)
                    } else {
                        start_download(app)
                    };
                }
                _ => {}
            }
        }
        Message::UrlSettled(ticket) => {
            if app.url_debouncer.fire(ticket) {
                // Validate what the field holds now, not what it held when scheduled
                let url = app.view.youtube_url.trim().to_string();
                if url.starts_with("http") {
                    return load_preview(app, &url);
                } else if url.is_empty() {
                    app.preview_generation += 1;
                    app.view.set_preview(&PreviewImage::placeholder());
                }
            }
        }
        Message::PreviewLoaded(generation, preview) => {
            // A newer lookup or a reset has superseded this one
            if generation == app.preview_generation {
                app.view.set_preview(&preview);
            } else {
                tracing::debug!("[preview] dropping stale result #{}", generation);
            }
        }
        Message::FolderSelected(folder) => {
            // Cancelled dialog keeps the previous folder
            if let Some(folder) = folder {
                app.view.state.select_folder(folder);
            }
        }
        Message::DownloadFinished(outcome) => {
            app.view.state.finish_single(&outcome);
            if let DownloadOutcome::Failure { error_message } = outcome {
                return show_error(error_message);
            }
        }
        Message::Batch(event) => {
            app.view.state.apply_batch_event(&event);
        }
        Message::NoticeDismissed => {}
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    app.view.view().map(Message::UiMessage)
}

fn schedule_url_check(app: &mut DownloadApp) -> Task<Message> {
    let (task, handle) = Task::future(app.url_debouncer.schedule())
        .map(Message::UrlSettled)
        .abortable();
    app.url_debouncer.track(handle);
    task
}

fn load_preview(app: &mut DownloadApp, url: &str) -> Task<Message> {
    app.preview_generation += 1;
    let generation = app.preview_generation;
    let client = app.preview_client.clone();
    let video_id = extract_video_id(url);
    Task::perform(
        async move { client.load(video_id).await },
        move |preview| Message::PreviewLoaded(generation, preview),
    )
}

/// Single mode: validate synchronously, then hand the request to the blocking pool.
fn start_download(app: &mut DownloadApp) -> Task<Message> {
    let request = match app.coordinator.prepare_download(
        &app.view.youtube_url,
        &app.view.output_name,
        &app.view.state.output_folder,
    ) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!("[single] rejected: {}", e);
            return show_error(e.to_string());
        }
    };

    app.view.state.begin_single();
    let preview = load_preview(app, &request.url);

    let coordinator = app.coordinator.clone();
    let download = Task::perform(
        async move { coordinator.download(request).await },
        Message::DownloadFinished,
    );

    Task::batch([preview, download])
}

/// Batch mode: lock the triggers and stream one status per URL.
fn start_batch(app: &mut DownloadApp) -> Task<Message> {
    if app.view.state.is_batch_running() {
        return Task::none();
    }

    let raw_text = app.view.batch_text.text();
    let job = match app
        .coordinator
        .prepare_batch(&raw_text, &app.view.state.output_folder)
    {
        Ok(job) => job,
        Err(e) => {
            tracing::warn!("[batch] rejected: {}", e);
            return show_error(e.to_string());
        }
    };

    app.view.state.begin_batch();
    Task::stream(app.coordinator.batch_stream(job).map(Message::Batch))
}

fn show_error(description: String) -> Task<Message> {
    Task::perform(
        async move {
            AsyncMessageDialog::new()
                .set_level(MessageLevel::Error)
                .set_title("Error")
                .set_description(description)
                .set_buttons(MessageButtons::Ok)
                .show()
                .await;
        },
        |_| Message::NoticeDismissed,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::StatusSeverity;
    use bytes::Bytes;
    use iced::widget::text_editor;

    fn app() -> DownloadApp {
        DownloadApp::new(AppConfig {
            default_output_folder: PathBuf::from("/music"),
            ..AppConfig::default()
        })
    }

    fn thumbnail() -> PreviewImage {
        PreviewImage {
            width: 1,
            height: 1,
            pixels: Bytes::from_static(&[10, 20, 30, 255]),
            is_placeholder: false,
        }
    }

    fn send(app: &mut DownloadApp, message: DownloadMessage) {
        let _ = update(app, Message::UiMessage(message));
    }

    /// Let the latest countdown run out and deliver its ticket.
    async fn settle(app: &mut DownloadApp) {
        let ticket = app.url_debouncer.schedule().await;
        let _ = update(app, Message::UrlSettled(ticket));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settled_url_uses_current_field_value() {
        let mut app = app();
        let _ = update(&mut app, Message::PreviewLoaded(0, thumbnail()));
        assert!(!app.view.shows_placeholder());

        send(&mut app, DownloadMessage::UrlChanged("https://youtu.be/abc".to_string()));
        send(&mut app, DownloadMessage::UrlChanged("https://youtu.be/abc?t=1".to_string()));
        send(&mut app, DownloadMessage::UrlChanged(String::new()));
        let generation = app.preview_generation;

        settle(&mut app).await;

        // Field is empty when the countdown fires, so no lookup and a reset
        assert!(app.view.shows_placeholder());
        assert!(app.preview_generation > generation);

        // A lookup that was already running must not undo the reset
        let _ = update(&mut app, Message::PreviewLoaded(generation, thumbnail()));
        assert!(app.view.shows_placeholder());
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_latest_lookup_is_shown() {
        let mut app = app();

        send(&mut app, DownloadMessage::UrlChanged("https://youtu.be/old".to_string()));
        settle(&mut app).await;
        let old_lookup = app.preview_generation;

        send(&mut app, DownloadMessage::UrlChanged("https://youtu.be/new".to_string()));
        settle(&mut app).await;
        let new_lookup = app.preview_generation;
        assert_ne!(old_lookup, new_lookup);

        let _ = update(&mut app, Message::PreviewLoaded(old_lookup, thumbnail()));
        assert!(app.view.shows_placeholder());

        let _ = update(&mut app, Message::PreviewLoaded(new_lookup, thumbnail()));
        assert!(!app.view.shows_placeholder());
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_countdown_is_ignored() {
        let mut app = app();
        app.view.youtube_url = "https://youtu.be/abc".to_string();
        let stale = app.url_debouncer.schedule().await;

        send(&mut app, DownloadMessage::UrlChanged("https://youtu.be/abcd".to_string()));
        let _ = update(&mut app, Message::UrlSettled(stale));

        assert_eq!(app.preview_generation, 0);
    }

    #[test]
    fn test_download_pressed_in_single_mode() {
        let mut app = app();
        send(&mut app, DownloadMessage::UrlChanged("youtube.com/watch?v=abc".to_string()));
        send(&mut app, DownloadMessage::DownloadPressed);

        assert_eq!(app.view.state.status.message, "Downloading...");
        assert_eq!(app.view.state.status.severity, StatusSeverity::InProgress);
        // Single downloads never lock the triggers
        assert!(!app.view.state.is_batch_running());
    }

    #[test]
    fn test_blank_single_url_starts_nothing() {
        let mut app = app();
        send(&mut app, DownloadMessage::UrlChanged("   ".to_string()));
        send(&mut app, DownloadMessage::DownloadPressed);

        assert_eq!(app.view.state.status.message, "Idle");
        assert_eq!(app.preview_generation, 0);
    }

    #[test]
    fn test_download_pressed_in_batch_mode() {
        let mut app = app();
        send(&mut app, DownloadMessage::UrlChanged("https://youtu.be/single".to_string()));
        send(&mut app, DownloadMessage::ToggleBatchMode);
        app.view.batch_text = text_editor::Content::with_text("url1\n\nurl2\n");

        send(&mut app, DownloadMessage::DownloadPressed);

        assert_eq!(app.view.state.status.message, "Starting batch download...");
        assert!(app.view.state.is_batch_running());
        // Batch mode does not touch the single-mode preview
        assert_eq!(app.preview_generation, 0);
    }

    #[test]
    fn test_second_batch_is_refused_while_running() {
        let mut app = app();
        send(&mut app, DownloadMessage::ToggleBatchMode);
        app.view.batch_text = text_editor::Content::with_text("url1 url2");
        send(&mut app, DownloadMessage::DownloadPressed);

        let _ = update(
            &mut app,
            Message::Batch(BatchEvent::ItemFinished {
                index: 1,
                total: 2,
                url: "url1".to_string(),
                outcome: DownloadOutcome::Success {
                    file_name: "Song A.mp3".to_string(),
                },
            }),
        );
        let before = app.view.state.status.clone();

        app.view.batch_text = text_editor::Content::with_text("url3");
        send(&mut app, DownloadMessage::DownloadPressed);
        send(&mut app, DownloadMessage::ToggleBatchMode);

        assert_eq!(app.view.state.status, before);
        assert!(app.view.state.is_batch_running());
        assert!(app.view.state.batch_mode);

        let _ = update(
            &mut app,
            Message::Batch(BatchEvent::Completed {
                succeeded: 1,
                failed: 0,
            }),
        );
        assert_eq!(app.view.state.status.message, "Batch download complete!");
        assert!(!app.view.state.is_batch_running());
    }

    #[test]
    fn test_empty_batch_starts_nothing() {
        let mut app = app();
        send(&mut app, DownloadMessage::ToggleBatchMode);
        app.view.batch_text = text_editor::Content::with_text(" \n\n ");
        send(&mut app, DownloadMessage::DownloadPressed);

        assert_eq!(app.view.state.status.message, "Idle");
        assert!(!app.view.state.is_batch_running());
    }

    #[test]
    fn test_folder_selection() {
        let mut app = app();
        let _ = update(&mut app, Message::FolderSelected(None));
        assert_eq!(app.view.state.output_folder, PathBuf::from("/music"));

        let _ = update(
            &mut app,
            Message::FolderSelected(Some(PathBuf::from("/elsewhere"))),
        );
        assert_eq!(app.view.state.output_folder, PathBuf::from("/elsewhere"));
    }

    #[test]
    fn test_single_failure_updates_status() {
        let mut app = app();
        let _ = update(
            &mut app,
            Message::DownloadFinished(DownloadOutcome::Failure {
                error_message: "Video unavailable".to_string(),
            }),
        );
        assert_eq!(app.view.state.status.message, "Failed to download");
        assert_eq!(app.view.state.status.severity, StatusSeverity::Failure);
    }
}
