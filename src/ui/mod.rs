mod state;

pub use state::UiState;

use iced::{
    widget::{button, column, image, row, text, text_editor, text_input, Space},
    Alignment, Color, Element, Length,
};

use crate::domain::StatusSeverity;
use crate::preview::{PreviewImage, PREVIEW_HEIGHT, PREVIEW_WIDTH};

/// Main view state
pub struct DownloadView {
    pub state: UiState,
    pub youtube_url: String,
    pub output_name: String,
    pub batch_text: text_editor::Content,
    preview: image::Handle,
    preview_is_placeholder: bool,
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    UrlChanged(String),
    NameChanged(String),
    BatchEdited(text_editor::Action),
    ToggleBatchMode,
    SelectFolderPressed,
    DownloadPressed,
}

impl DownloadView {
    pub fn new(state: UiState) -> Self {
        Self {
            state,
            youtube_url: String::new(),
            output_name: String::new(),
            batch_text: text_editor::Content::new(),
            preview: preview_handle(&PreviewImage::placeholder()),
            preview_is_placeholder: true,
        }
    }

    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::UrlChanged(url) => {
                self.youtube_url = url;
            }
            DownloadMessage::NameChanged(name) => {
                self.output_name = name;
            }
            DownloadMessage::BatchEdited(action) => {
                self.batch_text.perform(action);
            }
            DownloadMessage::ToggleBatchMode => {
                self.state.toggle_batch_mode();
            }
            DownloadMessage::SelectFolderPressed | DownloadMessage::DownloadPressed => {
                // Will be handled by the app
            }
        }
    }

    pub fn set_preview(&mut self, preview: &PreviewImage) {
        // The placeholder never changes, keep the handle already uploaded
        if preview.is_placeholder && self.preview_is_placeholder {
            return;
        }
        self.preview = preview_handle(preview);
        self.preview_is_placeholder = preview.is_placeholder;
    }

    pub fn shows_placeholder(&self) -> bool {
        self.preview_is_placeholder
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let inputs: Element<'_, DownloadMessage> = if self.state.batch_mode {
            column![
                text("Batch URLs (one per line)").size(16),
                text_editor(&self.batch_text)
                    .on_action(DownloadMessage::BatchEdited)
                    .height(Length::Fixed(244.0)),
            ]
            .spacing(5)
            .align_x(Alignment::Center)
            .into()
        } else {
            column![
                text("YouTube URL").size(16),
                text_input("Paste a video URL...", &self.youtube_url)
                    .on_input(DownloadMessage::UrlChanged)
                    .padding(10),
                text("MP3 File Name (optional)").size(16),
                text_input("Output file name", &self.output_name)
                    .on_input(DownloadMessage::NameChanged)
                    .padding(10),
                image(self.preview.clone())
                    .width(Length::Fixed(PREVIEW_WIDTH as f32))
                    .height(Length::Fixed(PREVIEW_HEIGHT as f32)),
            ]
            .spacing(5)
            .align_x(Alignment::Center)
            .into()
        };

        let triggers = row![
            button("Batch Mode")
                .on_press_maybe(
                    self.state
                        .batch_toggle_enabled
                        .then_some(DownloadMessage::ToggleBatchMode)
                )
                .padding([10, 20]),
            button("Download MP3")
                .on_press_maybe(
                    self.state
                        .download_enabled
                        .then_some(DownloadMessage::DownloadPressed)
                )
                .padding([10, 20]),
        ]
        .spacing(22);

        column![
            text("YT to MP3 Converter").size(32),
            Space::new().height(Length::Fixed(10.0)),
            inputs,
            button("Select Output Folder")
                .on_press(DownloadMessage::SelectFolderPressed)
                .padding([8, 16]),
            text(format!(
                "Output Folder: {}",
                self.state.output_folder.display()
            ))
            .size(13),
            Space::new().height(Length::Fixed(10.0)),
            triggers,
            text(&self.state.status.message)
                .size(14)
                .color(severity_color(self.state.status.severity)),
        ]
        .padding(20)
        .spacing(10)
        .align_x(Alignment::Center)
        .into()
    }
}

fn preview_handle(preview: &PreviewImage) -> image::Handle {
    image::Handle::from_rgba(preview.width, preview.height, preview.pixels.clone())
}

pub fn severity_color(severity: StatusSeverity) -> Color {
    match severity {
        StatusSeverity::Idle => Color::from_rgb8(0x80, 0x80, 0x80),
        StatusSeverity::InProgress => Color::from_rgb8(0xFF, 0xA5, 0x00),
        StatusSeverity::Success => Color::from_rgb8(0x00, 0x80, 0x00),
        StatusSeverity::Failure => Color::from_rgb8(0xFF, 0x00, 0x00),
        StatusSeverity::BatchComplete => Color::from_rgb8(0x80, 0x00, 0x80),
    }
}
