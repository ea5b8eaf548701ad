mod app;
mod application;
mod config;
mod converter;
mod domain;
mod preview;
mod ui;
mod utils;

use iced::{window, Size};

fn main() -> iced::Result {
    tracing_subscriber::fmt::init();

    iced::application(app::DownloadApp::default, app::update, app::view)
        .title("YT to MP3 Converter")
        .window(window::Settings {
            size: Size::new(500.0, 620.0),
            resizable: false,
            ..Default::default()
        })
        .run()
}
