mod ytdlp;

use std::path::Path;

use thiserror::Error;

pub use ytdlp::YtDlpConverter;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Failed(String),

    #[error("Invalid converter report: {0}")]
    InvalidReport(String),

    #[error("Converter did not report an output file")]
    NoOutput,

    #[error("Background task ended unexpectedly: {0}")]
    Join(String),
}

pub type Result<T> = std::result::Result<T, ConversionError>;

/// Turns a source URL into a local compressed-audio file and returns its file name.
///
/// Implementations block for the whole download and transcode, so callers
/// must run them off the event loop.
pub trait Converter: Send + Sync {
    fn convert(
        &self,
        source_url: &str,
        destination_folder: &Path,
        desired_name: Option<&str>,
    ) -> Result<String>;
}
