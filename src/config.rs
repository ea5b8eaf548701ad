use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings. Nothing here is persisted; every launch starts from
/// defaults plus environment overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ytdlp_program: String,
    pub ffmpeg_location: Option<PathBuf>,
    pub audio_format: String,
    pub audio_quality: String,
    pub debounce_delay: Duration,
    pub preview_timeout: Duration,
    pub thumbnail_base_url: String,
    pub default_output_folder: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ytdlp_program: if cfg!(target_os = "windows") {
                "yt-dlp.exe".to_string()
            } else {
                "yt-dlp".to_string()
            },
            ffmpeg_location: None,
            audio_format: "mp3".to_string(),
            audio_quality: "192K".to_string(),
            debounce_delay: Duration::from_millis(700),
            preview_timeout: Duration::from_secs(3),
            thumbnail_base_url: "https://img.youtube.com".to_string(),
            default_output_folder: default_download_dir(),
        }
    }
}

impl AppConfig {
    /// Defaults overlaid with `YT_MP3_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(program) = non_empty("YT_MP3_YTDLP") {
            config.ytdlp_program = program;
        }
        if let Some(ffmpeg) = non_empty("YT_MP3_FFMPEG") {
            config.ffmpeg_location = Some(PathBuf::from(ffmpeg));
        }
        if let Some(quality) = non_empty("YT_MP3_AUDIO_QUALITY") {
            config.audio_quality = quality;
        }
        if let Some(dir) = non_empty("YT_MP3_OUTPUT_DIR") {
            config.default_output_folder = PathBuf::from(dir);
        }
        config
    }
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}
