use std::fmt;

use bytes::Bytes;
use image::imageops::FilterType;
use reqwest::Client;
use thiserror::Error;

use crate::config::AppConfig;

pub const PREVIEW_WIDTH: u32 = 250;
pub const PREVIEW_HEIGHT: u32 = 150;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Thumbnail server returned status {0}")]
    Status(u16),

    #[error("Failed to decode thumbnail: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, PreviewError>;

/// Decoded RGBA thumbnail ready to hand to the view.
#[derive(Clone, PartialEq, Eq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Bytes,
    pub is_placeholder: bool,
}

impl PreviewImage {
    /// Solid black frame shown when there is nothing to preview.
    pub fn placeholder() -> Self {
        let pixels = [0u8, 0, 0, 255].repeat((PREVIEW_WIDTH * PREVIEW_HEIGHT) as usize);
        Self {
            width: PREVIEW_WIDTH,
            height: PREVIEW_HEIGHT,
            pixels: Bytes::from(pixels),
            is_placeholder: true,
        }
    }

    fn decode(data: &[u8]) -> Result<Self> {
        let decoded =
            image::load_from_memory(data).map_err(|e| PreviewError::Decode(e.to_string()))?;
        let rgba = decoded
            .resize_exact(PREVIEW_WIDTH, PREVIEW_HEIGHT, FilterType::Triangle)
            .to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            width,
            height,
            pixels: Bytes::from(rgba.into_raw()),
            is_placeholder: false,
        })
    }
}

impl fmt::Debug for PreviewImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("is_placeholder", &self.is_placeholder)
            .finish()
    }
}

#[derive(Clone)]
pub struct PreviewClient {
    client: Client,
    base_url: String,
}

impl PreviewClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.preview_timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("[preview] falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.thumbnail_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the raw `hqdefault` thumbnail for a video id.
    pub async fn fetch_preview_image(&self, video_id: &str) -> Result<Bytes> {
        let url = format!("{}/vi/{}/hqdefault.jpg", self.base_url, video_id);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::Status(status.as_u16()));
        }

        Ok(response.bytes().await?)
    }

    /// Best-effort preview: any failure, or no id at all, yields the placeholder.
    pub async fn load(&self, video_id: Option<String>) -> PreviewImage {
        let Some(video_id) = video_id else {
            tracing::debug!("[preview] no video id, showing placeholder");
            return PreviewImage::placeholder();
        };

        let result = match self.fetch_preview_image(&video_id).await {
            Ok(data) => PreviewImage::decode(&data),
            Err(e) => Err(e),
        };

        match result {
            Ok(image) => {
                tracing::debug!("[preview] thumbnail loaded for {}", video_id);
                image
            }
            Err(e) => {
                tracing::debug!("[preview] {} -> placeholder: {}", video_id, e);
                PreviewImage::placeholder()
            }
        }
    }
}
