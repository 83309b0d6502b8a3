// Common data models for the download core

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality tiers a caller can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityTier {
    P144,
    P240,
    P360,
    P480,
    P720,
    P1080,
    P1440,
    P2160,
    Best,
}

impl QualityTier {
    /// Target resolution ceiling in pixels, `None` for `Best`.
    pub fn height(&self) -> Option<u32> {
        match self {
            Self::P144 => Some(144),
            Self::P240 => Some(240),
            Self::P360 => Some(360),
            Self::P480 => Some(480),
            Self::P720 => Some(720),
            Self::P1080 => Some(1080),
            Self::P1440 => Some(1440),
            Self::P2160 => Some(2160),
            Self::Best => None,
        }
    }

    /// Parse a UI label like "720p" or "best".
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "144p" => Some(Self::P144),
            "240p" => Some(Self::P240),
            "360p" => Some(Self::P360),
            "480p" => Some(Self::P480),
            "720p" => Some(Self::P720),
            "1080p" => Some(Self::P1080),
            "1440p" => Some(Self::P1440),
            "2160p" => Some(Self::P2160),
            "best" => Some(Self::Best),
            _ => None,
        }
    }
}

/// Output container formats. Mp3/M4a mean audio-only extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainerFormat {
    Mp4,
    Webm,
    Mp3,
    M4a,
}

impl ContainerFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            Self::Mp4 => "mp4",
            Self::Webm => "webm",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Mp3 | Self::M4a)
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "mp4" => Some(Self::Mp4),
            "webm" => Some(Self::Webm),
            "mp3" => Some(Self::Mp3),
            "m4a" => Some(Self::M4a),
            _ => None,
        }
    }
}

/// Whether a reference points at a standalone video or one inside a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefKind {
    Single,
    CollectionEntry,
}

/// One playable item, immutable once classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaReference {
    /// 11-character video id when sourced from a canonical URL
    pub id: String,
    pub source_url: String,
    pub kind: RefKind,
}

/// An ordered group of items (playlist) referenced by one URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionReference {
    pub id: String,
    pub title: String,
    /// May be an estimate when only a bounded preview was fetched
    pub item_count: usize,
    pub preview_entries: Vec<MediaReference>,
}

/// Normalized descriptive record for one item, derived from a single
/// engine response and never mutated after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaMetadata {
    pub title: String,
    pub uploader_name: String,
    pub duration_seconds: Option<u64>,
    pub view_count: Option<u64>,
    /// "{height}p ({ext})" labels, deduplicated by height, at most 10
    pub available_qualities: Vec<String>,
    pub collection_title: Option<String>,
    pub collection_count: Option<usize>,
}

/// One download invocation. Constructed fresh per request via the builder;
/// immutable afterwards.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub url: String,
    pub output_dir: PathBuf,
    pub quality: QualityTier,
    pub container: ContainerFormat,
    pub is_collection: bool,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: dirs::download_dir().unwrap_or_else(|| PathBuf::from(".")),
            quality: QualityTier::P720,
            container: ContainerFormat::Mp4,
            is_collection: false,
        }
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    pub fn container(mut self, container: ContainerFormat) -> Self {
        self.container = container;
        self
    }

    pub fn collection(mut self, is_collection: bool) -> Self {
        self.is_collection = is_collection;
        self
    }

    /// Audio-only extraction is implied by an audio container.
    pub fn audio_only(&self) -> bool {
        self.container.is_audio()
    }
}

/// What a completed download actually produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOutcome {
    /// False when the toolchain was unavailable and the audio-only request
    /// fell back to the pre-transcode container
    pub transcoded: bool,
    pub message: String,
}
