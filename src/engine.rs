// MediaEngine trait and engine-side records
//
// The actual site resolution (scraping, stream selection, file writing) is
// delegated to an external engine behind this trait, which keeps the core
// testable with a scripted mock and open to backend substitution.

use async_trait::async_trait;
use serde::Deserialize;

use crate::errors::DownloadError;
use crate::progress::TransferUpdate;

/// Options for a metadata extraction call.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Reject any playlist context in the URL
    pub single_item: bool,
    /// 1-based playlist bounds, inclusive
    pub playlist_start: u32,
    pub playlist_end: Option<u32>,
    /// Listing-only extraction: entries carry no format data
    pub flat: bool,
    pub quiet: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            single_item: true,
            playlist_start: 1,
            playlist_end: None,
            flat: false,
            quiet: true,
        }
    }
}

impl ExtractOptions {
    pub fn single() -> Self {
        Self::default()
    }

    /// Bounded playlist preview (first `limit` entries, full format data).
    pub fn preview(limit: u32) -> Self {
        Self {
            single_item: false,
            playlist_end: Some(limit),
            ..Self::default()
        }
    }

    /// Flat playlist listing bounded to `limit` entries.
    pub fn listing(limit: u32) -> Self {
        Self {
            single_item: false,
            playlist_end: Some(limit),
            flat: true,
            ..Self::default()
        }
    }
}

/// Post-processing directive: transcode the downloaded audio track.
#[derive(Debug, Clone)]
pub struct AudioTranscode {
    /// Target codec, e.g. "mp3" or "m4a"
    pub codec: String,
    /// VBR quality, kbps equivalent
    pub quality_kbps: u32,
}

/// Options for a download call.
#[derive(Debug, Clone)]
pub struct EngineDownloadOptions {
    /// Output path template; title/extension placeholders are resolved by
    /// the engine at write time
    pub output_template: String,
    /// Joined format-selection chain ("a/b/c")
    pub format_spec: String,
    pub include_playlist: bool,
    pub audio_transcode: Option<AudioTranscode>,
}

/// One stream variant reported by the engine.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFormat {
    pub height: Option<u32>,
    pub ext: Option<String>,
    pub vcodec: Option<String>,
    pub acodec: Option<String>,
}

/// Engine response for one item or one playlist dump. Playlist dumps carry
/// `entries`; unresolvable entries come through as `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMediaInfo {
    pub id: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub duration: Option<f64>,
    pub view_count: Option<u64>,
    pub webpage_url: Option<String>,
    pub url: Option<String>,
    pub playlist_count: Option<usize>,
    #[serde(default)]
    pub entries: Option<Vec<Option<RawMediaInfo>>>,
    #[serde(default)]
    pub formats: Option<Vec<RawFormat>>,
}

impl RawMediaInfo {
    pub fn is_playlist(&self) -> bool {
        self.entries.is_some()
    }
}

/// Callback receiving raw transfer updates during a download.
pub type TransferFn<'a> = &'a mut (dyn FnMut(TransferUpdate) + Send);

/// External media-resolution capability.
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Name of the engine (for logging)
    fn name(&self) -> &'static str;

    /// Fetch structured metadata for a URL without downloading.
    async fn extract_info(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<RawMediaInfo, DownloadError>;

    /// Perform the transfer, emitting raw updates through `on_transfer`.
    async fn download(
        &self,
        url: &str,
        options: &EngineDownloadOptions,
        on_transfer: TransferFn<'_>,
    ) -> Result<(), DownloadError>;
}
