// Metadata extraction - invokes the engine for one item or a bounded
// playlist preview and normalizes the response into MediaMetadata.

use log::debug;

use crate::classifier;
use crate::engine::{ExtractOptions, MediaEngine, RawMediaInfo};
use crate::errors::DownloadError;
use crate::models::{CollectionReference, MediaMetadata, MediaReference, RefKind};

/// Playlist entries fetched for a UI preview
const PREVIEW_LIMIT: u32 = 5;

/// Playlist entries fetched for a full listing
const LISTING_LIMIT: u32 = 100;

/// Cap on the rendered quality list
const MAX_QUALITY_OPTIONS: usize = 10;

const UNKNOWN_TITLE: &str = "Title unavailable";
const UNKNOWN_UPLOADER: &str = "Uploader unavailable";
const UNTITLED_COLLECTION: &str = "Untitled playlist";

/// Render a duration in seconds as MM:SS, or HH:MM:SS from one hour up.
/// Zero or absent durations render as an explicit label.
pub fn format_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "unknown".to_string();
    }
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Scan the engine's raw format list into "{height}p ({ext})" labels,
/// deduplicated by height (first container seen wins), at most 10.
fn available_qualities(info: &RawMediaInfo) -> Vec<String> {
    let mut seen_heights = Vec::new();
    let mut labels = Vec::new();

    for format in info.formats.as_deref().unwrap_or_default() {
        let (Some(height), Some(ext)) = (format.height, format.ext.as_deref()) else {
            continue;
        };
        if seen_heights.contains(&height) {
            continue;
        }
        seen_heights.push(height);
        labels.push(format!("{}p ({})", height, ext));
        if labels.len() == MAX_QUALITY_OPTIONS {
            break;
        }
    }

    labels
}

fn normalize_single(info: &RawMediaInfo) -> MediaMetadata {
    MediaMetadata {
        title: info
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        uploader_name: info
            .uploader
            .clone()
            .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string()),
        duration_seconds: info.duration.map(|d| d as u64).filter(|d| *d > 0),
        view_count: info.view_count,
        available_qualities: available_qualities(info),
        collection_title: None,
        collection_count: None,
    }
}

pub struct MetadataExtractor<E: MediaEngine> {
    engine: E,
}

impl<E: MediaEngine> MetadataExtractor<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    /// Fetch descriptive info for a URL. In collection mode the first
    /// resolvable preview entry stands in as the representative item and
    /// collection-level fields are merged in.
    ///
    /// Engine faults are caught here and surfaced as `NotFound` with the
    /// original message kept for display.
    pub async fn fetch_metadata(
        &self,
        url: &str,
        treat_as_collection: bool,
    ) -> Result<MediaMetadata, DownloadError> {
        if !classifier::is_valid_url(url) {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }

        let options = if treat_as_collection {
            ExtractOptions::preview(PREVIEW_LIMIT)
        } else {
            ExtractOptions::single()
        };

        let info = match self.engine.extract_info(url, &options).await {
            Ok(info) => info,
            Err(DownloadError::EngineFault(msg)) => {
                debug!("[Extractor] engine fault for {}: {}", url, msg);
                return Err(DownloadError::NotFound(msg));
            }
            Err(e) => return Err(e),
        };

        if treat_as_collection && info.is_playlist() {
            let entries = info.entries.as_deref().unwrap_or_default();
            let resolvable = entries.iter().flatten().count();
            let representative = entries
                .iter()
                .flatten()
                .next()
                .ok_or_else(|| DownloadError::NotFound("Playlist has no usable entries".to_string()))?;

            let mut metadata = normalize_single(representative);
            metadata.collection_title = Some(
                info.title
                    .clone()
                    .unwrap_or_else(|| UNTITLED_COLLECTION.to_string()),
            );
            metadata.collection_count = Some(info.playlist_count.unwrap_or(resolvable));
            Ok(metadata)
        } else {
            Ok(normalize_single(&info))
        }
    }

    /// Full collection listing: flat extraction bounded to the first 100
    /// entries, skipping any the engine could not resolve.
    pub async fn fetch_collection(
        &self,
        url: &str,
    ) -> Result<CollectionReference, DownloadError> {
        if !classifier::is_valid_url(url) {
            return Err(DownloadError::InvalidUrl(url.to_string()));
        }

        let info = match self
            .engine
            .extract_info(url, &ExtractOptions::listing(LISTING_LIMIT))
            .await
        {
            Ok(info) => info,
            Err(DownloadError::EngineFault(msg)) => {
                debug!("[Extractor] engine fault for {}: {}", url, msg);
                return Err(DownloadError::NotFound(msg));
            }
            Err(e) => return Err(e),
        };

        let entries: Vec<MediaReference> = info
            .entries
            .as_deref()
            .ok_or_else(|| DownloadError::NotFound("URL is not a playlist".to_string()))?
            .iter()
            .flatten()
            .map(|entry| MediaReference {
                id: entry.id.clone().unwrap_or_default(),
                source_url: entry
                    .url
                    .clone()
                    .or_else(|| entry.webpage_url.clone())
                    .unwrap_or_default(),
                kind: RefKind::CollectionEntry,
            })
            .collect();

        Ok(CollectionReference {
            id: info.id.clone().unwrap_or_default(),
            title: info
                .title
                .clone()
                .unwrap_or_else(|| UNTITLED_COLLECTION.to_string()),
            item_count: info.playlist_count.unwrap_or(entries.len()),
            preview_entries: entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineDownloadOptions, RawFormat, TransferFn};
    use async_trait::async_trait;

    const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    const PLAYLIST_URL: &str = "https://www.youtube.com/playlist?list=PLabc123";

    /// Engine stub returning a canned response or a scripted fault.
    struct StubEngine {
        response: Result<RawMediaInfo, DownloadError>,
    }

    #[async_trait]
    impl MediaEngine for StubEngine {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn extract_info(
            &self,
            _url: &str,
            _options: &ExtractOptions,
        ) -> Result<RawMediaInfo, DownloadError> {
            self.response.clone()
        }

        async fn download(
            &self,
            _url: &str,
            _options: &EngineDownloadOptions,
            _on_transfer: TransferFn<'_>,
        ) -> Result<(), DownloadError> {
            unreachable!("extractor never downloads")
        }
    }

    fn video_format(height: u32, ext: &str) -> RawFormat {
        RawFormat {
            height: Some(height),
            ext: Some(ext.to_string()),
            ..RawFormat::default()
        }
    }

    fn sample_video(title: &str) -> RawMediaInfo {
        RawMediaInfo {
            id: Some("dQw4w9WgXcQ".to_string()),
            title: Some(title.to_string()),
            uploader: Some("Channel".to_string()),
            duration: Some(212.0),
            view_count: Some(1_000_000),
            formats: Some(vec![
                video_format(1080, "mp4"),
                video_format(720, "mp4"),
                video_format(720, "webm"),
            ]),
            ..RawMediaInfo::default()
        }
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(0), "unknown");
        assert_eq!(format_duration(65), "01:05");
        assert_eq!(format_duration(3661), "01:01:01");
    }

    #[test]
    fn qualities_dedupe_by_height_and_cap_at_ten() {
        let mut formats = vec![video_format(720, "webm"), video_format(720, "mp4")];
        for height in (100..1500).step_by(100) {
            formats.push(video_format(height, "mp4"));
        }
        // An entry missing height or ext never shows up
        formats.push(RawFormat {
            height: Some(480),
            ext: None,
            ..RawFormat::default()
        });

        let info = RawMediaInfo {
            formats: Some(formats),
            ..RawMediaInfo::default()
        };
        let labels = available_qualities(&info);

        assert!(labels.len() <= 10);
        assert_eq!(labels[0], "720p (webm)"); // first container wins
        let heights: Vec<&str> = labels.iter().map(|l| l.split('p').next().unwrap()).collect();
        let mut deduped = heights.clone();
        deduped.dedup();
        assert_eq!(heights, deduped);
    }

    #[tokio::test]
    async fn single_video_metadata() {
        let extractor = MetadataExtractor::new(StubEngine {
            response: Ok(sample_video("Never Gonna Give You Up")),
        });

        let metadata = extractor.fetch_metadata(VIDEO_URL, false).await.unwrap();
        assert_eq!(metadata.title, "Never Gonna Give You Up");
        assert_eq!(metadata.uploader_name, "Channel");
        assert_eq!(metadata.duration_seconds, Some(212));
        assert!(metadata.collection_title.is_none());
        assert!(metadata.collection_count.is_none());
    }

    #[tokio::test]
    async fn collection_preview_picks_first_resolvable_entry() {
        let playlist = RawMediaInfo {
            title: Some("My Playlist".to_string()),
            playlist_count: None,
            entries: Some(vec![
                None,
                Some(sample_video("Second Entry")),
                Some(sample_video("Third Entry")),
            ]),
            ..RawMediaInfo::default()
        };
        let extractor = MetadataExtractor::new(StubEngine {
            response: Ok(playlist),
        });

        let metadata = extractor.fetch_metadata(PLAYLIST_URL, true).await.unwrap();
        assert_eq!(metadata.title, "Second Entry");
        assert_eq!(metadata.collection_title.as_deref(), Some("My Playlist"));
        // Engine reported no count, so non-empty entries are counted instead
        assert_eq!(metadata.collection_count, Some(2));
    }

    #[tokio::test]
    async fn all_empty_entries_is_not_found() {
        let playlist = RawMediaInfo {
            title: Some("Ghost Playlist".to_string()),
            entries: Some(vec![None, None]),
            ..RawMediaInfo::default()
        };
        let extractor = MetadataExtractor::new(StubEngine {
            response: Ok(playlist),
        });

        let err = extractor.fetch_metadata(PLAYLIST_URL, true).await.unwrap_err();
        assert!(matches!(err, DownloadError::NotFound(_)));
    }

    #[tokio::test]
    async fn engine_fault_maps_to_not_found_with_message() {
        let extractor = MetadataExtractor::new(StubEngine {
            response: Err(DownloadError::EngineFault(
                "HTTP Error 500: site changed".to_string(),
            )),
        });

        let err = extractor.fetch_metadata(VIDEO_URL, false).await.unwrap_err();
        match err {
            DownloadError::NotFound(msg) => assert!(msg.contains("site changed")),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn invalid_url_never_reaches_the_engine() {
        struct PanicEngine;

        #[async_trait]
        impl MediaEngine for PanicEngine {
            fn name(&self) -> &'static str {
                "panic"
            }
            async fn extract_info(
                &self,
                _url: &str,
                _options: &ExtractOptions,
            ) -> Result<RawMediaInfo, DownloadError> {
                panic!("engine must not be called for invalid URLs")
            }
            async fn download(
                &self,
                _url: &str,
                _options: &EngineDownloadOptions,
                _on_transfer: TransferFn<'_>,
            ) -> Result<(), DownloadError> {
                unreachable!()
            }
        }

        let extractor = MetadataExtractor::new(PanicEngine);
        let err = extractor
            .fetch_metadata("https://example.com/nope", false)
            .await
            .unwrap_err();
        assert!(matches!(err, DownloadError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn collection_listing_skips_unresolvable_entries() {
        let playlist = RawMediaInfo {
            id: Some("PLabc123".to_string()),
            title: Some("Long Playlist".to_string()),
            playlist_count: Some(250),
            entries: Some(vec![
                Some(sample_video("One")),
                None,
                Some(sample_video("Two")),
            ]),
            ..RawMediaInfo::default()
        };
        let extractor = MetadataExtractor::new(StubEngine {
            response: Ok(playlist),
        });

        let collection = extractor.fetch_collection(PLAYLIST_URL).await.unwrap();
        assert_eq!(collection.title, "Long Playlist");
        assert_eq!(collection.preview_entries.len(), 2);
        // Engine-reported count wins over the bounded fetch
        assert_eq!(collection.item_count, 250);
        assert!(collection
            .preview_entries
            .iter()
            .all(|e| e.kind == RefKind::CollectionEntry));
    }
}
