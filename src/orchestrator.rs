// Download orchestration - resolves a request into engine options, drives
// the transfer and relays progress to the caller's sink.

use log::{info, warn};

use crate::classifier;
use crate::engine::{AudioTranscode, EngineDownloadOptions, MediaEngine};
use crate::errors::DownloadError;
use crate::format_selector::FormatSelector;
use crate::models::{DownloadOutcome, DownloadRequest};
use crate::progress::{translate, ProgressEvent, ProgressSink, TransferUpdate};
use crate::tools;

/// Fixed transcode quality for audio extraction, kbps equivalent
const AUDIO_QUALITY_KBPS: u32 = 192;

pub struct DownloadOrchestrator<E: MediaEngine> {
    engine: E,
    ffmpeg_available: bool,
}

impl<E: MediaEngine> DownloadOrchestrator<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            ffmpeg_available: tools::ffmpeg_available(),
        }
    }

    /// Override the toolchain probe result. Callers that already probed
    /// (to gate audio-only options in their UI) can pass it through here.
    pub fn with_audio_toolchain(mut self, available: bool) -> Self {
        self.ffmpeg_available = available;
        self
    }

    /// Download one item or every item in a collection.
    ///
    /// Progress events reach the sink synchronously on the transfer's
    /// execution context; within one item fractions never decrease, and
    /// they reset when a collection moves to its next item. Re-invoking
    /// after a prior success downloads again; there is no skip-if-exists
    /// check.
    pub async fn download(
        &self,
        request: &DownloadRequest,
        sink: &mut dyn ProgressSink,
    ) -> Result<DownloadOutcome, DownloadError> {
        if !classifier::is_valid_url(&request.url) {
            return Err(DownloadError::InvalidUrl(request.url.clone()));
        }

        std::fs::create_dir_all(&request.output_dir)?;

        let audio_only = request.audio_only();
        let chain = FormatSelector::select_chain(request.quality, request.container, audio_only);

        // Collections nest under a subdirectory named after the collection;
        // the engine resolves the placeholders at write time.
        let template = if request.is_collection {
            request
                .output_dir
                .join("%(playlist_title)s")
                .join("%(title)s.%(ext)s")
        } else {
            request.output_dir.join("%(title)s.%(ext)s")
        };

        // The transcode step needs ffmpeg; without it the download still
        // proceeds and keeps the pre-transcode audio container.
        let audio_transcode = if audio_only && self.ffmpeg_available {
            Some(AudioTranscode {
                codec: request.container.ext().to_string(),
                quality_kbps: AUDIO_QUALITY_KBPS,
            })
        } else {
            if audio_only {
                warn!(
                    "[Orchestrator] ffmpeg not found; keeping best-audio container instead of {}",
                    request.container.ext()
                );
            }
            None
        };
        let transcoded = audio_transcode.is_some();

        let options = EngineDownloadOptions {
            output_template: template.to_string_lossy().into_owned(),
            format_spec: chain.as_spec(),
            include_playlist: request.is_collection,
            audio_transcode,
        };

        info!(
            "[Orchestrator] {} -> {} (format: {})",
            request.url, options.output_template, options.format_spec
        );

        let result = self
            .engine
            .download(&request.url, &options, &mut |update: TransferUpdate| {
                sink.emit(translate(&update))
            })
            .await;

        match result {
            Ok(()) => {
                sink.emit(translate(&TransferUpdate::Finished));
                let message = if transcoded || !audio_only {
                    "Download completed".to_string()
                } else {
                    "Download completed without audio transcoding (ffmpeg unavailable)"
                        .to_string()
                };
                Ok(DownloadOutcome { transcoded, message })
            }
            Err(e) => {
                // No partial-file cleanup here; leftover files are the
                // caller's responsibility.
                sink.emit(ProgressEvent::error(e.display_message()));
                Err(e)
            }
        }
    }
}
