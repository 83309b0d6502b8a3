//! Download orchestration core for YouTube videos and playlists.
//!
//! The actual site resolution is delegated to an external engine (yt-dlp)
//! behind the [`MediaEngine`] trait; this crate supplies the policy layer
//! around it: URL classification, format-selection fallback chains,
//! metadata normalization, download orchestration and progress relaying.
//!
//! A presentation layer (GUI or CLI) drives four entry points:
//! [`classifier::is_valid_url`], [`MetadataExtractor::fetch_metadata`],
//! [`DownloadOrchestrator::download`] and [`classifier::thumbnail_url`].
//! Both long-running calls are `async` and should be run off the UI's
//! event thread; every component is stateless per call.

pub mod classifier;
pub mod engine;
pub mod errors;
pub mod extractor;
pub mod format_selector;
pub mod models;
pub mod orchestrator;
pub mod progress;
pub mod tools;
pub mod utils;
pub mod ytdlp;

pub use engine::{AudioTranscode, EngineDownloadOptions, ExtractOptions, MediaEngine, RawFormat, RawMediaInfo};
pub use errors::DownloadError;
pub use extractor::MetadataExtractor;
pub use format_selector::{FormatChain, FormatSelector};
pub use models::{
    CollectionReference, ContainerFormat, DownloadOutcome, DownloadRequest, MediaMetadata,
    MediaReference, QualityTier, RefKind,
};
pub use orchestrator::DownloadOrchestrator;
pub use progress::{Completion, Phase, ProgressEvent, ProgressSink, TransferUpdate};
pub use utils::sanitize_filename;
pub use ytdlp::YtDlpEngine;
