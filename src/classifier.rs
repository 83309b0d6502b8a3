// URL classification - stateless pattern matching over YouTube URL shapes

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::{MediaReference, RefKind};

lazy_static! {
    // Accepted shapes: watch, short link, embed, /v/, nocookie variants
    static ref VALID_RE: Regex = Regex::new(
        r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|\S+\?v=)?([^&=%\?/]{11})"
    )
    .unwrap();
    static ref ID_RE: Regex = Regex::new(
        r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/|youtube\.com/v/|youtube-nocookie\.com/embed/)([^&=%\?]{11})"
    )
    .unwrap();
    static ref PLAYLIST_RE: Regex = Regex::new(
        r"^(https?://)?(www\.)?youtube\.com/(playlist\?|watch\?.*[?&])list="
    )
    .unwrap();
}

/// Check whether the string matches an accepted YouTube URL shape.
/// Never fails; anything non-matching is simply false.
pub fn is_valid_url(url: &str) -> bool {
    VALID_RE.is_match(url) || PLAYLIST_RE.is_match(url)
}

/// Pull the 11-character video id out of a canonical URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    ID_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Whether the URL carries playlist context (`list=` or a /playlist path).
pub fn is_collection_url(url: &str) -> bool {
    PLAYLIST_RE.is_match(url)
}

/// Thumbnail URL for a video id. Pure string construction, no network call.
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

/// Classify a raw URL into a media reference, or `None` when it matches
/// no accepted shape.
pub fn classify(url: &str) -> Option<MediaReference> {
    if !is_valid_url(url) {
        return None;
    }
    let kind = if is_collection_url(url) {
        RefKind::CollectionEntry
    } else {
        RefKind::Single
    };
    let id = extract_video_id(url).unwrap_or_default();
    Some(MediaReference {
        id,
        source_url: url.to_string(),
        kind,
    })
}
