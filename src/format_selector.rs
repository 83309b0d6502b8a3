// FormatSelector - builds the ordered fallback chain of yt-dlp
// format-selection expressions from (quality, container, audio-only).
//
// The engine evaluates chain entries strictly in order and stops at the
// first one that matches an available stream, so earlier entries always
// take precedence. The last entry is always the unconstrained "best" so
// the chain as a whole never fails outright.

use crate::models::{ContainerFormat, QualityTier};

/// Universal fallback appended to every chain.
pub const UNIVERSAL_FALLBACK: &str = "best";

/// Preferred source container for audio extraction.
const PREFERRED_AUDIO: &str = "m4a";

/// Ordered sequence of format-selection expressions, most preferred first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatChain(Vec<String>);

impl FormatChain {
    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Join into the engine's alternation syntax ("a/b/c").
    pub fn as_spec(&self) -> String {
        self.0.join("/")
    }
}

pub struct FormatSelector;

impl FormatSelector {
    /// Build the fallback chain for a request.
    ///
    /// - audio-only: preferred audio container, then universal fallback
    /// - best quality: best in requested container, then universal fallback
    /// - bounded quality: container-and-height match, height match in any
    ///   container, merged video+audio at the height, universal fallback
    pub fn select_chain(
        quality: QualityTier,
        container: ContainerFormat,
        audio_only: bool,
    ) -> FormatChain {
        if audio_only {
            return FormatChain(vec![
                format!("bestaudio[ext={}]", PREFERRED_AUDIO),
                UNIVERSAL_FALLBACK.to_string(),
            ]);
        }

        match quality.height() {
            None => FormatChain(vec![
                format!("best[ext={}]", container.ext()),
                UNIVERSAL_FALLBACK.to_string(),
            ]),
            Some(height) => FormatChain(vec![
                format!("best[height<={}][ext={}]", height, container.ext()),
                format!("best[height<={}]", height),
                format!("bestvideo[height<={}]+bestaudio", height),
                UNIVERSAL_FALLBACK.to_string(),
            ]),
        }
    }
}
