// Progress relay - translates raw transfer updates from the engine into
// normalized events for the caller's sink.
//
// The relay is stateless; the sink is invoked synchronously on the same
// execution context that performed the transfer step, with no buffering
// or reordering.

use serde::{Deserialize, Serialize};

/// Low-level transfer update emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferUpdate {
    Downloading {
        downloaded_bytes: u64,
        /// Unknown for live/fragmented streams
        total_bytes: Option<u64>,
    },
    /// One item finished writing to disk
    Finished,
}

/// Download phase as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Downloading,
    Finished,
    Error,
}

/// Normalized completion. Unknown totals report `Indeterminate` rather
/// than a placeholder fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Completion {
    /// In [0, 1], non-decreasing within one item's event stream
    Fraction(f32),
    Indeterminate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub phase: Phase,
    pub completion: Completion,
    pub message: String,
}

impl ProgressEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            phase: Phase::Error,
            completion: Completion::Indeterminate,
            message: message.into(),
        }
    }
}

/// Caller-supplied consumer of progress events.
pub trait ProgressSink: Send {
    fn emit(&mut self, event: ProgressEvent);
}

impl<F> ProgressSink for F
where
    F: FnMut(ProgressEvent) + Send,
{
    fn emit(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Translate one raw update into a caller-facing event.
pub fn translate(update: &TransferUpdate) -> ProgressEvent {
    match update {
        TransferUpdate::Downloading {
            downloaded_bytes,
            total_bytes: Some(total),
        } if *total > 0 => {
            let fraction = (*downloaded_bytes as f64 / *total as f64).min(1.0) as f32;
            ProgressEvent {
                phase: Phase::Downloading,
                completion: Completion::Fraction(fraction),
                message: format!("Downloading: {:.1}%", fraction * 100.0),
            }
        }
        TransferUpdate::Downloading {
            downloaded_bytes, ..
        } => ProgressEvent {
            phase: Phase::Downloading,
            completion: Completion::Indeterminate,
            message: format!("Downloading: {} bytes (total unknown)", downloaded_bytes),
        },
        TransferUpdate::Finished => ProgressEvent {
            phase: Phase::Finished,
            completion: Completion::Fraction(1.0),
            message: "Download finished".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_total_yields_fraction() {
        let event = translate(&TransferUpdate::Downloading {
            downloaded_bytes: 50,
            total_bytes: Some(200),
        });
        assert_eq!(event.phase, Phase::Downloading);
        assert_eq!(event.completion, Completion::Fraction(0.25));
    }

    #[test]
    fn unknown_total_is_indeterminate_not_a_placeholder() {
        for total in [None, Some(0)] {
            let event = translate(&TransferUpdate::Downloading {
                downloaded_bytes: 1024,
                total_bytes: total,
            });
            assert_eq!(event.completion, Completion::Indeterminate);
        }
    }

    #[test]
    fn finished_is_full_fraction() {
        let event = translate(&TransferUpdate::Finished);
        assert_eq!(event.phase, Phase::Finished);
        assert_eq!(event.completion, Completion::Fraction(1.0));
    }

    #[test]
    fn fraction_is_clamped_to_one() {
        let event = translate(&TransferUpdate::Downloading {
            downloaded_bytes: 300,
            total_bytes: Some(200),
        });
        assert_eq!(event.completion, Completion::Fraction(1.0));
    }
}
