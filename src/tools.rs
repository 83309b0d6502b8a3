// Audio toolchain detection
//
// Audio-only requests need ffmpeg for the transcode step. Callers should
// probe availability before offering audio-only options; the orchestrator
// probes again and degrades gracefully when the toolchain is absent.

use std::process::Command;

/// Find the ffmpeg binary in common install locations, falling back to PATH.
pub fn find_ffmpeg() -> String {
    let common_paths = [
        "/opt/homebrew/bin/ffmpeg",
        "/usr/local/bin/ffmpeg",
        "/usr/bin/ffmpeg",
    ];

    for path in common_paths {
        if std::path::Path::new(path).exists() {
            return path.to_string();
        }
    }

    if let Ok(output) = Command::new("which").arg("ffmpeg").output() {
        if output.status.success() {
            if let Ok(path) = String::from_utf8(output.stdout) {
                let trimmed = path.trim();
                if !trimmed.is_empty() {
                    return trimmed.to_string();
                }
            }
        }
    }

    "ffmpeg".to_string()
}

/// Probe ffmpeg by asking it for its version.
pub fn ffmpeg_available() -> bool {
    match Command::new(find_ffmpeg()).arg("-version").output() {
        Ok(out) => out.status.success(),
        Err(_) => false,
    }
}
