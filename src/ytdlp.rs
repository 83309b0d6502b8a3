// YtDlpEngine - production MediaEngine backed by the yt-dlp binary.
//
// Metadata extraction shells out with `-J` and parses the JSON dump;
// downloads stream stdout line by line, with a progress template that
// reports raw byte counts so the relay can compute real fractions.

use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command as TokioCommand;

use crate::engine::{EngineDownloadOptions, ExtractOptions, MediaEngine, RawMediaInfo, TransferFn};
use crate::errors::DownloadError;
use crate::progress::TransferUpdate;
use crate::utils::run_output_with_timeout;

/// Deadline for metadata extraction. Downloads run unbounded.
const EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Progress lines are reshaped into a stable machine-readable form:
/// "dl <status> <downloaded> <total> <total_estimate>", NA when unknown.
const PROGRESS_TEMPLATE: &str = "download:dl %(progress.status)s %(progress.downloaded_bytes)s %(progress.total_bytes)s %(progress.total_bytes_estimate)s";

lazy_static! {
    static ref PROGRESS_RE: Regex =
        Regex::new(r"^dl (\S+) (\S+) (\S+) (\S+)\s*$").unwrap();
}

fn parse_bytes(field: &str) -> Option<u64> {
    // yt-dlp prints "NA" for unknown fields and floats for estimates
    field.parse::<f64>().ok().map(|v| v as u64)
}

/// Parse one templated progress line into a transfer update.
fn parse_progress_line(line: &str) -> Option<TransferUpdate> {
    let caps = PROGRESS_RE.captures(line.trim())?;
    let status = caps.get(1)?.as_str();
    if status == "finished" {
        return Some(TransferUpdate::Finished);
    }
    let downloaded_bytes = parse_bytes(caps.get(2)?.as_str())?;
    let total_bytes =
        parse_bytes(caps.get(3)?.as_str()).or_else(|| parse_bytes(caps.get(4)?.as_str()));
    Some(TransferUpdate::Downloading {
        downloaded_bytes,
        total_bytes,
    })
}

pub struct YtDlpEngine {
    ytdlp_path: String,
}

impl Default for YtDlpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl YtDlpEngine {
    pub fn new() -> Self {
        Self {
            ytdlp_path: Self::find_ytdlp(),
        }
    }

    /// Find the yt-dlp binary in common install locations, then PATH.
    fn find_ytdlp() -> String {
        let common_paths = [
            "/opt/homebrew/bin/yt-dlp",
            "/usr/local/bin/yt-dlp",
            "/usr/bin/yt-dlp",
        ];

        for path in common_paths {
            if std::path::Path::new(path).exists() {
                return path.to_string();
            }
        }

        if let Ok(output) = std::process::Command::new("which").arg("yt-dlp").output() {
            if output.status.success() {
                if let Ok(path) = String::from_utf8(output.stdout) {
                    let trimmed = path.trim();
                    if !trimmed.is_empty() {
                        return trimmed.to_string();
                    }
                }
            }
        }

        "yt-dlp".to_string()
    }

    /// Check whether the binary responds to a version query.
    pub fn is_available(&self) -> bool {
        match std::process::Command::new(&self.ytdlp_path)
            .arg("--version")
            .output()
        {
            Ok(out) => out.status.success(),
            Err(_) => false,
        }
    }

    fn extract_args(url: &str, options: &ExtractOptions) -> Vec<String> {
        let mut args = vec![
            "-J".to_string(),
            "--no-warnings".to_string(),
            "--socket-timeout".to_string(),
            "15".to_string(),
            "--retries".to_string(),
            "2".to_string(),
        ];

        if options.quiet {
            args.push("--quiet".to_string());
        }

        if options.single_item {
            args.push("--no-playlist".to_string());
        } else {
            args.push("--yes-playlist".to_string());
            args.push("--playlist-start".to_string());
            args.push(options.playlist_start.to_string());
            if let Some(end) = options.playlist_end {
                args.push("--playlist-end".to_string());
                args.push(end.to_string());
            }
        }

        if options.flat {
            args.push("--flat-playlist".to_string());
        }

        args.push(url.to_string());
        args
    }

    fn download_args(url: &str, options: &EngineDownloadOptions) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            options.format_spec.clone(),
            "-o".to_string(),
            options.output_template.clone(),
            "--newline".to_string(),
            "--no-warnings".to_string(),
            "--progress-template".to_string(),
            PROGRESS_TEMPLATE.to_string(),
            "--socket-timeout".to_string(),
            "30".to_string(),
            "--retries".to_string(),
            "5".to_string(),
        ];

        if options.include_playlist {
            args.push("--yes-playlist".to_string());
        } else {
            args.push("--no-playlist".to_string());
        }

        if let Some(transcode) = &options.audio_transcode {
            args.push("-x".to_string());
            args.push("--audio-format".to_string());
            args.push(transcode.codec.clone());
            args.push("--audio-quality".to_string());
            args.push(format!("{}K", transcode.quality_kbps));
        }

        args.push(url.to_string());
        args
    }

    fn stderr_tail(stderr: &[u8]) -> String {
        let text = String::from_utf8_lossy(stderr);
        let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        lines
            .iter()
            .rev()
            .take(3)
            .rev()
            .cloned()
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

#[async_trait]
impl MediaEngine for YtDlpEngine {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract_info(
        &self,
        url: &str,
        options: &ExtractOptions,
    ) -> Result<RawMediaInfo, DownloadError> {
        let args = Self::extract_args(url, options);
        debug!("[yt-dlp] extract: {} {:?}", self.ytdlp_path, args);

        let output = run_output_with_timeout(&self.ytdlp_path, args, EXTRACT_TIMEOUT_SECS)
            .await
            .map_err(DownloadError::EngineFault)?;

        if !output.status.success() {
            return Err(DownloadError::EngineFault(Self::stderr_tail(&output.stderr)));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| DownloadError::EngineFault(format!("Invalid JSON from yt-dlp: {}", e)))
    }

    async fn download(
        &self,
        url: &str,
        options: &EngineDownloadOptions,
        on_transfer: TransferFn<'_>,
    ) -> Result<(), DownloadError> {
        let args = Self::download_args(url, options);
        debug!("[yt-dlp] download: {} {:?}", self.ytdlp_path, args);

        let mut child = TokioCommand::new(&self.ytdlp_path)
            .args(&args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| DownloadError::EngineFault(format!("Failed to start yt-dlp: {}", e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DownloadError::EngineFault("Failed to capture stdout".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| DownloadError::EngineFault("Failed to capture stderr".to_string()))?;

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf).await;
            buf
        });

        // Updates reach the sink synchronously, in stream order.
        let mut lines = BufReader::new(stdout).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(update) = parse_progress_line(&line) {
                on_transfer(update);
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| DownloadError::EngineFault(format!("Process error: {}", e)))?;
        let stderr_buf = stderr_task.await.unwrap_or_default();

        if status.success() {
            Ok(())
        } else {
            let tail = Self::stderr_tail(&stderr_buf);
            warn!("[yt-dlp] download failed: {}", tail);
            Err(DownloadError::EngineFault(tail))
        }
    }
}
