// Shared helpers: filename sanitization and subprocess execution

use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::{timeout, Duration};

/// Characters stripped from filenames
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum filename length after sanitization
const MAX_FILENAME_LEN: usize = 200;

/// Strip forbidden characters, trim surrounding whitespace and truncate
/// to 200 characters. Idempotent.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name.chars().filter(|c| !FORBIDDEN.contains(c)).collect();
    let truncated: String = cleaned.trim().chars().take(MAX_FILENAME_LEN).collect();
    // Truncation can expose trailing whitespace, which would break idempotence
    truncated.trim_end().to_string()
}

/// Run a command to completion with a deadline, capturing stdout/stderr.
/// The child is killed on timeout.
pub async fn run_output_with_timeout(
    program: &str,
    args: Vec<String>,
    timeout_secs: u64,
) -> Result<std::process::Output, String> {
    let mut child = TokioCommand::new(program)
        .args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to start {}: {}", program, e))?;

    let mut stdout_pipe = child
        .stdout
        .take()
        .ok_or_else(|| format!("Failed to capture stdout from {}", program))?;
    let mut stderr_pipe = child
        .stderr
        .take()
        .ok_or_else(|| format!("Failed to capture stderr from {}", program))?;

    let stdout_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stdout_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stdout: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });
    let stderr_task = tokio::spawn(async move {
        let mut buf = Vec::new();
        stderr_pipe
            .read_to_end(&mut buf)
            .await
            .map_err(|e| format!("Failed to read stderr: {}", e))?;
        Ok::<Vec<u8>, String>(buf)
    });

    match timeout(Duration::from_secs(timeout_secs), child.wait()).await {
        Ok(status_res) => {
            let status =
                status_res.map_err(|e| format!("Failed to wait for {}: {}", program, e))?;
            let stdout = stdout_task
                .await
                .map_err(|e| format!("stdout task failed: {}", e))??;
            let stderr = stderr_task
                .await
                .map_err(|e| format!("stderr task failed: {}", e))??;
            Ok(std::process::Output {
                status,
                stdout,
                stderr,
            })
        }
        Err(_) => {
            let _ = child.kill().await;
            stdout_task.abort();
            stderr_task.abort();
            Err(format!("Timed out after {}s", timeout_secs))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_forbidden_characters() {
        let out = sanitize_filename(r#"a<b>c:d"e/f\g|h?i*j"#);
        assert_eq!(out, "abcdefghij");
        for c in FORBIDDEN {
            assert!(!out.contains(*c));
        }
    }

    #[test]
    fn sanitize_trims_and_truncates() {
        assert_eq!(sanitize_filename("  spaced title  "), "spaced title");
        let long = "x".repeat(500);
        assert_eq!(sanitize_filename(&long).len(), 200);
    }

    #[test]
    fn sanitize_is_idempotent() {
        let boundary_space = "a".repeat(199) + " " + &"b".repeat(100);
        let inputs = [
            r#"My "Great" Video: Part 1/2"#,
            "   plain   ",
            "",
            &"y".repeat(300),
            &boundary_space,
        ];
        for input in inputs {
            let once = sanitize_filename(input);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[tokio::test]
    async fn run_output_captures_stdout() {
        let out = run_output_with_timeout("echo", vec!["hello".to_string()], 5)
            .await
            .expect("echo should run");
        assert!(out.status.success());
        assert_eq!(String::from_utf8_lossy(&out.stdout).trim(), "hello");
    }

    #[tokio::test]
    async fn run_output_times_out() {
        let err = run_output_with_timeout("sleep", vec!["5".to_string()], 1)
            .await
            .expect_err("should time out");
        assert!(err.contains("Timed out"));
    }
}
