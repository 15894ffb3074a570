//! Overlay text capture.
//!
//! Runs the user-supplied system-information command and turns its output
//! into the pre-trimmed, non-empty lines rendered beside the animation.
//! Failure here is always degraded, never fatal: a missing or broken command
//! yields an empty overlay.

use std::process::Command;

/// Capture overlay lines from `command_line` (program plus arguments,
/// whitespace-separated).
///
/// Output lines are stripped of trailing carriage returns/newlines and empty
/// lines are dropped. Returns an empty list when the command line is blank,
/// the command cannot be spawned, or it exits unsuccessfully.
pub fn capture_lines(command_line: &str) -> Vec<String> {
    let Some(output) = capture_output(command_line) else {
        tracing::warn!(command = command_line, "overlay command unavailable");
        return Vec::new();
    };
    output
        .lines()
        .map(|line| line.trim_end_matches(['\r', '\n']))
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}

fn capture_output(command_line: &str) -> Option<String> {
    let mut parts = command_line.split_whitespace();
    let program = parts.next()?;
    let args: Vec<&str> = parts.collect();

    // Prefer a pseudo-terminal wrapper so the child keeps its colored
    // output: `script` first, then expect's `unbuffer`, then a direct
    // invocation without a pty.
    if let Ok(out) = Command::new("script")
        .args(["-qefc", command_line, "/dev/null"])
        .env("TERM", "xterm-256color")
        .output()
        && out.status.success()
    {
        return Some(String::from_utf8_lossy(&out.stdout).into_owned());
    }

    if let Ok(out) = Command::new("unbuffer")
        .arg(program)
        .args(&args)
        .env("TERM", "xterm-256color")
        .output()
        && out.status.success()
    {
        return Some(String::from_utf8_lossy(&out.stdout).into_owned());
    }

    let out = Command::new(program)
        .args(&args)
        .env("TERM", "xterm-256color")
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&out.stdout).into_owned())
}
