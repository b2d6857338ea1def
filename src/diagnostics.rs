//! Dependency and configuration diagnostics for `funasr-client check`.

use crate::audio::transcode::{CommandExecutor, SystemCommandExecutor};
use crate::config::Config;
use crate::defaults;
use crate::error::FunasrError;
use std::path::Path;

/// Result of a dependency check.
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Tool is installed and working
    Ok,
    /// Tool is not found
    NotFound,
    /// Tool is found but has issues
    Warning(String),
}

/// Check that `tool` exists and answers `-version` through `executor`.
fn check_tool<E: CommandExecutor>(executor: &E, tool: &str) -> CheckResult {
    match executor.execute(tool, &["-version"]) {
        Ok(_) => CheckResult::Ok,
        Err(FunasrError::ToolNotFound { .. }) => CheckResult::NotFound,
        Err(FunasrError::Transcoding { message, .. }) => {
            CheckResult::Warning(format!("'{}' found but -version failed: {}", tool, message))
        }
        Err(e) => CheckResult::Warning(format!("Error checking '{}': {}", tool, e)),
    }
}

/// Check the transcoder used for non-WAV/PCM inputs.
pub fn check_transcoder() -> CheckResult {
    check_tool(&SystemCommandExecutor::new(), defaults::TRANSCODER)
}

/// Human-readable summary of the effective configuration.
pub fn describe_config(config: &Config, source: Option<&Path>) -> Vec<String> {
    let mut lines = Vec::new();
    match source {
        Some(path) if path.exists() => lines.push(format!("Config file: {}", path.display())),
        Some(path) => lines.push(format!(
            "Config file: {} (not found, using defaults)",
            path.display()
        )),
        None => lines.push("Config file: none (using defaults)".to_string()),
    }

    let scheme = if config.server.ssl { "wss" } else { "ws" };
    lines.push(format!(
        "Server: {}://{}:{}",
        scheme, config.server.host, config.server.port
    ));
    lines.push(format!(
        "Mode: {}, chunk size {}, interval {}, itn {}",
        config.stream.mode,
        config.stream.chunk_size,
        config.stream.chunk_interval,
        if config.stream.itn { "on" } else { "off" }
    ));

    if let Err(e) = config.validate() {
        lines.push(format!("⚠ Invalid configuration: {}", e));
    }
    lines
}

/// Run all checks and print results.
pub fn check_dependencies(config: &Config, source: Option<&Path>) {
    println!("funasr-client {}", crate::version_string());
    println!("Checking system dependencies...\n");

    print!("{} (audio conversion): ", defaults::TRANSCODER);
    match check_transcoder() {
        CheckResult::Ok => println!("✓ OK"),
        CheckResult::NotFound => {
            println!("- not installed");
            println!("  Only .wav and .pcm files can be sent without it.");
            println!("  Install: sudo apt install ffmpeg  (Debian/Ubuntu)");
            println!("           sudo pacman -S ffmpeg    (Arch)");
        }
        CheckResult::Warning(msg) => println!("⚠ WARNING: {}", msg),
    }

    println!();
    for line in describe_config(config, source) {
        println!("{}", line);
    }

    if config.server.ssl {
        println!();
        println!("⚠ TLS is enabled without certificate verification.");
    }
}
