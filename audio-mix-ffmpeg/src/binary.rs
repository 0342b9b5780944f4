//! Locating and probing the `ffmpeg` executable.
//!
//! The binary is taken from configuration, falling back to `ffmpeg` on
//! `PATH`. Probing runs `ffmpeg -version` and keeps the reported version.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use audio_mix_core::MixError;

/// Program name used when nothing else is configured.
pub const DEFAULT_BINARY: &str = "ffmpeg";

/// Make a relative binary path absolute so it survives `current_dir` changes.
///
/// A bare program name (no separators) is left alone for `PATH` lookup.
pub fn resolve_binary(binary: &Path) -> Result<PathBuf, MixError> {
    if binary.is_absolute() || binary.components().count() <= 1 {
        return Ok(binary.to_path_buf());
    }
    std::path::absolute(binary)
        .map_err(|e| MixError::EngineLoad(format!("cannot resolve {}: {}", binary.display(), e)))
}

/// Run `<binary> -version` and return the version token.
pub fn probe_version(binary: &Path) -> Result<String, MixError> {
    let output = Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .output()
        .map_err(|e| MixError::EngineLoad(format!("failed to run {}: {}", binary.display(), e)))?;

    if !output.status.success() {
        return Err(MixError::EngineLoad(format!(
            "{} -version exited with {}",
            binary.display(),
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version(&stdout)
        .ok_or_else(|| MixError::EngineLoad(format!("{} did not report an ffmpeg version", binary.display())))
}

/// Whether `binary` can be executed at all.
pub fn is_available(binary: &Path) -> bool {
    probe_version(binary).is_ok()
}

/// Extract `6.1.1` from `ffmpeg version 6.1.1 Copyright (c) ...`.
pub fn parse_version(banner: &str) -> Option<String> {
    let first = banner.lines().next()?;
    let rest = first.trim().strip_prefix("ffmpeg version ")?;
    rest.split_whitespace().next().map(str::to_string)
}
