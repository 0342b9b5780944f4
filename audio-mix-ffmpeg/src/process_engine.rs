//! `MixEngine` backed by an `ffmpeg` child process.
//!
//! The engine's file store is a private `ScratchDir`; `exec` runs the binary
//! with that directory as its working directory, so the recipe's bare file
//! names (`speech.mp3`, `music.mp3`, `output.mp3`) resolve inside it.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use audio_mix_core::{MixEngine, MixError, ScratchDir};

use crate::binary;

/// Flags prepended to every invocation: no banner, never read stdin,
/// overwrite outputs instead of prompting.
pub const ENGINE_FLAGS: [&str; 3] = ["-hide_banner", "-nostdin", "-y"];

/// Lines of stderr kept in a `MixExecution` error.
const STDERR_TAIL_LINES: usize = 8;

/// Where the engine finds its binary and stages its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FfmpegConfig {
    /// Path or program name of the ffmpeg executable (default: `ffmpeg`).
    pub binary: PathBuf,

    /// Directory under which per-engine scratch directories are created (default: `./tmp`).
    pub scratch_root: PathBuf,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(binary::DEFAULT_BINARY),
            scratch_root: PathBuf::from("tmp"),
        }
    }
}

/// ffmpeg process engine.
///
/// One instance per request on the server. `load` probes the binary and
/// creates the scratch directory; `release` (or drop) removes it.
pub struct FfmpegProcessEngine {
    config: FfmpegConfig,
    binary: PathBuf,
    scratch: Option<ScratchDir>,
    version: Option<String>,
}

impl FfmpegProcessEngine {
    pub fn new(config: FfmpegConfig) -> Self {
        let binary = config.binary.clone();
        Self {
            config,
            binary,
            scratch: None,
            version: None,
        }
    }

    /// Version reported by the binary, once loaded.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Scratch directory of a loaded engine.
    pub fn scratch_path(&self) -> Option<&std::path::Path> {
        self.scratch.as_ref().map(ScratchDir::path)
    }

    fn scratch(&self) -> Result<&ScratchDir, MixError> {
        self.scratch.as_ref().ok_or(MixError::EngineNotReady)
    }
}

impl MixEngine for FfmpegProcessEngine {
    fn name(&self) -> &str {
        "ffmpeg"
    }

    fn load(&mut self) -> Result<(), MixError> {
        if self.scratch.is_some() {
            return Ok(());
        }

        let binary = binary::resolve_binary(&self.config.binary)?;
        let version = binary::probe_version(&binary)?;

        let root = std::path::absolute(&self.config.scratch_root).map_err(|e| {
            MixError::EngineLoad(format!(
                "cannot resolve scratch root {}: {}",
                self.config.scratch_root.display(),
                e
            ))
        })?;
        let scratch = ScratchDir::create_in(&root).map_err(|e| MixError::EngineLoad(e.to_string()))?;

        log::debug!(
            "ffmpeg {} at {} using {}",
            version,
            binary.display(),
            scratch.path().display()
        );

        self.binary = binary;
        self.version = Some(version);
        self.scratch = Some(scratch);
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), MixError> {
        self.scratch()?.write(name, data).map(|_| ())
    }

    fn exec(&mut self, args: &[String]) -> Result<(), MixError> {
        let scratch = self.scratch()?;

        let output = Command::new(&self.binary)
            .current_dir(scratch.path())
            .args(ENGINE_FLAGS)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| MixError::MixExecution(format!("failed to run {}: {}", self.binary.display(), e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            log::error!("ffmpeg exited with {}: {}", output.status, stderr.trim());
            let tail = stderr_tail(&stderr);
            let message = if tail.is_empty() {
                format!("ffmpeg exited with {}", output.status)
            } else {
                tail
            };
            return Err(MixError::MixExecution(message));
        }

        log::debug!("ffmpeg finished: {}", stderr.trim());
        Ok(())
    }

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, MixError> {
        self.scratch()?.read(name)
    }

    fn delete_file(&mut self, name: &str) -> Result<(), MixError> {
        self.scratch()?.remove(name)
    }

    fn release(&mut self) {
        if let Some(scratch) = self.scratch.take() {
            if let Err(e) = scratch.close() {
                log::warn!("Error releasing ffmpeg engine: {}", e);
            }
        }
        self.version = None;
    }
}

impl Drop for FfmpegProcessEngine {
    fn drop(&mut self) {
        self.release();
    }
}

/// Last few non-empty stderr lines, where ffmpeg puts the actual failure.
fn stderr_tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
