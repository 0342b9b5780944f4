use serde::Deserialize;
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use audio_mix_core::MixConfiguration;
use audio_mix_ffmpeg::FfmpegConfig;

/// Names a JSON file holding a `ServerConfig`.
pub const CONFIG_ENV: &str = "AUDIO_MIX_CONFIG";

const LISTEN_ADDR_ENV: &str = "AUDIO_MIX_LISTEN_ADDR";
const SCRATCH_DIR_ENV: &str = "AUDIO_MIX_SCRATCH_DIR";
const FFMPEG_ENV: &str = "AUDIO_MIX_FFMPEG";
const STRICT_MEDIA_TYPES_ENV: &str = "AUDIO_MIX_STRICT_MEDIA_TYPES";
const MAX_CONCURRENT_ENV: &str = "AUDIO_MIX_MAX_CONCURRENT";
const MAX_UPLOAD_BYTES_ENV: &str = "AUDIO_MIX_MAX_UPLOAD_BYTES";
const CROSS_ORIGIN_ISOLATION_ENV: &str = "AUDIO_MIX_CROSS_ORIGIN_ISOLATION";

/// Server settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Root under which each request gets its own scratch directory.
    pub scratch_dir: PathBuf,
    pub ffmpeg_binary: PathBuf,
    /// Check declared media types and sniff content; rejects with 415.
    pub strict_media_types: bool,
    /// Mixes allowed to run at once; further requests wait. Unlimited when unset.
    pub max_concurrent_mixes: Option<usize>,
    /// Request body cap. Unlimited when unset.
    pub max_upload_bytes: Option<usize>,
    /// Send COOP/COEP headers so in-browser engines can use shared memory.
    pub cross_origin_isolation: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let ffmpeg = FfmpegConfig::default();
        Self {
            listen_addr: "127.0.0.1:3000".to_string(),
            scratch_dir: ffmpeg.scratch_root,
            ffmpeg_binary: ffmpeg.binary,
            strict_media_types: false,
            max_concurrent_mixes: None,
            max_upload_bytes: None,
            cross_origin_isolation: true,
        }
    }
}

impl ServerConfig {
    /// Defaults, then the file named by `AUDIO_MIX_CONFIG`, then `AUDIO_MIX_*` variables.
    pub fn load() -> Result<Self, String> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(p) => Self::load_from_path(Path::new(&p))?,
            Err(_) => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_path(cfg_path: &Path) -> Result<Self, String> {
        let raw = fs::read_to_string(cfg_path).map_err(|e| format!("Failed to read {cfg_path:?}: {e}"))?;
        let cfg: Self = serde_json::from_str(&raw).map_err(|e| format!("Invalid {}: {e}", cfg_path.display()))?;

        // relative scratch roots are taken relative to the config file
        if cfg.scratch_dir.is_relative() {
            let base_dir = cfg_path.parent().unwrap_or_else(|| Path::new("."));
            return Ok(Self {
                scratch_dir: base_dir.join(&cfg.scratch_dir),
                ..cfg
            });
        }
        Ok(cfg)
    }

    /// Override fields from variables returned by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(LISTEN_ADDR_ENV) {
            self.listen_addr = v;
        }
        if let Some(v) = lookup(SCRATCH_DIR_ENV) {
            self.scratch_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup(FFMPEG_ENV) {
            self.ffmpeg_binary = PathBuf::from(v);
        }
        if let Some(v) = lookup(STRICT_MEDIA_TYPES_ENV) {
            self.strict_media_types = parse_bool(STRICT_MEDIA_TYPES_ENV, &v)?;
        }
        if let Some(v) = lookup(MAX_CONCURRENT_ENV) {
            self.max_concurrent_mixes = parse_limit(MAX_CONCURRENT_ENV, &v)?;
        }
        if let Some(v) = lookup(MAX_UPLOAD_BYTES_ENV) {
            self.max_upload_bytes = parse_limit(MAX_UPLOAD_BYTES_ENV, &v)?;
        }
        if let Some(v) = lookup(CROSS_ORIGIN_ISOLATION_ENV) {
            self.cross_origin_isolation = parse_bool(CROSS_ORIGIN_ISOLATION_ENV, &v)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), String> {
        self.socket_addr()?;
        if self.ffmpeg_binary.as_os_str().is_empty() {
            return Err("ffmpeg_binary must not be empty".into());
        }
        if self.scratch_dir.as_os_str().is_empty() {
            return Err("scratch_dir must not be empty".into());
        }
        if self.max_concurrent_mixes == Some(0) {
            return Err("max_concurrent_mixes must be at least 1".into());
        }
        if self.max_upload_bytes == Some(0) {
            return Err("max_upload_bytes must be at least 1".into());
        }
        self.mix_configuration().validate()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        self.listen_addr
            .parse()
            .map_err(|e| format!("Invalid listen_addr {:?}: {e}", self.listen_addr))
    }

    pub fn ffmpeg_config(&self) -> FfmpegConfig {
        FfmpegConfig {
            binary: self.ffmpeg_binary.clone(),
            scratch_root: self.scratch_dir.clone(),
        }
    }

    /// Session settings for one request.
    pub fn mix_configuration(&self) -> MixConfiguration {
        MixConfiguration {
            enforce_media_types: self.strict_media_types,
            sniff_content: self.strict_media_types,
            ..MixConfiguration::server()
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("{key}: expected a boolean, got {other:?}")),
    }
}

/// Empty or `none` clears the limit.
fn parse_limit(key: &str, value: &str) -> Result<Option<usize>, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    value
        .parse()
        .map(Some)
        .map_err(|e| format!("{key}: expected a number, got {value:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_server() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.listen_addr, "127.0.0.1:3000");
        assert_eq!(cfg.scratch_dir, PathBuf::from("tmp"));
        assert_eq!(cfg.ffmpeg_binary, PathBuf::from("ffmpeg"));
        assert!(!cfg.strict_media_types);
        assert_eq!(cfg.max_concurrent_mixes, None);
        assert_eq!(cfg.max_upload_bytes, None);
        assert!(cfg.cross_origin_isolation);
        cfg.validate().unwrap();

        let mix = cfg.mix_configuration();
        assert!(!mix.enforce_media_types);
        assert!(!mix.sniff_content);
        assert_eq!(mix.output_naming, MixConfiguration::server().output_naming);
    }

    #[test]
    fn env_overrides_fields() {
        let mut cfg = ServerConfig::default();
        cfg.apply_env(env(&[
            ("AUDIO_MIX_LISTEN_ADDR", "0.0.0.0:8080"),
            ("AUDIO_MIX_SCRATCH_DIR", "/var/tmp/mix"),
            ("AUDIO_MIX_FFMPEG", "/opt/ffmpeg/bin/ffmpeg"),
            ("AUDIO_MIX_STRICT_MEDIA_TYPES", "yes"),
            ("AUDIO_MIX_MAX_CONCURRENT", "4"),
            ("AUDIO_MIX_MAX_UPLOAD_BYTES", "1048576"),
            ("AUDIO_MIX_CROSS_ORIGIN_ISOLATION", "off"),
        ]))
        .unwrap();

        assert_eq!(cfg.socket_addr().unwrap().port(), 8080);
        assert_eq!(cfg.ffmpeg_config().scratch_root, PathBuf::from("/var/tmp/mix"));
        assert_eq!(cfg.ffmpeg_config().binary, PathBuf::from("/opt/ffmpeg/bin/ffmpeg"));
        assert!(cfg.strict_media_types);
        assert!(cfg.mix_configuration().sniff_content);
        assert_eq!(cfg.max_concurrent_mixes, Some(4));
        assert_eq!(cfg.max_upload_bytes, Some(1_048_576));
        assert!(!cfg.cross_origin_isolation);
    }

    #[test]
    fn bad_env_values_are_reported() {
        let mut cfg = ServerConfig::default();
        let err = cfg.apply_env(env(&[("AUDIO_MIX_STRICT_MEDIA_TYPES", "maybe")])).unwrap_err();
        assert!(err.contains("AUDIO_MIX_STRICT_MEDIA_TYPES"));

        let err = cfg.apply_env(env(&[("AUDIO_MIX_MAX_CONCURRENT", "lots")])).unwrap_err();
        assert!(err.contains("AUDIO_MIX_MAX_CONCURRENT"));

        cfg.max_concurrent_mixes = Some(2);
        cfg.apply_env(env(&[("AUDIO_MIX_MAX_CONCURRENT", "none")])).unwrap();
        assert_eq!(cfg.max_concurrent_mixes, None);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let bad = [
            ServerConfig {
                listen_addr: "localhost".into(),
                ..ServerConfig::default()
            },
            ServerConfig {
                max_concurrent_mixes: Some(0),
                ..ServerConfig::default()
            },
            ServerConfig {
                max_upload_bytes: Some(0),
                ..ServerConfig::default()
            },
            ServerConfig {
                ffmpeg_binary: PathBuf::new(),
                ..ServerConfig::default()
            },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?} should be rejected");
        }
    }

    #[test]
    fn file_fields_are_optional() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio-mix.json");
        fs::write(&path, r#"{ "scratch_dir": "scratch", "max_concurrent_mixes": 2 }"#).unwrap();

        let cfg = ServerConfig::load_from_path(&path).unwrap();
        assert_eq!(cfg.scratch_dir, dir.path().join("scratch"));
        assert_eq!(cfg.max_concurrent_mixes, Some(2));
        assert_eq!(cfg.listen_addr, "127.0.0.1:3000");
    }

    #[test]
    fn unknown_file_fields_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audio-mix.json");
        fs::write(&path, r#"{ "speech_gain": 0.5 }"#).unwrap();
        assert!(ServerConfig::load_from_path(&path).is_err());
    }
}
