/// How the suggested file name of a mix result is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputNaming {
    /// Always the same name, e.g. `merged-audio.mp3`.
    Fixed(String),
    /// `<prefix>-<unix-ms>.mp3`.
    Timestamped { prefix: String },
}

impl OutputNaming {
    pub fn file_name(&self) -> String {
        match self {
            Self::Fixed(name) => name.clone(),
            Self::Timestamped { prefix } => {
                format!("{}-{}.mp3", prefix, chrono::Utc::now().timestamp_millis())
            }
        }
    }
}

/// Configuration for a mix session.
///
/// The mix recipe itself lives in `MixRecipe` and is not configurable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixConfiguration {
    /// Naming policy for the produced file (default: `merged-audio.mp3`).
    pub output_naming: OutputNaming,

    /// Reject inputs whose declared media type is outside the allow-list (default: true).
    pub enforce_media_types: bool,

    /// Reject inputs whose bytes do not look like MP3, WAV or OGG (default: false).
    pub sniff_content: bool,
}

impl MixConfiguration {
    /// Behaviour of the HTTP endpoint: timestamped names, inputs passed through unchecked.
    pub fn server() -> Self {
        Self {
            output_naming: OutputNaming::Timestamped {
                prefix: "merged".into(),
            },
            enforce_media_types: false,
            sniff_content: false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match &self.output_naming {
            OutputNaming::Fixed(name) => {
                if name.trim().is_empty() {
                    return Err("output file name must not be empty".into());
                }
                if name.contains(['/', '\\', '"']) {
                    return Err(format!("invalid output file name: {}", name));
                }
            }
            OutputNaming::Timestamped { prefix } => {
                if prefix.contains(['/', '\\', '"']) {
                    return Err(format!("invalid output file prefix: {}", prefix));
                }
            }
        }
        Ok(())
    }
}

impl Default for MixConfiguration {
    fn default() -> Self {
        Self {
            output_naming: OutputNaming::Fixed("merged-audio.mp3".into()),
            enforce_media_types: true,
            sniff_content: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_fixed_download_name() {
        let config = MixConfiguration::default();
        assert_eq!(config.output_naming.file_name(), "merged-audio.mp3");
        assert!(config.enforce_media_types);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn server_names_are_timestamped() {
        let name = MixConfiguration::server().output_naming.file_name();
        let millis = name
            .strip_prefix("merged-")
            .and_then(|rest| rest.strip_suffix(".mp3"))
            .expect("merged-<ms>.mp3");
        assert!(millis.parse::<i64>().unwrap() > 1_600_000_000_000);
    }

    #[test]
    fn rejects_header_breaking_names() {
        let config = MixConfiguration {
            output_naming: OutputNaming::Fixed("a\"b.mp3".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = MixConfiguration {
            output_naming: OutputNaming::Fixed("  ".into()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
