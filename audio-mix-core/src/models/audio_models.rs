use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::MixError;

/// Declared media types accepted for either input.
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] = ["audio/mp3", "audio/mpeg", "audio/wav", "audio/ogg"];

/// Media type recorded when the uploader did not declare one.
pub const FALLBACK_MEDIA_TYPE: &str = "application/octet-stream";

/// Role of an input track in the mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioRole {
    Speech,
    Music,
}

impl AudioRole {
    pub const ALL: [AudioRole; 2] = [AudioRole::Speech, AudioRole::Music];

    /// Form field name, identical to the lowercase role name.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Speech => "speech",
            Self::Music => "music",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "speech" => Some(Self::Speech),
            "music" => Some(Self::Music),
            _ => None,
        }
    }
}

impl fmt::Display for AudioRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// A named audio byte buffer plus its declared media type.
#[derive(Clone, PartialEq, Eq)]
pub struct AudioInput {
    pub role: AudioRole,
    pub file_name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

impl AudioInput {
    pub fn new(
        role: AudioRole,
        file_name: impl Into<String>,
        media_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            role,
            file_name: file_name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }

    /// Whether the declared media type is in [`SUPPORTED_MEDIA_TYPES`].
    pub fn has_supported_media_type(&self) -> bool {
        is_supported_media_type(&self.media_type)
    }
}

// Prints the payload size, not the payload.
impl fmt::Debug for AudioInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioInput")
            .field("role", &self.role)
            .field("file_name", &self.file_name)
            .field("media_type", &self.media_type)
            .field("size_bytes", &self.data.len())
            .finish()
    }
}

/// Checks a declared media type against the allow-list.
///
/// Comparison ignores case and any `;`-separated parameters.
pub fn is_supported_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    SUPPORTED_MEDIA_TYPES.contains(&essence.as_str())
}

/// Inputs as acquired from an upload or picker, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixRequest {
    pub speech: Option<AudioInput>,
    pub music: Option<AudioInput>,
}

impl MixRequest {
    pub fn new(speech: AudioInput, music: AudioInput) -> Self {
        let mut request = Self::default();
        request.insert(speech);
        request.insert(music);
        request
    }

    /// Stores `input` in the slot of its role, replacing any earlier one.
    pub fn insert(&mut self, input: AudioInput) {
        match input.role {
            AudioRole::Speech => self.speech = Some(input),
            AudioRole::Music => self.music = Some(input),
        }
    }

    pub fn get(&self, role: AudioRole) -> Option<&AudioInput> {
        match role {
            AudioRole::Speech => self.speech.as_ref(),
            AudioRole::Music => self.music.as_ref(),
        }
    }

    /// Roles whose input is absent or empty.
    pub fn missing_roles(&self) -> Vec<AudioRole> {
        AudioRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).map_or(true, AudioInput::is_empty))
            .collect()
    }

    pub fn ensure_complete(&self) -> Result<(), MixError> {
        let missing = self.missing_roles();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(MixError::MissingInput { missing })
        }
    }

    /// Splits into `(speech, music)`, failing if either is absent or empty.
    pub fn into_pair(self) -> Result<(AudioInput, AudioInput), MixError> {
        self.ensure_complete()?;
        match (self.speech, self.music) {
            (Some(speech), Some(music)) => Ok((speech, music)),
            _ => Err(MixError::MissingInput {
                missing: AudioRole::ALL.to_vec(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(role: AudioRole, data: &[u8]) -> AudioInput {
        AudioInput::new(role, format!("{role}.mp3"), "audio/mpeg", data.to_vec())
    }

    #[test]
    fn media_type_allow_list() {
        assert!(is_supported_media_type("audio/mpeg"));
        assert!(is_supported_media_type("audio/mp3"));
        assert!(is_supported_media_type("audio/wav"));
        assert!(is_supported_media_type("Audio/OGG; codecs=vorbis"));
        assert!(!is_supported_media_type("audio/flac"));
        assert!(!is_supported_media_type("application/octet-stream"));
        assert!(!is_supported_media_type(""));
    }

    #[test]
    fn field_names_round_trip() {
        for role in AudioRole::ALL {
            assert_eq!(AudioRole::from_field_name(role.field_name()), Some(role));
        }
        assert_eq!(AudioRole::from_field_name("voice"), None);
    }

    #[test]
    fn complete_request_splits_into_pair() {
        let request = MixRequest::new(input(AudioRole::Speech, b"s"), input(AudioRole::Music, b"m"));
        let (speech, music) = request.into_pair().unwrap();
        assert_eq!(speech.role, AudioRole::Speech);
        assert_eq!(music.data, b"m");
    }

    #[test]
    fn missing_music_is_reported() {
        let mut request = MixRequest::default();
        request.insert(input(AudioRole::Speech, b"s"));

        let err = request.into_pair().unwrap_err();
        assert_eq!(
            err,
            MixError::MissingInput {
                missing: vec![AudioRole::Music]
            }
        );
    }

    #[test]
    fn empty_buffer_counts_as_missing() {
        let request = MixRequest::new(input(AudioRole::Speech, b""), input(AudioRole::Music, b""));
        assert_eq!(request.missing_roles(), vec![AudioRole::Speech, AudioRole::Music]);
    }

    #[test]
    fn insert_replaces_same_role() {
        let mut request = MixRequest::default();
        request.insert(input(AudioRole::Music, b"first"));
        request.insert(input(AudioRole::Music, b"second"));
        assert_eq!(request.get(AudioRole::Music).unwrap().data, b"second");
        assert!(request.get(AudioRole::Speech).is_none());
    }

    #[test]
    fn debug_hides_payload() {
        let debug = format!("{:?}", input(AudioRole::Speech, &[7u8; 64]));
        assert!(debug.contains("size_bytes: 64"));
        assert!(!debug.contains("7, 7"));
    }
}
