use serde::{Deserialize, Serialize};

use super::audio_models::{AudioInput, AudioRole};
use super::error::MixError;
use crate::processing::filter_graph::MixRecipe;

/// Content type of every mix result.
pub const OUTPUT_CONTENT_TYPE: &str = "audio/mpeg";

/// The single mixed output of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct MixResult {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: &'static str,
    pub checksum: String,
    pub metadata: MixMetadata,
}

impl MixResult {
    pub fn size_bytes(&self) -> usize {
        self.data.len()
    }
}

/// Summary of one input as it went into the mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSummary {
    pub role: AudioRole,
    pub file_name: String,
    pub media_type: String,
    pub size_bytes: usize,
}

impl From<&AudioInput> for InputSummary {
    fn from(input: &AudioInput) -> Self {
        Self {
            role: input.role,
            file_name: input.file_name.clone(),
            media_type: input.media_type.clone(),
            size_bytes: input.size_bytes(),
        }
    }
}

/// Describes how a result was produced. Serializable for logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixMetadata {
    pub id: String,
    pub created_at: String,
    pub inputs: Vec<InputSummary>,
    pub codec: String,
    pub bitrate_kbps: u32,
    pub filter_graph: String,
}

impl MixMetadata {
    pub fn new(speech: &AudioInput, music: &AudioInput) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            inputs: vec![InputSummary::from(speech), InputSummary::from(music)],
            codec: MixRecipe::OUTPUT_CODEC.to_string(),
            bitrate_kbps: MixRecipe::OUTPUT_BITRATE_KBPS,
            filter_graph: MixRecipe::filter_graph(),
        }
    }

    /// Compact JSON form, as written to logs.
    pub fn to_json(&self) -> Result<String, MixError> {
        serde_json::to_string(self).map_err(|e| MixError::Storage(format!("failed to serialize metadata: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_records_recipe_and_inputs() {
        let speech = AudioInput::new(AudioRole::Speech, "talk.wav", "audio/wav", vec![0; 10]);
        let music = AudioInput::new(AudioRole::Music, "bed.ogg", "audio/ogg", vec![0; 20]);
        let metadata = MixMetadata::new(&speech, &music);

        assert_eq!(metadata.codec, "libmp3lame");
        assert_eq!(metadata.bitrate_kbps, 192);
        assert_eq!(metadata.inputs[0].file_name, "talk.wav");
        assert_eq!(metadata.inputs[1].size_bytes, 20);

        let json: serde_json::Value = serde_json::from_str(&metadata.to_json().unwrap()).unwrap();
        assert_eq!(json["inputs"][1]["role"], "music");
        assert_eq!(json["id"], metadata.id);
    }
}
