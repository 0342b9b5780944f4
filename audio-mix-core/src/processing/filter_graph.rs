//! The fixed speech-over-music recipe handed to the engine.
//!
//! Every value here is part of the output contract: speech at unity gain,
//! music at 0.4, `amix` over two inputs lasting as long as the longest one,
//! encoded with libmp3lame at 192 kbps.

use std::fmt;

/// Output length policy of `amix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationPolicy {
    Longest,
    Shortest,
    First,
}

impl fmt::Display for DurationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Longest => "longest",
            Self::Shortest => "shortest",
            Self::First => "first",
        })
    }
}

/// Namespace for the mix recipe. Not configurable.
pub struct MixRecipe;

impl MixRecipe {
    pub const SPEECH_GAIN: f32 = 1.0;
    pub const MUSIC_GAIN: f32 = 0.4;
    pub const DURATION: DurationPolicy = DurationPolicy::Longest;
    pub const OUTPUT_CODEC: &'static str = "libmp3lame";
    pub const OUTPUT_BITRATE_KBPS: u32 = 192;

    /// Engine-side name the speech input is written under.
    pub const SPEECH_FILE: &'static str = "speech.mp3";
    /// Engine-side name the music input is written under.
    pub const MUSIC_FILE: &'static str = "music.mp3";
    /// Engine-side name the mix is read back from.
    pub const OUTPUT_FILE: &'static str = "output.mp3";

    /// `[0:a]volume=1.0[a1];[1:a]volume=0.4[a2];[a1][a2]amix=inputs=2:duration=longest`
    pub fn filter_graph() -> String {
        format!(
            "[0:a]volume={:.1}[a1];[1:a]volume={:.1}[a2];[a1][a2]amix=inputs=2:duration={}",
            Self::SPEECH_GAIN,
            Self::MUSIC_GAIN,
            Self::DURATION
        )
    }

    /// Full argument list, without the program name.
    pub fn command_args() -> Vec<String> {
        vec![
            "-i".into(),
            Self::SPEECH_FILE.into(),
            "-i".into(),
            Self::MUSIC_FILE.into(),
            "-filter_complex".into(),
            Self::filter_graph(),
            "-c:a".into(),
            Self::OUTPUT_CODEC.into(),
            "-b:a".into(),
            format!("{}k", Self::OUTPUT_BITRATE_KBPS),
            Self::OUTPUT_FILE.into(),
        ]
    }

    /// Names of every file the recipe touches inside the engine.
    pub fn engine_files() -> [&'static str; 3] {
        [Self::SPEECH_FILE, Self::MUSIC_FILE, Self::OUTPUT_FILE]
    }
}
