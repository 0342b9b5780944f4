use super::wav_format;

/// Container recognised from the first bytes of an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    Wav,
    Ogg,
    Mp3,
    Unknown,
}

impl ContainerFormat {
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Identify MP3, WAV or OGG content by signature.
///
/// MP3 is accepted either with a leading ID3v2 tag or starting directly
/// on an MPEG audio frame sync (11 set bits).
pub fn detect_container(data: &[u8]) -> ContainerFormat {
    if wav_format::has_wav_signature(data) {
        return ContainerFormat::Wav;
    }
    if data.starts_with(b"OggS") {
        return ContainerFormat::Ogg;
    }
    if data.starts_with(b"ID3") {
        return ContainerFormat::Mp3;
    }
    if data.len() >= 2 && data[0] == 0xFF && (data[1] & 0xE0) == 0xE0 {
        return ContainerFormat::Mp3;
    }
    ContainerFormat::Unknown
}
