//! Minimal 16-bit PCM WAV support.
//!
//! Enough to recognise WAV uploads and to build known-duration clips for
//! exercising engines. Nothing here decodes audio.

/// Bytes before the sample data in the canonical PCM layout.
pub const WAV_HEADER_SIZE: usize = 44;

/// Shape of a 16-bit PCM stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub sample_rate: u32,
    pub channels: u16,
}

impl WavSpec {
    const BITS_PER_SAMPLE: u16 = 16;

    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }

    /// Bytes per frame (one sample for every channel).
    pub fn block_align(&self) -> u16 {
        self.channels * Self::BITS_PER_SAMPLE / 8
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate * self.block_align() as u32
    }

    /// RIFF header for `data_len` bytes of samples: `RIFF` / `WAVE`, a
    /// 16-byte `fmt ` chunk with format code 1, then the `data` chunk size.
    pub fn header(&self, data_len: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(WAV_HEADER_SIZE);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(data_len + WAV_HEADER_SIZE as u32 - 8).to_le_bytes());
        out.extend_from_slice(b"WAVE");

        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&self.channels.to_le_bytes());
        out.extend_from_slice(&self.sample_rate.to_le_bytes());
        out.extend_from_slice(&self.byte_rate().to_le_bytes());
        out.extend_from_slice(&self.block_align().to_le_bytes());
        out.extend_from_slice(&Self::BITS_PER_SAMPLE.to_le_bytes());

        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out
    }

    /// Complete WAV file from interleaved samples in `[-1.0, 1.0]`.
    pub fn encode(&self, samples: &[f32]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut wav = self.header(data_len);
        wav.reserve(data_len as usize);
        for &s in samples {
            let quantised = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            wav.extend_from_slice(&quantised.to_le_bytes());
        }
        wav
    }
}

/// Whether `data` starts with a RIFF/WAVE signature.
pub fn has_wav_signature(data: &[u8]) -> bool {
    matches!(data, [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..])
}

/// Encode interleaved samples as a 16-bit PCM WAV file.
pub fn encode_pcm16_wav(samples: &[f32], sample_rate: u32, channels: u16) -> Vec<u8> {
    WavSpec { sample_rate, channels }.encode(samples)
}

/// Mono sine tone.
pub fn sine_tone(frequency_hz: f32, duration_secs: f32, sample_rate: u32, amplitude: f32) -> Vec<f32> {
    let step = std::f32::consts::TAU * frequency_hz / sample_rate as f32;
    (0..frame_count(duration_secs, sample_rate))
        .map(|n| amplitude * (step * n as f32).sin())
        .collect()
}

/// Mono digital silence.
pub fn silence(duration_secs: f32, sample_rate: u32) -> Vec<f32> {
    vec![0.0; frame_count(duration_secs, sample_rate)]
}

fn frame_count(duration_secs: f32, sample_rate: u32) -> usize {
    (duration_secs * sample_rate as f32).round() as usize
}
