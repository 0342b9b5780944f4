#![allow(dead_code)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Stand-in for ffmpeg: concatenates the two inputs into the output and
/// logs its arguments and working directory next to itself.
const FAKE_FFMPEG: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
  echo "ffmpeg version 0.0-fake Copyright (c) test"
  exit 0
fi
here="$(dirname "$0")"
printf '%s\n' "$@" > "$here/args.log"
pwd > "$here/cwd.log"
if grep -q corrupt speech.mp3; then
  echo "speech.mp3: Invalid data found when processing input" >&2
  exit 1
fi
for last; do :; done
cat speech.mp3 music.mp3 > "$last"
"#;

/// Write the fake binary into `dir` and wait until it can be executed.
#[cfg(unix)]
pub fn install_fake_ffmpeg(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("ffmpeg");
    fs::write(&path, FAKE_FFMPEG).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();

    // A parallel test forking while the script was open for writing makes
    // exec fail with ETXTBSY for a moment.
    for _ in 0..50 {
        match Command::new(&path).arg("-version").output() {
            Ok(output) if output.status.success() => return path,
            _ => thread::sleep(Duration::from_millis(20)),
        }
    }
    panic!("fake ffmpeg at {} never became executable", path.display());
}

/// The real ffmpeg, if installed with the MP3 encoder.
pub fn real_ffmpeg() -> Option<PathBuf> {
    let output = Command::new("ffmpeg")
        .args(["-hide_banner", "-encoders"])
        .output()
        .ok()?;
    if output.status.success() && String::from_utf8_lossy(&output.stdout).contains("libmp3lame") {
        Some(PathBuf::from("ffmpeg"))
    } else {
        eprintln!("ffmpeg with libmp3lame not found, skipping");
        None
    }
}

/// Entries directly inside `dir`.
pub fn entries(dir: &Path) -> Vec<PathBuf> {
    match fs::read_dir(dir) {
        Ok(read) => read.map(|e| e.unwrap().path()).collect(),
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => panic!("reading {}: {}", dir.display(), e),
    }
}

pub struct Decoded {
    pub sample_rate: u32,
    pub channels: usize,
    pub samples: Vec<f32>,
}

impl Decoded {
    pub fn duration_secs(&self) -> f64 {
        (self.samples.len() / self.channels) as f64 / self.sample_rate as f64
    }

    /// Interleaved samples between two timestamps.
    pub fn window(&self, start_secs: f64, end_secs: f64) -> &[f32] {
        let frame = |t: f64| ((t * self.sample_rate as f64) as usize * self.channels).min(self.samples.len());
        &self.samples[frame(start_secs)..frame(end_secs)]
    }
}

pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Decode an MP3 buffer to interleaved f32.
pub fn decode_mp3(data: &[u8]) -> Decoded {
    let cursor = std::io::Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());
    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .expect("probe mp3");
    let mut format = probed.format;
    let track = format.default_track().expect("audio track");
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .expect("mp3 decoder");

    let mut sample_rate = codec_params.sample_rate.unwrap_or(0);
    let mut channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);
    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(e) => panic!("reading packet: {e}"),
        };
        if packet.track_id() != track_id {
            continue;
        }
        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count();
                let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buffer.copy_interleaved_ref(decoded);
                samples.extend_from_slice(buffer.samples());
            }
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(e) => panic!("decoding: {e}"),
        }
    }

    Decoded {
        sample_rate,
        channels,
        samples,
    }
}
