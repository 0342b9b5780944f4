//! # audio-mix-server
//!
//! HTTP front end for the speech-over-music mixer.
//!
//! ```text
//! POST /api/merge-audio   multipart: speech, music  →  audio/mpeg attachment
//! GET  /health            engine name and ffmpeg version
//! ```
//!
//! Every request gets its own `FfmpegProcessEngine` and scratch directory;
//! the engine runs on tokio's blocking pool.

pub mod config;
pub mod routes;
pub mod state;
pub mod upload;

pub use config::ServerConfig;
pub use routes::{router, run_server, serve};
pub use state::{AppState, EngineFactory, EngineInfo};
