pub mod audio_models;
pub mod config;
pub mod error;
pub mod mix_result;
pub mod state;
