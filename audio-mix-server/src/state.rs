use std::sync::Arc;

use tokio::sync::Semaphore;

use audio_mix_core::{EngineState, MixDelegate, MixEngine, MixError, MixResult, MixSession, MixStatus};
use audio_mix_ffmpeg::{binary, FfmpegProcessEngine};

use crate::config::ServerConfig;

/// Builds a fresh, unloaded engine for one request.
pub type EngineFactory = Arc<dyn Fn() -> Box<dyn MixEngine> + Send + Sync>;

/// Session type the handlers drive.
pub type Session = MixSession<Box<dyn MixEngine>>;

/// What `/health` reports about the engine.
#[derive(Debug, Clone)]
pub struct EngineInfo {
    pub name: String,
    pub version: Option<String>,
}

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<ServerConfig>,
    pub engine: EngineInfo,
    engine_factory: EngineFactory,
    limiter: Option<Arc<Semaphore>>,
}

impl AppState {
    pub fn new(cfg: ServerConfig, engine: EngineInfo, engine_factory: EngineFactory) -> Self {
        let limiter = cfg.max_concurrent_mixes.map(|n| Arc::new(Semaphore::new(n)));
        Self {
            cfg: Arc::new(cfg),
            engine,
            engine_factory,
            limiter,
        }
    }

    /// State backed by the configured ffmpeg binary.
    ///
    /// A missing binary is logged here but only fails requests, so the
    /// server still starts and `/health` can report it.
    pub fn with_ffmpeg(cfg: ServerConfig) -> Self {
        let ffmpeg = cfg.ffmpeg_config();
        let version = match binary::probe_version(&ffmpeg.binary) {
            Ok(v) => {
                log::info!("Using ffmpeg {} ({})", v, ffmpeg.binary.display());
                Some(v)
            }
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };

        let factory: EngineFactory =
            Arc::new(move || -> Box<dyn MixEngine> { Box::new(FfmpegProcessEngine::new(ffmpeg.clone())) });
        let info = EngineInfo {
            name: "ffmpeg".to_string(),
            version,
        };
        Self::new(cfg, info, factory)
    }

    /// New session over a new engine, not yet loaded.
    pub fn new_session(&self) -> Result<Session, MixError> {
        let mut session = MixSession::new((self.engine_factory)(), self.cfg.mix_configuration())?;
        session.set_delegate(Arc::new(LogDelegate));
        Ok(session)
    }

    pub fn limiter(&self) -> Option<Arc<Semaphore>> {
        self.limiter.clone()
    }
}

/// MixDelegate that writes session events to the log.
pub struct LogDelegate;

impl MixDelegate for LogDelegate {
    fn on_state_changed(&self, state: &EngineState) {
        log::debug!("Engine {}", state.name());
    }

    fn on_status(&self, status: &MixStatus) {
        log::debug!("{}", status);
    }

    // the handler logs the error it turns into a response
    fn on_error(&self, error: &MixError) {
        log::debug!("Session error: {}", error);
    }

    fn on_mix_finished(&self, result: &MixResult) {
        log::info!(
            "Mix {} ready: {} ({} bytes, sha256 {})",
            result.metadata.id,
            result.file_name,
            result.size_bytes(),
            result.checksum
        );
        match result.metadata.to_json() {
            Ok(json) => log::debug!("Mix metadata: {}", json),
            Err(e) => log::warn!("{}", e),
        }
    }
}
