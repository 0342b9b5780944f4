use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::audio_models::{AudioInput, MixRequest};
use crate::models::config::MixConfiguration;
use crate::models::error::MixError;
use crate::models::mix_result::{MixMetadata, MixResult, OUTPUT_CONTENT_TYPE};
use crate::models::state::{EngineState, MixStatus};
use crate::processing::filter_graph::MixRecipe;
use crate::processing::media_sniff;
use crate::storage::checksum;
use crate::traits::mix_delegate::MixDelegate;
use crate::traits::mix_engine::MixEngine;

/// Owns one engine and runs the speech/music recipe on it.
///
/// The engine is loaded lazily and at most once. A session can be shared
/// across threads (`Arc<MixSession<_>>`); only one mix is in flight at a
/// time and competing calls are rejected with `EngineBusy` instead of
/// queueing.
///
/// Data flow of one mix:
/// ```text
/// [speech] ─ write speech.mp3 ─┐
///                              ├→ exec(recipe) → read output.mp3 → [MixResult]
/// [music]  ─ write music.mp3  ─┘
/// ```
/// The three engine files are deleted after every mix, successful or not.
pub struct MixSession<E: MixEngine> {
    engine: Mutex<E>,
    config: MixConfiguration,
    state: Mutex<EngineState>,
    delegate: Option<Arc<dyn MixDelegate>>,
}

impl<E: MixEngine> MixSession<E> {
    pub fn new(engine: E, config: MixConfiguration) -> Result<Self, MixError> {
        config.validate().map_err(MixError::Configuration)?;
        Ok(Self {
            engine: Mutex::new(engine),
            config,
            state: Mutex::new(EngineState::Uninitialized),
            delegate: None,
        })
    }

    pub fn set_delegate(&mut self, delegate: Arc<dyn MixDelegate>) {
        self.delegate = Some(delegate);
    }

    pub fn state(&self) -> EngineState {
        self.state.lock().clone()
    }

    pub fn config(&self) -> &MixConfiguration {
        &self.config
    }

    /// Load the engine. Transitions: uninitialized → loading → ready | failed.
    ///
    /// Returns immediately once ready. A failed load is final: later calls
    /// return the same error without touching the engine again.
    pub fn load(&self) -> Result<(), MixError> {
        {
            let mut state = self.state.lock();
            match &*state {
                EngineState::Ready | EngineState::Busy => return Ok(()),
                EngineState::Loading => return Err(MixError::EngineBusy),
                EngineState::Failed(e) => return Err(e.clone()),
                EngineState::Uninitialized => *state = EngineState::Loading,
            }
        }
        self.notify_state(&EngineState::Loading);
        self.notify_status(MixStatus::LoadingEngine);

        let loaded = {
            let mut engine = self.engine.lock();
            engine.load().map(|()| engine.name().to_string())
        };

        match loaded {
            Ok(name) => {
                log::info!("Audio engine '{}' loaded", name);
                self.set_state(EngineState::Ready);
                Ok(())
            }
            Err(e) => {
                let e = match e {
                    MixError::EngineLoad(_) => e,
                    other => MixError::EngineLoad(other.to_string()),
                };
                log::error!("Error loading audio engine: {}", e);
                self.set_state(EngineState::Failed(e.clone()));
                self.notify_error(&e);
                Err(e)
            }
        }
    }

    /// Mix speech over music. Transitions: ready → busy → ready.
    ///
    /// Inputs are validated before the engine is touched, so a missing or
    /// rejected input never reaches it.
    pub fn mix(&self, request: MixRequest) -> Result<MixResult, MixError> {
        let result = self.mix_inner(request);
        match &result {
            Ok(mix) => {
                if let Some(ref delegate) = self.delegate {
                    delegate.on_mix_finished(mix);
                }
            }
            Err(e) => self.notify_error(e),
        }
        result
    }

    /// Release the engine. The session can be loaded again afterwards.
    pub fn release(&self) {
        self.engine.lock().release();
        self.set_state(EngineState::Uninitialized);
    }

    // --- Internal helpers ---

    fn mix_inner(&self, request: MixRequest) -> Result<MixResult, MixError> {
        let (speech, music) = request.into_pair()?;
        self.validate_input(&speech)?;
        self.validate_input(&music)?;

        self.begin_mix()?;

        let output = {
            let mut engine = self.engine.lock();
            let output = self.run_recipe(&mut *engine, &speech, &music);
            Self::delete_engine_files(&mut *engine);
            output
        };

        self.set_state(EngineState::Ready);

        let data = output?;
        if data.is_empty() {
            return Err(MixError::MixExecution("engine produced an empty output file".into()));
        }

        let result = MixResult {
            checksum: checksum::sha256_hex(&data),
            file_name: self.config.output_naming.file_name(),
            content_type: OUTPUT_CONTENT_TYPE,
            metadata: MixMetadata::new(&speech, &music),
            data,
        };
        log::info!(
            "Mixed {} ({} bytes) over {} ({} bytes) into {} ({} bytes)",
            speech.file_name,
            speech.size_bytes(),
            music.file_name,
            music.size_bytes(),
            result.file_name,
            result.size_bytes()
        );
        Ok(result)
    }

    fn validate_input(&self, input: &AudioInput) -> Result<(), MixError> {
        if self.config.enforce_media_types && !input.has_supported_media_type() {
            return Err(MixError::UnsupportedMediaType {
                role: input.role,
                media_type: input.media_type.clone(),
            });
        }
        if self.config.sniff_content && !media_sniff::detect_container(&input.data).is_supported() {
            return Err(MixError::UnsupportedMediaType {
                role: input.role,
                media_type: format!("{} (unrecognised content)", input.media_type),
            });
        }
        Ok(())
    }

    fn begin_mix(&self) -> Result<(), MixError> {
        {
            let mut state = self.state.lock();
            match &*state {
                EngineState::Ready => *state = EngineState::Busy,
                EngineState::Busy | EngineState::Loading => return Err(MixError::EngineBusy),
                EngineState::Uninitialized => return Err(MixError::EngineNotReady),
                EngineState::Failed(e) => return Err(e.clone()),
            }
        }
        self.notify_state(&EngineState::Busy);
        Ok(())
    }

    fn run_recipe(&self, engine: &mut E, speech: &AudioInput, music: &AudioInput) -> Result<Vec<u8>, MixError> {
        self.notify_status(MixStatus::LoadingSpeech);
        engine.write_file(MixRecipe::SPEECH_FILE, &speech.data)?;

        self.notify_status(MixStatus::LoadingMusic);
        engine.write_file(MixRecipe::MUSIC_FILE, &music.data)?;

        self.notify_status(MixStatus::Merging);
        engine.exec(&MixRecipe::command_args())?;

        self.notify_status(MixStatus::PreparingDownload);
        engine.read_file(MixRecipe::OUTPUT_FILE)
    }

    fn delete_engine_files(engine: &mut E) {
        for name in MixRecipe::engine_files() {
            if let Err(e) = engine.delete_file(name) {
                log::warn!("Error deleting engine file {}: {}", name, e);
            }
        }
    }

    fn set_state(&self, new_state: EngineState) {
        {
            let mut s = self.state.lock();
            *s = new_state.clone();
        }
        self.notify_state(&new_state);
    }

    fn notify_state(&self, state: &EngineState) {
        log::debug!("Engine state: {}", state.name());
        if let Some(ref delegate) = self.delegate {
            delegate.on_state_changed(state);
        }
    }

    fn notify_status(&self, status: MixStatus) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_status(&status);
        }
    }

    fn notify_error(&self, error: &MixError) {
        if let Some(ref delegate) = self.delegate {
            delegate.on_error(error);
        }
    }
}

impl<E: MixEngine> Drop for MixSession<E> {
    fn drop(&mut self) {
        self.engine.get_mut().release();
    }
}
