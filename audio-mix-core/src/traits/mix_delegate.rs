use crate::models::error::MixError;
use crate::models::mix_result::MixResult;
use crate::models::state::{EngineState, MixStatus};

/// Event delegate for mix session notifications.
///
/// All methods are called from whichever thread drives the session.
/// Implementations should marshal to a UI thread if needed.
pub trait MixDelegate: Send + Sync {
    /// Called when the engine state changes.
    fn on_state_changed(&self, state: &EngineState);

    /// Called with a coarse, human-readable progress step.
    fn on_status(&self, status: &MixStatus);

    /// Called when loading or mixing fails.
    fn on_error(&self, error: &MixError);

    /// Called when a mix completes.
    fn on_mix_finished(&self, result: &MixResult);
}
