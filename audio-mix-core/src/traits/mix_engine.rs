use crate::models::error::MixError;

/// Capability interface of an external media engine.
///
/// The engine is a black box that owns a small named-file store and can run
/// one command at a time against it. Implemented by:
/// - `FfmpegProcessEngine` (an `ffmpeg` binary over a scratch directory)
/// - any in-browser or embedded engine exposing the same five operations
///
/// Engines are not re-entrant; `MixSession` serialises access.
pub trait MixEngine: Send {
    /// Short identifier for logs (e.g. "ffmpeg").
    fn name(&self) -> &str;

    /// Initialise the engine. Called once before any other operation.
    fn load(&mut self) -> Result<(), MixError>;

    /// Store `data` under `name` in the engine's file store.
    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), MixError>;

    /// Run one command. `args` exclude the program name.
    fn exec(&mut self, args: &[String]) -> Result<(), MixError>;

    /// Fetch the contents stored under `name`.
    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, MixError>;

    /// Remove `name` from the file store. Missing files are not an error.
    fn delete_file(&mut self, name: &str) -> Result<(), MixError>;

    /// Release every resource held by the engine. Safe to call more than once.
    fn release(&mut self);
}

impl<E: MixEngine + ?Sized> MixEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn load(&mut self) -> Result<(), MixError> {
        (**self).load()
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), MixError> {
        (**self).write_file(name, data)
    }

    fn exec(&mut self, args: &[String]) -> Result<(), MixError> {
        (**self).exec(args)
    }

    fn read_file(&mut self, name: &str) -> Result<Vec<u8>, MixError> {
        (**self).read_file(name)
    }

    fn delete_file(&mut self, name: &str) -> Result<(), MixError> {
        (**self).delete_file(name)
    }

    fn release(&mut self) {
        (**self).release()
    }
}
