pub mod mix_delegate;
pub mod mix_engine;
