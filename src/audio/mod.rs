pub mod loader;
pub mod transcode;
pub mod wav;

pub use loader::{AudioBuffer, AudioLoader, load_audio};
