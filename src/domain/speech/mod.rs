pub mod dispatcher;
pub mod voice;

pub use dispatcher::{SynthesisDispatcher, SynthesizedSegment, DEFAULT_SYNTHESIS_CONCURRENCY};
pub use voice::{BackendKind, VoiceConfig};
