pub mod assembler;
pub mod export;
pub mod pcm;

pub use assembler::{AudioAssembler, DEFAULT_SEGMENT_SILENCE};
pub use export::{AudioExporter, OutputFormat};
pub use pcm::{resample_linear, PcmAudio, PcmSpec, SPEECH_SAMPLE_RATE};
