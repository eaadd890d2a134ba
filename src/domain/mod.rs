pub mod audio;
pub mod language;
pub mod speech;
pub mod text;
pub mod tts;
