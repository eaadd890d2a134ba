pub mod preprocessor;
pub mod segmenter;

pub use preprocessor::{PreprocessorOptions, TextPreprocessor};
pub use segmenter::{SegmenterOptions, Sentence, SentenceSegmenter, DEFAULT_ABBREVIATIONS};
