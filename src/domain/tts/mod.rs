pub mod error;
pub mod service;

pub use error::TtsServiceError;
pub use service::{TtsService, TtsServiceApi, TtsSettings};

use crate::domain::audio::OutputFormat;
use crate::domain::language::{LanguageSegment, LanguageTag};
use serde::Serialize;
use std::path::PathBuf;

/// Language and text of one synthesized segment, as reported to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentDescriptor {
    pub language: LanguageTag,
    pub text: String,
}

impl From<&LanguageSegment> for SegmentDescriptor {
    fn from(segment: &LanguageSegment) -> Self {
        Self {
            language: segment.language,
            text: segment.text.clone(),
        }
    }
}

impl std::fmt::Display for SegmentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.language, self.text)
    }
}

/// A written audio file and the segments it was built from
#[derive(Debug, Clone, Serialize)]
pub struct OutputArtifact {
    pub location: PathBuf,
    pub format: OutputFormat,
    pub size_bytes: u64,
    pub duration_ms: u64,
    pub descriptors: Vec<SegmentDescriptor>,
}

impl OutputArtifact {
    pub fn with_descriptors(mut self, descriptors: Vec<SegmentDescriptor>) -> Self {
        self.descriptors = descriptors;
        self
    }
}
