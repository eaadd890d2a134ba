use super::LanguageTag;
use crate::domain::text::Sentence;
use lingua::{Language, LanguageDetectorBuilder};
use serde::Deserialize;
use std::ops::Range;

/// First codepoint of the Hiragana block. Anything at or above it is treated as Japanese script.
pub const JAPANESE_SCRIPT_START: char = '\u{3040}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Any Japanese-script character makes the text Japanese
    #[default]
    Script,
    /// Text written in a single script follows that script; text mixing Latin and Japanese
    /// script goes to whichever language dominates
    Statistical,
}

/// A maximal run of consecutive sentences sharing one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSegment {
    pub language: LanguageTag,
    pub text: String,
    /// Source indices of the sentences in this segment
    pub sentences: Range<usize>,
}

fn is_japanese_script(c: char) -> bool {
    c >= JAPANESE_SCRIPT_START
}

pub struct LanguageDetector {
    mode: DetectionMode,
    statistical: Option<lingua::LanguageDetector>,
}

impl LanguageDetector {
    pub fn new(mode: DetectionMode) -> Self {
        // Only languages the pipeline can voice
        let statistical = match mode {
            DetectionMode::Script => None,
            DetectionMode::Statistical => Some(
                LanguageDetectorBuilder::from_languages(&[Language::English, Language::Japanese])
                    .build(),
            ),
        };

        Self { mode, statistical }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// Tag a piece of text. Never fails: anything undecidable is English.
    pub fn tag(&self, text: &str) -> LanguageTag {
        let has_japanese = text.chars().any(is_japanese_script);
        if !has_japanese {
            return LanguageTag::English;
        }

        let detector = match &self.statistical {
            Some(detector) if text.chars().any(|c| c.is_ascii_alphabetic()) => detector,
            _ => return LanguageTag::Japanese,
        };

        match detector.detect_language_of(text) {
            Some(language) => {
                let tag = LanguageTag::from_lingua(language);
                tracing::debug!(
                    text_length = text.len(),
                    language = %tag,
                    "Mixed-script text tagged by dominant language"
                );
                tag
            }
            None => {
                tracing::debug!(
                    text_length = text.len(),
                    "Could not detect dominant language, keeping Japanese"
                );
                LanguageTag::Japanese
            }
        }
    }

    pub fn tag_all(&self, sentences: Vec<Sentence>) -> Vec<(Sentence, LanguageTag)> {
        sentences
            .into_iter()
            .map(|sentence| {
                let language = self.tag(&sentence.text);
                (sentence, language)
            })
            .collect()
    }

    /// Run-length group tagged sentences: a new segment starts exactly when the tag changes.
    pub fn group(tagged: Vec<(Sentence, LanguageTag)>) -> Vec<LanguageSegment> {
        let mut segments: Vec<LanguageSegment> = Vec::new();

        for (sentence, language) in tagged {
            match segments.last_mut() {
                Some(current) if current.language == language => {
                    current.text.push(' ');
                    current.text.push_str(&sentence.text);
                    current.sentences.end = sentence.index + 1;
                }
                _ => segments.push(LanguageSegment {
                    language,
                    text: sentence.text,
                    sentences: sentence.index..sentence.index + 1,
                }),
            }
        }

        segments
    }

    /// Merge adjacent segments that share a tag. Grouped output passes through unchanged.
    pub fn regroup(segments: Vec<LanguageSegment>) -> Vec<LanguageSegment> {
        let mut merged: Vec<LanguageSegment> = Vec::with_capacity(segments.len());

        for segment in segments {
            match merged.last_mut() {
                Some(current) if current.language == segment.language => {
                    current.text.push(' ');
                    current.text.push_str(&segment.text);
                    current.sentences.end = segment.sentences.end;
                }
                _ => merged.push(segment),
            }
        }

        merged
    }
}
