pub mod detector;

pub use detector::{DetectionMode, LanguageDetector, LanguageSegment};

use lingua::Language;
use serde::{Deserialize, Serialize};

/// Languages the synthesis pipeline distinguishes between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageTag {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ja")]
    Japanese,
}

impl LanguageTag {
    /// Get the ISO 639-1 code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::English => "en",
            LanguageTag::Japanese => "ja",
        }
    }

    /// BCP-47 locale used by backends that want a region
    pub fn locale(&self) -> &'static str {
        match self {
            LanguageTag::English => "en-US",
            LanguageTag::Japanese => "ja-JP",
        }
    }

    /// Convert lingua Language to LanguageTag
    pub fn from_lingua(language: Language) -> Self {
        match language {
            Language::Japanese => LanguageTag::Japanese,
            _ => LanguageTag::English,
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
