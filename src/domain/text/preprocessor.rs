use html2text::from_read;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreprocessorOptions {
    /// Keep non-blank lines apart so the segmenter can split on them
    pub preserve_line_breaks: bool,
    /// Convert HTML input to plain text before normalizing
    pub strip_markup: bool,
}

/// Normalizes raw input before sentence segmentation.
#[derive(Debug, Clone, Default)]
pub struct TextPreprocessor {
    options: PreprocessorOptions,
}

impl TextPreprocessor {
    pub fn new(options: PreprocessorOptions) -> Self {
        Self { options }
    }

    /// Collapse whitespace runs (including newlines) into single spaces and trim.
    ///
    /// With `preserve_line_breaks`, whitespace is collapsed per line, blank lines are
    /// dropped and the remaining lines are joined with `\n`.
    pub fn preprocess(&self, text: &str) -> String {
        let plain_text = if self.options.strip_markup {
            from_read(text.as_bytes(), usize::MAX)
        } else {
            text.to_string()
        };

        if self.options.preserve_line_breaks {
            plain_text
                .lines()
                .map(collapse_whitespace)
                .filter(|line| !line.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            collapse_whitespace(&plain_text)
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
