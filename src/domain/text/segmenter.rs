use std::collections::HashSet;

/// Tokens that end in a period without ending the sentence.
/// Stored lowercase and without the final period.
pub const DEFAULT_ABBREVIATIONS: &[&str] = &[
    // Titles and honorifics
    "mr", "mrs", "ms", "dr", "prof", "jr", "sr", "st", "rev", "hon",
    // Organisations
    "inc", "ltd", "co", "corp", "dept", "univ", "assn", "bros", "vs", "v",
    // Months
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    // Times, places and latinisms
    "a.m", "p.m", "u.s", "u.k", "i.e", "e.g", "etc",
];

/// A trimmed, non-empty span of input text with its position in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct SegmenterOptions {
    abbreviations: HashSet<String>,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        Self {
            abbreviations: DEFAULT_ABBREVIATIONS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl SegmenterOptions {
    /// Add abbreviations on top of the defaults. A trailing period is optional.
    pub fn with_abbreviations<I, S>(mut self, abbreviations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.abbreviations.extend(
            abbreviations
                .into_iter()
                .map(|a| a.as_ref().trim_end_matches('.').to_lowercase()),
        );
        self
    }
}

/// Splits normalized text into sentences for both Latin and Japanese punctuation.
#[derive(Debug, Clone, Default)]
pub struct SentenceSegmenter {
    options: SegmenterOptions,
}

impl SentenceSegmenter {
    pub fn new(options: SegmenterOptions) -> Self {
        Self { options }
    }

    /// Split text into ordered sentences.
    ///
    /// Empty or whitespace-only input yields a single empty sentence.
    pub fn segment(&self, text: &str) -> Vec<Sentence> {
        if text.trim().is_empty() {
            return vec![Sentence {
                index: 0,
                text: String::new(),
            }];
        }

        let chars: Vec<char> = text.chars().collect();
        let mut spans: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];

            if ch == '\n' || ch == '\r' {
                flush(&mut current, &mut spans);
                i += 1;
                continue;
            }

            current.push(ch);

            if is_japanese_terminator(ch) {
                i += 1;
                while i < chars.len() && (is_japanese_terminator(chars[i]) || is_closing(chars[i]))
                {
                    current.push(chars[i]);
                    i += 1;
                }
                flush(&mut current, &mut spans);
                continue;
            }

            if is_latin_terminator(ch) {
                let mut end = i + 1;
                while end < chars.len() && is_latin_terminator(chars[end]) {
                    current.push(chars[end]);
                    end += 1;
                }
                let run_end = end;
                while end < chars.len() && is_closing(chars[end]) {
                    current.push(chars[end]);
                    end += 1;
                }

                if self.ends_sentence(&chars, i, run_end, end) {
                    flush(&mut current, &mut spans);
                }
                i = end;
                continue;
            }

            i += 1;
        }
        flush(&mut current, &mut spans);

        spans
            .into_iter()
            .enumerate()
            .map(|(index, text)| Sentence { index, text })
            .collect()
    }

    /// Decide whether the terminator run `chars[start..run_end]` (followed by closing
    /// punctuation up to `end`) closes a sentence.
    fn ends_sentence(&self, chars: &[char], start: usize, run_end: usize, end: usize) -> bool {
        let next = match chars.get(end) {
            None => return true,
            Some(&c) => c,
        };

        // "3.14", "e.g", "example.com" and friends
        if !(next.is_whitespace() || !next.is_ascii()) {
            return false;
        }

        let only_periods = chars[start..run_end].iter().all(|&c| c == '.');
        if !only_periods {
            return true;
        }

        if run_end - start == 1 && end == run_end && self.is_abbreviation(chars, start) {
            return false;
        }

        // A lowercase continuation means the period belonged to the word
        let next_visible = chars[end..].iter().find(|c| !c.is_whitespace());
        !matches!(next_visible, Some(c) if c.is_ascii_lowercase())
    }

    fn is_abbreviation(&self, chars: &[char], period: usize) -> bool {
        let mut token_start = period;
        while token_start > 0 && !chars[token_start - 1].is_whitespace() {
            token_start -= 1;
        }
        let token: String = chars[token_start..period].iter().collect();
        let token = token
            .trim_start_matches(|c: char| is_opening(c))
            .to_lowercase();

        !token.is_empty() && self.options.abbreviations.contains(&token)
    }
}

fn flush(current: &mut String, spans: &mut Vec<String>) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        spans.push(sentence.to_string());
    }
    current.clear();
}

fn is_latin_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_japanese_terminator(c: char) -> bool {
    matches!(c, '。' | '！' | '？')
}

fn is_closing(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '”' | '’' | '」' | '』' | '）')
}

fn is_opening(c: char) -> bool {
    matches!(c, '"' | '\'' | '(' | '[' | '“' | '‘' | '「' | '『' | '（')
}
