use std::fmt;

/// Word and character counts derived from the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub words: usize,
    pub characters: usize,
}

impl StatusSnapshot {
    pub fn from_text(text: &str) -> Self {
        StatusSnapshot {
            words: count_words(text),
            characters: count_characters(text),
        }
    }
}

// Word separators: space, tab, newline, vertical tab, form feed, carriage
// return. Other Unicode spaces (NBSP, em space) stay inside a word.
const SEPARATORS: [char; 6] = [' ', '\t', '\n', '\x0B', '\x0C', '\r'];

/// Runs of non-separator text once every char up to U+0020 is trimmed from
/// both ends; trimmed-empty text has zero words.
pub fn count_words(text: &str) -> usize {
    text.trim_matches(|c: char| c <= ' ')
        .split(SEPARATORS)
        .filter(|word| !word.is_empty())
        .count()
}

/// Length in UTF-16 code units, so a character outside the Basic
/// Multilingual Plane counts as two.
pub fn count_characters(text: &str) -> usize {
    text.encode_utf16().count()
}

impl fmt::Display for StatusSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Words: {} | Characters: {}", self.words, self.characters)
    }
}
