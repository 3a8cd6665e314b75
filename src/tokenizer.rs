//! Whitespace tokenizer with stop-word filtering.
//!
//! Tokens are lower-cased, whitespace-delimited substrings of a message body.
//! Punctuation stays attached (`"hello,"` is its own token); a token survives
//! only if it is not a stop word and contains at least one ASCII letter.

use std::collections::HashSet;

use phf::phf_set;

/// Common function words and emoticons excluded from word counts.
static BUILTIN_STOP_WORDS: phf::Set<&'static str> = phf_set! {
    "a", "about", "after", "again", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "but", "by",
    "can", "could", "did", "do", "does", "doing", "for", "from", "had",
    "has", "have", "having", "he", "her", "here", "hers", "him", "his",
    "how", "i", "i'm", "if", "in", "into", "is", "it", "it's", "its",
    "just", "me", "my", "no", "not", "of", "off", "on", "or", "our",
    "out", "over", "she", "so", "than", "that", "the", "their", "them",
    "then", "there", "these", "they", "this", "those", "to", "too", "u",
    "up", "was", "we", "were", "what", "when", "where", "which", "who",
    "why", "will", "with", "would", "you", "your",
    ":)", ":(", ":-)", ":-(", ":d", ":p", ";)", ";-)", "<3", "xd", ":/",
};

/// The set of tokens a [`Tokenizer`] discards.
#[derive(Debug, Clone, Default)]
pub enum StopWords {
    #[default]
    Builtin,
    Custom(HashSet<String>),
}

impl StopWords {
    /// Builtin words plus `extra`, or only `extra` when `replace_builtin` is set.
    pub fn from_config<I, S>(extra: I, replace_builtin: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: HashSet<String> = extra
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();

        if !replace_builtin {
            if words.is_empty() {
                return StopWords::Builtin;
            }
            words.extend(BUILTIN_STOP_WORDS.iter().map(|w| w.to_string()));
        }

        StopWords::Custom(words)
    }

    pub fn contains(&self, token: &str) -> bool {
        match self {
            StopWords::Builtin => BUILTIN_STOP_WORDS.contains(token),
            StopWords::Custom(words) => words.contains(token),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            StopWords::Builtin => BUILTIN_STOP_WORDS.len(),
            StopWords::Custom(words) => words.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stop_words: StopWords,
}

impl Tokenizer {
    pub fn new(stop_words: StopWords) -> Self {
        Self { stop_words }
    }

    pub fn stop_words(&self) -> &StopWords {
        &self.stop_words
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .filter(|token| !self.stop_words.contains(token))
            .filter(|token| token.chars().any(|c| c.is_ascii_alphabetic()))
            .map(str::to_string)
            .collect()
    }
}
