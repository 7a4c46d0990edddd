use log::info;
use rustc_hash::FxHashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordListError {
    #[error("malformed word {word:?} on line {line}: only letters are allowed")]
    MalformedWord { line: usize, word: String },
}

/// Parses a flat word list, one word per line.
///
/// Entries are trimmed and uppercased; blank lines are skipped. Anything with
/// a non-alphabetic ASCII character is rejected outright rather than passed
/// on as a slot candidate.
pub fn parse_word_list(input: &str) -> Result<Vec<String>, WordListError> {
    let mut words = Vec::new();
    for (index, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(WordListError::MalformedWord {
                line: index + 1,
                word: trimmed.to_string(),
            });
        }
        words.push(trimmed.to_ascii_uppercase());
    }
    Ok(words)
}

/// Dictionary words bucketed by length.
///
/// Building the index is the only per-word-list cost; one index serves any
/// number of solves and only needs rebuilding when the word list changes.
/// Buckets are sorted and deduplicated, so domain construction sees each
/// word once and in a stable order.
#[derive(Debug, Clone, Default)]
pub struct WordIndex {
    by_length: FxHashMap<usize, Vec<String>>,
}

impl WordIndex {
    pub fn build(words: Vec<String>) -> WordIndex {
        let mut by_length: FxHashMap<usize, Vec<String>> = FxHashMap::default();
        for word in words {
            let word = word.to_ascii_uppercase();
            by_length.entry(word.len()).or_default().push(word);
        }
        for bucket in by_length.values_mut() {
            bucket.sort();
            bucket.dedup();
        }

        let index = WordIndex { by_length };
        info!(
            "indexed {} words across {} lengths",
            index.word_count(),
            index.by_length.len()
        );
        index
    }

    pub fn of_length(&self, len: usize) -> &[String] {
        self.by_length
            .get(&len)
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    pub fn word_count(&self) -> usize {
        self.by_length.values().map(|bucket| bucket.len()).sum()
    }
}

/// Small built-in list used by the CLI when no word list is supplied.
pub fn fallback_words() -> Vec<String> {
    [
        "APPLE",
        "BANANA",
        "CHERRY",
        "DATE",
        "ELDER",
        "FIG",
        "GRAPE",
        "HONEY",
        "INDIGO",
        "JELLY",
        "KIWI",
        "LEMON",
        "MANGO",
        "NECTAR",
        "ORANGE",
        "PAPAYA",
        "QUINCE",
        "RASPBERRY",
        "STRAWBERRY",
        "TANGERINE",
    ]
    .iter()
    .map(|word| word.to_string())
    .collect()
}
