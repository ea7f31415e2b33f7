use crate::error::{Result, TrainerError};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Immutable set of practice words plus lookup indices
#[derive(Debug, Clone, Default)]
pub struct WordCorpus {
    words: Vec<String>,
    by_lead: HashMap<char, Vec<String>>,
    by_len: HashMap<usize, Vec<String>>,
    by_letter: HashMap<char, Vec<String>>,
}

impl WordCorpus {
    /// Read a newline-delimited word list.
    ///
    /// Lines are trimmed and lowercased. Blank lines and anything that is not
    /// purely ASCII letters are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents =
            fs::read_to_string(path).map_err(|source| TrainerError::DictionaryUnreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let corpus = Self::from_words(contents.lines());
        if corpus.is_empty() {
            return Err(TrainerError::EmptyDictionary {
                path: path.to_path_buf(),
            });
        }

        info!(
            "Loaded {} words from {}",
            corpus.len(),
            path.display()
        );
        Ok(corpus)
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = WordCorpus::default();
        let mut skipped = 0usize;

        for raw in words {
            let word = raw.as_ref().trim().to_lowercase();
            if word.is_empty() {
                continue;
            }
            if !word.chars().all(|c| c.is_ascii_lowercase()) {
                skipped += 1;
                continue;
            }
            corpus.insert(word);
        }

        if skipped > 0 {
            debug!("Skipped {skipped} dictionary entries with non-letter characters");
        }
        corpus
    }

    fn insert(&mut self, word: String) {
        // Guarded by from_words: non-empty, lowercase ascii
        let lead = word.as_bytes()[0] as char;
        self.by_lead.entry(lead).or_default().push(word.clone());
        self.by_len.entry(word.len()).or_default().push(word.clone());

        // A word is listed once per distinct letter so sampling stays distinct
        let letters: BTreeSet<char> = word.chars().collect();
        for letter in letters {
            self.by_letter.entry(letter).or_default().push(word.clone());
        }

        self.words.push(word);
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Uniform draw over the whole corpus
    pub fn random_word<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.words.choose(rng).map(String::as_str)
    }

    pub fn words_containing(&self, letter: char) -> &[String] {
        self.by_letter
            .get(&letter)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn words_starting_with(&self, letter: char) -> &[String] {
        self.by_lead
            .get(&letter)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn words_of_length(&self, len: usize) -> &[String] {
        self.by_len.get(&len).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_corpus() -> WordCorpus {
        WordCorpus::from_words(["apple", "Banana", "cab", "  dog ", "", "it's", "be"])
    }

    #[test]
    fn test_from_words_normalizes_and_filters() {
        let corpus = create_test_corpus();
        assert_eq!(corpus.words(), &["apple", "banana", "cab", "dog", "be"]);
        assert_eq!(corpus.len(), 5);
    }

    #[test]
    fn test_words_containing_lists_each_word_once() {
        let corpus = create_test_corpus();
        assert_eq!(corpus.words_containing('p'), &["apple"]);
        assert_eq!(corpus.words_containing('a'), &["apple", "banana", "cab"]);
        assert_eq!(corpus.words_containing('b'), &["banana", "cab", "be"]);
        assert!(corpus.words_containing('z').is_empty());
    }

    #[test]
    fn test_words_starting_with() {
        let corpus = create_test_corpus();
        assert_eq!(corpus.words_starting_with('b'), &["banana", "be"]);
        assert!(corpus.words_starting_with('x').is_empty());
    }

    #[test]
    fn test_words_of_length() {
        let corpus = create_test_corpus();
        assert_eq!(corpus.words_of_length(3), &["cab", "dog"]);
        assert_eq!(corpus.words_of_length(2), &["be"]);
        assert!(corpus.words_of_length(10).is_empty());
    }

    #[test]
    fn test_random_word_comes_from_corpus() {
        let corpus = create_test_corpus();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let word = corpus.random_word(&mut rng).unwrap();
            assert!(corpus.words().iter().any(|w| w == word));
        }
    }

    #[test]
    fn test_random_word_empty_corpus() {
        let corpus = WordCorpus::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(corpus.random_word(&mut rng), None);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "the\nquick\nBrown\n\nfox").unwrap();

        let corpus = WordCorpus::load(file.path()).unwrap();
        assert_eq!(corpus.words(), &["the", "quick", "brown", "fox"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = WordCorpus::load(dir.path().join("nope.txt"));
        assert_matches!(result, Err(TrainerError::DictionaryUnreadable { .. }));
    }

    #[test]
    fn test_load_empty_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "\n\n123\n").unwrap();

        let result = WordCorpus::load(file.path());
        assert_matches!(result, Err(TrainerError::EmptyDictionary { .. }));
    }
}
