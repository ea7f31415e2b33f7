use std::collections::HashSet;

/// Words the user recently mistyped, queued for re-presentation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MissedWordSet {
    words: HashSet<String>,
}

impl MissedWordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the word was already queued
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.words.insert(word.into())
    }

    /// Remove and return up to `count` words, in no particular order
    pub fn drain_up_to(&mut self, count: usize) -> Vec<String> {
        let taken: Vec<String> = self.words.iter().take(count).cloned().collect();
        for word in &taken {
            self.words.remove(word);
        }
        taken
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
