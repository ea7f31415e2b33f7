use crate::error::{Result, TrainerError};
use crate::letter_stats::{LetterSnapshot, LetterStats};
use crate::util::format_wpm;
use serde::{Deserialize, Serialize};

pub const ALPHABET: std::ops::RangeInclusive<char> = 'a'..='z';

/// Timing for one typed letter of a completed word
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LetterSample {
    pub letter: char,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(rename = "miss")]
    pub was_miss: bool,
}

impl LetterSample {
    pub fn new(letter: char, duration_ms: u64, was_miss: bool) -> Self {
        Self {
            letter,
            duration_ms,
            was_miss,
        }
    }
}

/// Telemetry sent by the client after each finished word
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWord {
    pub word_count: u32,
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    #[serde(rename = "word_letters_data")]
    pub letters: Vec<LetterSample>,
}

/// Ascending `(letter, value)` ranking over the whole alphabet
pub type Ranking = Vec<(char, u64)>;

/// All per-letter statistics plus the rankings derived from them
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRegistry {
    letters: Vec<LetterStats>,
    occurrence_rank: Ranking,
    error_rank: Ranking,
    words_per_minute: f64,
}

impl Default for StatsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsRegistry {
    pub fn new() -> Self {
        Self {
            letters: ALPHABET.map(LetterStats::new).collect(),
            occurrence_rank: ALPHABET.map(|c| (c, 0)).collect(),
            error_rank: ALPHABET.map(|c| (c, 0)).collect(),
            words_per_minute: 0.0,
        }
    }

    /// Ingest one completed word.
    ///
    /// The whole report is validated before anything is touched, so a rejected
    /// report leaves the registry unchanged.
    pub fn record_completed_word(
        &mut self,
        word_count: u32,
        duration_ms: u64,
        samples: &[LetterSample],
    ) -> Result<()> {
        if duration_ms == 0 {
            return Err(TrainerError::validation("word duration must be positive"));
        }
        if samples.is_empty() {
            return Err(TrainerError::validation("letter sample list is empty"));
        }
        let normalized = samples
            .iter()
            .map(|sample| {
                normalize_letter(sample.letter)
                    .map(|letter| LetterSample { letter, ..*sample })
            })
            .collect::<Result<Vec<_>>>()?;

        self.words_per_minute = word_count as f64 / (duration_ms as f64 / 60_000.0);

        for sample in normalized {
            let stats = &mut self.letters[letter_index(sample.letter)];
            stats.record_duration(sample.duration_ms);
            if sample.was_miss {
                stats.record_miss();
            }
            let (count, freq) = (stats.sample_count() as u64, stats.error_frequency());
            rerank(&mut self.occurrence_rank, sample.letter, count);
            rerank(&mut self.error_rank, sample.letter, freq);
        }
        Ok(())
    }

    /// Letters by accepted sample count, fewest first
    pub fn occurrence_rank(&self) -> &[(char, u64)] {
        &self.occurrence_rank
    }

    /// Letters by samples-per-miss, lowest first (0 means never missed)
    pub fn error_rank(&self) -> &[(char, u64)] {
        &self.error_rank
    }

    pub fn words_per_minute(&self) -> f64 {
        self.words_per_minute
    }

    pub fn formatted_wpm(&self) -> String {
        format_wpm(self.words_per_minute)
    }

    pub fn letter(&self, letter: char) -> Option<&LetterStats> {
        normalize_letter(letter)
            .ok()
            .map(|c| &self.letters[letter_index(c)])
    }

    pub fn snapshot(&self) -> Vec<LetterSnapshot> {
        self.letters.iter().map(LetterStats::snapshot).collect()
    }
}

fn normalize_letter(letter: char) -> Result<char> {
    if letter.is_ascii_alphabetic() {
        Ok(letter.to_ascii_lowercase())
    } else {
        Err(TrainerError::validation(format!(
            "'{letter}' is not a letter between a and z"
        )))
    }
}

fn letter_index(letter: char) -> usize {
    (letter as u8 - b'a') as usize
}

// Full stable re-sort; ties keep their previous relative order
fn rerank(ranking: &mut Ranking, letter: char, value: u64) {
    if let Some(entry) = ranking.iter_mut().find(|(c, _)| *c == letter) {
        entry.1 = value;
    }
    ranking.sort_by_key(|&(_, v)| v);
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn letters_of(ranking: &[(char, u64)]) -> String {
        ranking.iter().map(|(c, _)| *c).collect()
    }

    fn assert_full_ascending(ranking: &[(char, u64)]) {
        assert_eq!(ranking.len(), 26);
        let mut seen: Vec<char> = ranking.iter().map(|(c, _)| *c).collect();
        seen.sort_unstable();
        assert_eq!(seen, ALPHABET.collect::<Vec<_>>());
        assert!(ranking.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_fresh_registry() {
        let registry = StatsRegistry::new();
        assert_eq!(registry.formatted_wpm(), "00");
        assert_eq!(letters_of(registry.occurrence_rank()), "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(letters_of(registry.error_rank()), "abcdefghijklmnopqrstuvwxyz");
        assert_eq!(registry.snapshot().len(), 26);
    }

    #[test]
    fn test_single_sample_sets_wpm_and_count() {
        let mut registry = StatsRegistry::new();
        registry
            .record_completed_word(1, 60_000, &[LetterSample::new('a', 500, false)])
            .unwrap();

        assert_eq!(registry.formatted_wpm(), "01");
        let a = registry.letter('a').unwrap();
        assert_eq!(a.sample_count(), 1);
        assert_eq!(a.error_frequency(), 0);
        assert_eq!(registry.occurrence_rank().last(), Some(&('a', 1)));
    }

    #[test]
    fn test_missed_letter_sorts_after_untouched_letters() {
        let mut registry = StatsRegistry::new();
        registry
            .record_completed_word(1, 30_000, &[LetterSample::new('e', 150, true)])
            .unwrap();

        assert_eq!(registry.letter('e').unwrap().error_frequency(), 1);
        assert_eq!(letters_of(registry.error_rank()), "abcdfghijklmnopqrstuvwxyze");
        assert_eq!(registry.error_rank().last(), Some(&('e', 1)));
    }

    #[test]
    fn test_error_rank_orders_worst_accuracy_first() {
        let mut registry = StatsRegistry::new();
        // 'x': 4 samples / 1 miss = 4, 'y': 2 samples / 2 misses = 1
        let mut samples = vec![LetterSample::new('x', 100, true)];
        samples.extend((0..3).map(|_| LetterSample::new('x', 100, false)));
        samples.push(LetterSample::new('y', 100, true));
        samples.push(LetterSample::new('y', 100, true));
        registry.record_completed_word(3, 10_000, &samples).unwrap();

        let nonzero: Vec<_> = registry
            .error_rank()
            .iter()
            .filter(|(_, freq)| *freq > 0)
            .copied()
            .collect();
        assert_eq!(nonzero, vec![('y', 1), ('x', 4)]);
        assert_full_ascending(registry.error_rank());
    }

    #[test]
    fn test_implausible_samples_do_not_rank() {
        let mut registry = StatsRegistry::new();
        registry
            .record_completed_word(
                1,
                5_000,
                &[LetterSample::new('q', 2_000, false), LetterSample::new('w', 120, false)],
            )
            .unwrap();

        let q = registry.letter('q').unwrap();
        assert!(q.durations().is_empty());
        assert!(q.moving_averages().is_empty());
        assert!(registry.occurrence_rank().contains(&('q', 0)));
        assert_eq!(registry.occurrence_rank().last(), Some(&('w', 1)));
    }

    #[test]
    fn test_wpm_is_overwritten_not_averaged() {
        let mut registry = StatsRegistry::new();
        let sample = [LetterSample::new('a', 100, false)];
        registry.record_completed_word(10, 60_000, &sample).unwrap();
        assert_eq!(registry.words_per_minute(), 10.0);

        registry.record_completed_word(3, 30_000, &sample).unwrap();
        assert_eq!(registry.words_per_minute(), 6.0);
        assert_eq!(registry.formatted_wpm(), "06");
    }

    #[test]
    fn test_uppercase_letters_are_folded() {
        let mut registry = StatsRegistry::new();
        registry
            .record_completed_word(1, 1_000, &[LetterSample::new('T', 100, false)])
            .unwrap();
        assert_eq!(registry.letter('t').unwrap().sample_count(), 1);
    }

    #[test]
    fn test_rejected_report_leaves_state_untouched() {
        let mut registry = StatsRegistry::new();
        let before = registry.clone();

        let result = registry.record_completed_word(
            1,
            1_000,
            &[LetterSample::new('a', 100, false), LetterSample::new('?', 100, true)],
        );
        assert_matches!(result, Err(TrainerError::Validation(_)));
        assert_eq!(registry, before);

        assert_matches!(
            registry.record_completed_word(1, 1_000, &[]),
            Err(TrainerError::Validation(_))
        );
        assert_matches!(
            registry.record_completed_word(1, 0, &[LetterSample::new('a', 100, false)]),
            Err(TrainerError::Validation(_))
        );
        assert_eq!(registry, before);
    }

    #[test]
    fn test_rankings_stay_complete_after_many_updates() {
        let mut registry = StatsRegistry::new();
        for (i, letter) in "thequickbrownfoxjumpsoverthelazydog".chars().enumerate() {
            let sample = LetterSample::new(letter, 80 + i as u64, i % 3 == 0);
            registry.record_completed_word(1, 2_000, &[sample]).unwrap();
            assert_full_ascending(registry.occurrence_rank());
            assert_full_ascending(registry.error_rank());
        }
    }

    #[test]
    fn test_snapshot_is_idempotent() {
        let mut registry = StatsRegistry::new();
        registry
            .record_completed_word(2, 4_000, &[LetterSample::new('r', 210, true)])
            .unwrap();
        assert_eq!(registry.snapshot(), registry.snapshot());
    }

    #[test]
    fn test_completed_word_wire_format() {
        let json = r#"{
            "word_count": 3,
            "duration": 4200,
            "word_letters_data": [
                {"letter": "c", "duration": 130, "miss": false},
                {"letter": "a", "duration": 95, "miss": true}
            ]
        }"#;
        let word: CompletedWord = serde_json::from_str(json).unwrap();
        assert_eq!(word.word_count, 3);
        assert_eq!(word.duration_ms, 4200);
        assert_eq!(word.letters[1], LetterSample::new('a', 95, true));
    }
}
