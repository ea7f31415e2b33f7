use crate::util::{mean_ms, tail};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Average characters per word used for the words-per-minute conversion
pub const CHARS_PER_WORD: f64 = 5.1;

/// Slowest typing speed still treated as real typing
pub const MIN_PLAUSIBLE_WPM: f64 = 20.0;

/// Samples at or above this are pauses, not keystrokes (~588ms)
pub const MAX_ALLOWED_LETTER_DURATION_MS: f64 = 60_000.0 / (MIN_PLAUSIBLE_WPM * CHARS_PER_WORD);

/// Number of recent samples (and recent means) kept for averaging
pub const MOVING_AVERAGE_WINDOW: usize = 50;

/// Rolling timing and accuracy figures for a single letter
#[derive(Debug, Clone, PartialEq)]
pub struct LetterStats {
    letter: char,
    durations: Vec<u64>,
    miss_count: u64,
    moving_averages: Vec<f64>,
    error_frequency: u64,
}

/// Point-in-time view of a letter, as served to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterSnapshot {
    pub letter: char,
    pub durations: Vec<u64>,
    #[serde(rename = "duration_moving_averages")]
    pub moving_averages: Vec<f64>,
    pub mean: Option<f64>,
    #[serde(rename = "miss")]
    pub miss_count: u64,
    #[serde(rename = "error_freq")]
    pub error_frequency: u64,
    #[serde(rename = "occurrences")]
    pub sample_count: usize,
}

impl LetterStats {
    pub fn new(letter: char) -> Self {
        Self {
            letter,
            durations: Vec::new(),
            miss_count: 0,
            moving_averages: Vec::new(),
            error_frequency: 0,
        }
    }

    pub fn letter(&self) -> char {
        self.letter
    }

    /// Returns whether the sample was kept
    pub fn record_duration(&mut self, duration_ms: u64) -> bool {
        if duration_ms as f64 >= MAX_ALLOWED_LETTER_DURATION_MS {
            debug!(
                "Dropping implausible {}ms sample for '{}'",
                duration_ms, self.letter
            );
            return false;
        }

        self.durations.push(duration_ms);
        if let Some(mean) = self.average_duration() {
            self.moving_averages.push(mean);
            if self.moving_averages.len() > MOVING_AVERAGE_WINDOW {
                let excess = self.moving_averages.len() - MOVING_AVERAGE_WINDOW;
                self.moving_averages.drain(..excess);
            }
        }
        self.update_error_frequency();
        true
    }

    pub fn record_miss(&mut self) {
        self.miss_count += 1;
        self.update_error_frequency();
    }

    /// Mean over the most recent window of accepted samples
    pub fn average_duration(&self) -> Option<f64> {
        mean_ms(tail(&self.durations, MOVING_AVERAGE_WINDOW))
    }

    // Samples per miss; left untouched while there are no misses
    fn update_error_frequency(&mut self) {
        if self.miss_count == 0 {
            return;
        }
        self.error_frequency = self.durations.len() as u64 / self.miss_count;
    }

    pub fn durations(&self) -> &[u64] {
        &self.durations
    }

    pub fn moving_averages(&self) -> &[f64] {
        &self.moving_averages
    }

    pub fn miss_count(&self) -> u64 {
        self.miss_count
    }

    pub fn error_frequency(&self) -> u64 {
        self.error_frequency
    }

    pub fn sample_count(&self) -> usize {
        self.durations.len()
    }

    pub fn snapshot(&self) -> LetterSnapshot {
        LetterSnapshot {
            letter: self.letter,
            durations: self.durations.clone(),
            moving_averages: self.moving_averages.clone(),
            mean: self.average_duration(),
            miss_count: self.miss_count,
            error_frequency: self.error_frequency,
            sample_count: self.sample_count(),
        }
    }
}
