use super::{corpus::WordCorpus, missed::MissedWordSet};
use crate::stats::StatsRegistry;
use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything a selector may draw from for one batch
pub struct SelectionPool<'a> {
    pub corpus: &'a WordCorpus,
    pub registry: &'a StatsRegistry,
    pub missed: &'a mut MissedWordSet,
}

/// Trait for different word selection strategies
pub trait WordSelector: Send + Sync {
    /// Select at most `count` words. Short pools give short batches.
    fn select_words(
        &self,
        pool: SelectionPool<'_>,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String>;
}

/// Knobs for the adaptive batch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// missed words recalled per batch
    pub recall_count: usize,
    /// times each recalled word is repeated
    pub recall_repeats: usize,
    /// slots reserved for error-prone letters
    pub error_slots: usize,
    pub words_per_letter: usize,
    pub shuffle: bool,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            recall_count: 2,
            recall_repeats: 2,
            error_slots: 4,
            words_per_letter: 2,
            shuffle: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, strum_macros::Display)]
enum Stage {
    #[strum(serialize = "error-targeted")]
    ErrorTargeted,
    #[strum(serialize = "least-practiced")]
    LeastPracticed,
}

/// Uniform draw from the whole corpus, ignoring statistics
pub struct RandomSelector;

impl WordSelector for RandomSelector {
    fn select_words(
        &self,
        pool: SelectionPool<'_>,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        pool.corpus
            .words()
            .choose_multiple(&mut *rng, count)
            .cloned()
            .collect()
    }
}

/// Missed-word recall, then weak letters, then least practiced letters
#[derive(Debug, Clone, Default)]
pub struct AdaptiveSelector {
    policy: SelectionPolicy,
}

impl AdaptiveSelector {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    fn recall_missed(&self, missed: &mut MissedWordSet, count: usize) -> Vec<String> {
        let repeats = self.policy.recall_repeats.max(1);
        // Only drain what fits once repeated
        let recalled = missed.drain_up_to(self.policy.recall_count.min(count / repeats));
        if !recalled.is_empty() {
            debug!("recall: {}", recalled.iter().join(", "));
        }

        let mut words = Vec::with_capacity(recalled.len() * repeats);
        for _ in 0..repeats {
            words.extend(recalled.iter().cloned());
        }
        words
    }

    /// Append words for each ranked letter, skipping words already in `batch`
    fn draw_for_letters<'r>(
        &self,
        stage: Stage,
        corpus: &WordCorpus,
        ranking: impl Iterator<Item = &'r (char, u64)>,
        mut budget: usize,
        batch: &mut Vec<String>,
        rng: &mut dyn RngCore,
    ) {
        for &(letter, value) in ranking {
            if budget == 0 {
                break;
            }
            let requested = self.policy.words_per_letter.min(budget);
            let fresh: Vec<&String> = corpus
                .words_containing(letter)
                .iter()
                .filter(|word| !batch.contains(*word))
                .collect();
            let picked: Vec<String> = fresh
                .choose_multiple(&mut *rng, requested)
                .map(|word| (*word).clone())
                .collect();
            debug!("{stage} '{letter}' ({value}): {}", picked.iter().join(", "));
            batch.extend(picked);
            // Budget follows what was asked for, not what the pool had
            budget -= requested;
        }
    }
}

impl WordSelector for AdaptiveSelector {
    fn select_words(
        &self,
        pool: SelectionPool<'_>,
        count: usize,
        rng: &mut dyn RngCore,
    ) -> Vec<String> {
        let mut words = self.recall_missed(pool.missed, count);

        let error_budget = count.saturating_sub(words.len()).min(self.policy.error_slots);
        let error_ranked = pool.registry.error_rank().iter().filter(|(_, freq)| *freq > 0);
        self.draw_for_letters(
            Stage::ErrorTargeted,
            pool.corpus,
            error_ranked,
            error_budget,
            &mut words,
            rng,
        );

        let practice_budget = count.saturating_sub(words.len());
        self.draw_for_letters(
            Stage::LeastPracticed,
            pool.corpus,
            pool.registry.occurrence_rank().iter(),
            practice_budget,
            &mut words,
            rng,
        );

        if self.policy.shuffle {
            words.shuffle(&mut *rng);
        }
        info!("Selected {} of {} words: {}", words.len(), count, words.iter().join(" "));
        words
    }
}
