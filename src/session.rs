use crate::config::Config;
use crate::error::{Result, TrainerError};
use crate::language::{
    AdaptiveSelector, MissedWordSet, RandomSelector, SelectionPool, WordCorpus, WordSelector,
};
use crate::letter_stats::LetterSnapshot;
use crate::stats::{CompletedWord, StatsRegistry};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Mutable practice state, only ever touched under the trainer lock
#[derive(Debug)]
pub struct SessionState {
    pub registry: StatsRegistry,
    pub missed: MissedWordSet,
    rng: StdRng,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            registry: StatsRegistry::new(),
            missed: MissedWordSet::new(),
            rng: StdRng::from_entropy(),
        }
    }
}

/// Service context behind the HTTP layer.
///
/// The corpus is shared read-only. Statistics and missed words sit behind a
/// single lock so every read sees fully applied reports.
pub struct Trainer {
    corpus: Arc<WordCorpus>,
    selector: Box<dyn WordSelector>,
    state: Mutex<SessionState>,
}

impl Trainer {
    pub fn new(corpus: WordCorpus, selector: Box<dyn WordSelector>) -> Self {
        Self {
            corpus: Arc::new(corpus),
            selector,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn from_config(corpus: WordCorpus, config: &Config) -> Self {
        // Choose the appropriate selector based on configuration
        let selector: Box<dyn WordSelector> = if config.random_words {
            Box::new(RandomSelector)
        } else {
            Box::new(AdaptiveSelector::new(config.selection))
        };
        Self::new(corpus, selector)
    }

    /// Make every draw reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.state.get_mut().rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn corpus(&self) -> &WordCorpus {
        &self.corpus
    }

    pub async fn random_word(&self) -> Result<String> {
        let mut state = self.state.lock().await;
        self.corpus
            .random_word(&mut state.rng)
            .map(str::to_string)
            .ok_or_else(|| TrainerError::validation("word corpus is empty"))
    }

    pub async fn word_batch(&self, count: i64) -> Result<Vec<String>> {
        let count = usize::try_from(count)
            .map_err(|_| TrainerError::validation(format!("batch size {count} is negative")))?;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let pool = SelectionPool {
            corpus: &self.corpus,
            registry: &state.registry,
            missed: &mut state.missed,
        };
        Ok(self.selector.select_words(pool, count, &mut state.rng))
    }

    pub async fn report_missed_word(&self, word: &str) -> Result<()> {
        let word = word.trim().to_lowercase();
        if word.is_empty() {
            return Err(TrainerError::validation("missed word is blank"));
        }

        let mut state = self.state.lock().await;
        if state.missed.insert(word.clone()) {
            debug!("Queued missed word '{word}' ({} pending)", state.missed.len());
        }
        Ok(())
    }

    pub async fn report_completed_word(&self, report: &CompletedWord) -> Result<()> {
        let mut state = self.state.lock().await;
        state
            .registry
            .record_completed_word(report.word_count, report.duration_ms, &report.letters)?;
        info!(
            "Recorded {} letters, wpm now {}",
            report.letters.len(),
            state.registry.formatted_wpm()
        );
        Ok(())
    }

    pub async fn current_wpm(&self) -> String {
        self.state.lock().await.registry.formatted_wpm()
    }

    pub async fn letter_stats(&self) -> Vec<LetterSnapshot> {
        self.state.lock().await.registry.snapshot()
    }

    pub async fn pending_missed_words(&self) -> usize {
        self.state.lock().await.missed.len()
    }
}
