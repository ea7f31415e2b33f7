pub mod corpus;
pub mod missed;
pub mod selector;

// Re-export the main types for convenience
pub use corpus::WordCorpus;
pub use missed::MissedWordSet;
pub use selector::{AdaptiveSelector, RandomSelector, SelectionPolicy, SelectionPool, WordSelector};
