pub mod analysis;
pub mod dream;
pub mod error;
pub mod lexicon;
pub mod scorer;
pub mod sentiment;
pub mod store;
pub mod text;

pub use analysis::{Coordinate, DreamAnalysis, Quadrant};
pub use dream::DreamRecord;
pub use error::{DreamError, Result};
pub use lexicon::Lexicon;
pub use scorer::{DreamScorer, ScoringWeights};
pub use sentiment::{LexiconSentiment, SentimentOracle};
pub use store::{DreamAverages, DreamStore, InMemoryDreamStore, UserStats};
