use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use super::analysis::DreamAnalysis;
use super::lexicon::Lexicon;
use super::sentiment::SentimentOracle;
use super::text;

pub const SENTIMENT_WEIGHT: f64 = 0.6;
pub const KEYWORD_WEIGHT: f64 = 0.4;
pub const DEFAULT_ENERGY: f64 = 0.1;
pub const CONFIDENCE_BASE: f64 = 0.5;
pub const LENGTH_WEIGHT: f64 = 0.3;
pub const KEYWORD_COUNT_WEIGHT: f64 = 0.2;
pub const LENGTH_SATURATION: usize = 50;
pub const KEYWORD_SATURATION: usize = 5;
pub const MAX_KEYWORDS: usize = 10;

/// Empirical constants of the scoring formulas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Share of the oracle polarity in the emotional score
    pub sentiment_weight: f64,
    /// Share of the lexicon balance in the emotional score
    pub keyword_weight: f64,
    /// Energy score when no dynamic or static word appears
    pub default_energy: f64,
    pub confidence_base: f64,
    pub length_weight: f64,
    pub keyword_count_weight: f64,
    /// Word count at which the length factor saturates
    pub length_saturation: usize,
    /// Keyword count at which the keyword factor saturates
    pub keyword_saturation: usize,
    /// Capped at [`MAX_KEYWORDS`]
    pub max_keywords: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sentiment_weight: SENTIMENT_WEIGHT,
            keyword_weight: KEYWORD_WEIGHT,
            default_energy: DEFAULT_ENERGY,
            confidence_base: CONFIDENCE_BASE,
            length_weight: LENGTH_WEIGHT,
            keyword_count_weight: KEYWORD_COUNT_WEIGHT,
            length_saturation: LENGTH_SATURATION,
            keyword_saturation: KEYWORD_SATURATION,
            max_keywords: MAX_KEYWORDS,
        }
    }
}

/// Turns dream text into a [`DreamAnalysis`]
#[derive(Clone)]
pub struct DreamScorer {
    lexicon: Arc<Lexicon>,
    oracle: Arc<dyn SentimentOracle>,
    weights: ScoringWeights,
}

impl DreamScorer {
    pub fn new(lexicon: Arc<Lexicon>, oracle: Arc<dyn SentimentOracle>, weights: ScoringWeights) -> Self {
        Self {
            lexicon,
            oracle,
            weights,
        }
    }

    /// Score a dream. Total for any input, including empty text.
    pub fn score(&self, dream_text: &str) -> DreamAnalysis {
        let normalized = text::normalize(dream_text);
        let sentiment = self.oracle.polarity(&normalized).clamp(-1.0, 1.0);
        let words: HashSet<&str> = text::tokens(&normalized).collect();

        let upper_downer = self.emotional_score(&words, sentiment);
        let static_dynamic = self.energy_score(&words);
        let keywords = self.extract_keywords(&normalized);
        let confidence = self.confidence(&normalized, keywords.len());

        DreamAnalysis::new(upper_downer, static_dynamic, confidence, keywords)
    }

    fn emotional_score(&self, words: &HashSet<&str>, sentiment: f64) -> f64 {
        let upper = count_in(words, &self.lexicon.uplifting);
        let downer = count_in(words, &self.lexicon.downbeat);

        let keyword_score = balance(upper, downer).unwrap_or(0.0);
        let score = self.weights.sentiment_weight * sentiment + self.weights.keyword_weight * keyword_score;
        score.clamp(-1.0, 1.0)
    }

    fn energy_score(&self, words: &HashSet<&str>) -> f64 {
        let dynamic = count_in(words, &self.lexicon.dynamic);
        let still = count_in(words, &self.lexicon.static_words);

        match balance(dynamic, still) {
            Some(score) => score.clamp(-1.0, 1.0),
            None => self.weights.default_energy.clamp(-1.0, 1.0),
        }
    }

    fn extract_keywords(&self, normalized: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        text::tokens(normalized)
            .filter(|word| self.lexicon.contains(word))
            .filter(|word| seen.insert(*word))
            .take(self.weights.max_keywords.min(MAX_KEYWORDS))
            .map(str::to_string)
            .collect()
    }

    fn confidence(&self, normalized: &str, keyword_count: usize) -> f64 {
        let w = &self.weights;
        let word_count = text::tokens(normalized).count();

        let length_factor = saturate(word_count, w.length_saturation);
        let keyword_factor = saturate(keyword_count, w.keyword_saturation);

        (w.confidence_base + w.length_weight * length_factor + w.keyword_count_weight * keyword_factor)
            .min(1.0)
    }
}

fn count_in(words: &HashSet<&str>, set: &std::collections::BTreeSet<String>) -> usize {
    words.iter().filter(|w| set.contains(**w)).count()
}

/// `(a - b) / (a + b)`, or `None` when both are zero
fn balance(a: usize, b: usize) -> Option<f64> {
    let total = a + b;
    if total == 0 {
        return None;
    }
    Some((a as f64 - b as f64) / total as f64)
}

fn saturate(count: usize, cap: usize) -> f64 {
    if cap == 0 {
        return 1.0;
    }
    (count as f64 / cap as f64).min(1.0)
}
