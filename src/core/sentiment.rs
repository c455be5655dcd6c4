use std::collections::{HashMap, HashSet};

use super::text;

/// Source of sentiment polarity for normalized text.
///
/// Implementations must be pure and return a value in [-1, 1].
pub trait SentimentOracle: Send + Sync {
    fn polarity(&self, text: &str) -> f64;
}

const POLARITIES: &[(&str, f64)] = &[
    ("happy", 0.8),
    ("happily", 0.8),
    ("joy", 0.8),
    ("joyful", 0.8),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("beautiful", 0.85),
    ("wonderful", 1.0),
    ("amazing", 0.6),
    ("great", 0.8),
    ("good", 0.7),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("best", 1.0),
    ("free", 0.4),
    ("golden", 0.3),
    ("bright", 0.7),
    ("warm", 0.6),
    ("safe", 0.5),
    ("glad", 0.5),
    ("delighted", 0.7),
    ("excited", 0.4),
    ("fun", 0.3),
    ("energetic", 0.2),
    ("gentle", 0.3),
    ("peaceful", 0.25),
    ("peacefully", 0.25),
    ("calm", 0.3),
    ("serene", 0.5),
    ("blissful", 0.8),
    ("euphoric", 0.8),
    ("radiant", 0.6),
    ("laughing", 0.3),
    ("successful", 0.75),
    ("clear", 0.1),
    ("sad", -0.5),
    ("dark", -0.15),
    ("scared", -0.5),
    ("scary", -0.5),
    ("afraid", -0.6),
    ("frightened", -0.6),
    ("terrified", -0.8),
    ("alone", -0.2),
    ("lonely", -0.4),
    ("lost", -0.2),
    ("angry", -0.5),
    ("bad", -0.7),
    ("terrible", -1.0),
    ("horrible", -1.0),
    ("awful", -1.0),
    ("painful", -0.7),
    ("hurt", -0.4),
    ("broken", -0.4),
    ("empty", -0.1),
    ("hopeless", -0.8),
    ("cold", -0.6),
    ("dead", -0.2),
    ("evil", -1.0),
    ("ugly", -0.7),
    ("worried", -0.4),
    ("anxious", -0.4),
    ("nervous", -0.3),
    ("trapped", -0.4),
    ("creepy", -0.5),
    ("sick", -0.7),
    ("tired", -0.4),
    ("miserable", -1.0),
    ("weird", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("quite", 1.1),
    ("totally", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nobody", "nothing", "cannot", "without", "didn", "don", "doesn",
    "wasn", "weren", "isn", "aren", "couldn", "wouldn",
];

/// Negated words flip sign and lose half their weight
const NEGATION_FACTOR: f64 = -0.5;

/// How many preceding tokens a negation reaches
const NEGATION_WINDOW: usize = 2;

/// Word-table polarity: the mean of the polarities of every scored word,
/// adjusted by a directly preceding intensifier and nearby negations.
/// Text with no scored words is neutral (0.0).
#[derive(Debug, Clone)]
pub struct LexiconSentiment {
    polarities: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::with_table(POLARITIES.iter().map(|(w, p)| (w.to_string(), *p)).collect())
    }
}

impl LexiconSentiment {
    /// Use a custom word table with the built-in intensifiers and negations
    pub fn with_table(polarities: HashMap<String, f64>) -> Self {
        Self {
            polarities,
            intensifiers: INTENSIFIERS
                .iter()
                .map(|(w, f)| (w.to_string(), *f))
                .collect(),
            negations: NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl SentimentOracle for LexiconSentiment {
    fn polarity(&self, text: &str) -> f64 {
        let words: Vec<&str> = text::tokens(text).collect();
        let mut scores = Vec::new();

        for (i, word) in words.iter().enumerate() {
            let Some(&base) = self.polarities.get(*word) else {
                continue;
            };
            let mut score = base;

            if let Some(prev) = i.checked_sub(1).map(|p| words[p]) {
                if let Some(factor) = self.intensifiers.get(prev) {
                    score *= factor;
                }
            }

            let window_start = i.saturating_sub(NEGATION_WINDOW);
            if words[window_start..i]
                .iter()
                .any(|w| self.negations.contains(*w))
            {
                score *= NEGATION_FACTOR;
            }

            scores.push(score.clamp(-1.0, 1.0));
        }

        if scores.is_empty() {
            return 0.0;
        }
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}
