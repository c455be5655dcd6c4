use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const UPLIFTING: &[&str] = &[
    "flying", "soaring", "light", "bright", "laughing", "happy", "joy", "love",
    "celebration", "success", "winning", "beautiful", "wonderful", "amazing",
    "peaceful", "calm", "serene", "blissful", "euphoric", "radiant", "golden",
];

const DOWNBEAT: &[&str] = &[
    "falling", "dark", "scary", "fear", "nightmare", "death", "crying", "sad",
    "angry", "lost", "trapped", "drowning", "monster", "shadow", "blood",
    "pain", "hurt", "broken", "empty", "alone", "hopeless", "terrified",
];

const DYNAMIC: &[&str] = &[
    "running", "chasing", "moving", "racing", "jumping", "dancing", "fighting",
    "flying", "swimming", "climbing", "rushing", "spinning", "whirling",
    "exploding", "crashing", "thundering", "storming", "vibrating", "shaking",
];

const STATIC: &[&str] = &[
    "sitting", "standing", "waiting", "watching", "staring", "frozen", "still",
    "motionless", "calm", "peaceful", "quiet", "silent", "empty", "void",
    "meditation", "sleeping", "resting", "contemplating", "observing",
];

/// The four keyword sets used for scoring and keyword extraction.
///
/// Sets may overlap ("flying" is both uplifting and dynamic). A lexicon is
/// built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub uplifting: BTreeSet<String>,
    pub downbeat: BTreeSet<String>,
    pub dynamic: BTreeSet<String>,
    #[serde(rename = "static")]
    pub static_words: BTreeSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            uplifting: to_set(UPLIFTING),
            downbeat: to_set(DOWNBEAT),
            dynamic: to_set(DYNAMIC),
            static_words: to_set(STATIC),
        }
    }
}

impl Lexicon {
    /// Whether the token belongs to any of the four sets
    pub fn contains(&self, token: &str) -> bool {
        self.uplifting.contains(token)
            || self.downbeat.contains(token)
            || self.dynamic.contains(token)
            || self.static_words.contains(token)
    }

    /// Lowercases every entry so lookups against normalized text match
    pub fn normalized(self) -> Self {
        let lower = |set: BTreeSet<String>| set.into_iter().map(|w| w.to_lowercase()).collect();
        Self {
            uplifting: lower(self.uplifting),
            downbeat: lower(self.downbeat),
            dynamic: lower(self.dynamic),
            static_words: lower(self.static_words),
        }
    }
}

fn to_set(words: &[&str]) -> BTreeSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}
