use serde::Serialize;
use std::collections::HashMap;

use super::analysis::{Coordinate, Quadrant};
use super::dream::DreamRecord;
use super::error::{DreamError, Result};

/// Storage for analyzed dreams, keyed by id and indexed by user
pub trait DreamStore: Send {
    /// Store a record and return its id. Ids must be unique.
    fn put(&mut self, record: DreamRecord) -> Result<String>;

    fn get(&self, id: &str) -> Option<&DreamRecord>;

    /// All dreams of a user in insertion order (oldest first)
    fn list_by_user(&self, user_id: &str) -> Vec<&DreamRecord>;

    fn count(&self) -> usize;

    fn stats(&self, user_id: &str) -> UserStats {
        UserStats::from_dreams(&self.list_by_user(user_id))
    }
}

/// Aggregate view of one user's dreams
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserStats {
    pub total_dreams: usize,

    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub averages: Option<DreamAverages>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DreamAverages {
    pub average_emotional_score: f64,
    pub average_dynamic_score: f64,
    pub average_confidence: f64,
    pub dominant_quadrant: Quadrant,
}

impl UserStats {
    pub fn from_dreams(dreams: &[&DreamRecord]) -> Self {
        let total = dreams.len();
        if total == 0 {
            return Self {
                total_dreams: 0,
                averages: None,
            };
        }

        let n = total as f64;
        let avg_y = dreams.iter().map(|d| d.analysis.upper_downer_score).sum::<f64>() / n;
        let avg_x = dreams.iter().map(|d| d.analysis.static_dynamic_score).sum::<f64>() / n;
        let avg_confidence = dreams.iter().map(|d| d.analysis.confidence).sum::<f64>() / n;

        Self {
            total_dreams: total,
            averages: Some(DreamAverages {
                average_emotional_score: round2(avg_y),
                average_dynamic_score: round2(avg_x),
                average_confidence: round2(avg_confidence),
                // quadrant uses the unrounded means
                dominant_quadrant: Coordinate::new(avg_x, avg_y).quadrant(),
            }),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Non-persistent store backed by hash maps
#[derive(Debug, Default)]
pub struct InMemoryDreamStore {
    dreams: HashMap<String, DreamRecord>,
    user_dreams: HashMap<String, Vec<String>>,
}

impl InMemoryDreamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DreamStore for InMemoryDreamStore {
    fn put(&mut self, record: DreamRecord) -> Result<String> {
        if self.dreams.contains_key(&record.id) {
            return Err(DreamError::DuplicateId(record.id));
        }

        let id = record.id.clone();
        self.user_dreams
            .entry(record.user_id.clone())
            .or_default()
            .push(id.clone());
        self.dreams.insert(id.clone(), record);

        Ok(id)
    }

    fn get(&self, id: &str) -> Option<&DreamRecord> {
        self.dreams.get(id)
    }

    fn list_by_user(&self, user_id: &str) -> Vec<&DreamRecord> {
        self.user_dreams
            .get(user_id)
            .map(|ids| ids.iter().filter_map(|id| self.dreams.get(id)).collect())
            .unwrap_or_default()
    }

    fn count(&self) -> usize {
        self.dreams.len()
    }
}
