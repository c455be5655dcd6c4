use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::{Coordinate, DreamAnalysis};

/// Represents a single analyzed dream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamRecord {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// The dream as the user wrote it
    pub dream_text: String,

    /// Owner of the dream
    pub user_id: String,

    /// Scores computed for the text
    pub analysis: DreamAnalysis,

    /// When the dream was analyzed
    pub timestamp: DateTime<Utc>,
}

impl DreamRecord {
    /// Create a new record with a freshly generated id
    pub fn new(dream_text: String, user_id: String, analysis: DreamAnalysis) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            dream_text,
            user_id,
            analysis,
            timestamp: Utc::now(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.analysis.coordinate()
    }
}
