use serde::{Deserialize, Serialize};

/// Scores and keywords produced for one dream text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamAnalysis {
    /// Emotional valence (-1.0 downer to 1.0 upper)
    pub upper_downer_score: f64,

    /// Energy level (-1.0 static to 1.0 dynamic)
    pub static_dynamic_score: f64,

    /// Confidence in the analysis (0.0-1.0)
    pub confidence: f64,

    /// Lexicon words in order of first appearance
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl DreamAnalysis {
    /// Create an analysis, clamping every score into its range
    pub fn new(
        upper_downer_score: f64,
        static_dynamic_score: f64,
        confidence: f64,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            upper_downer_score: upper_downer_score.clamp(-1.0, 1.0),
            static_dynamic_score: static_dynamic_score.clamp(-1.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            keywords,
        }
    }

    /// Position of this dream in dream space
    pub fn coordinate(&self) -> Coordinate {
        Coordinate {
            x: self.static_dynamic_score,
            y: self.upper_downer_score,
        }
    }
}

/// A point in dream space: x is static/dynamic, y is upper/downer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn quadrant(&self) -> Quadrant {
        Quadrant::of(self.x, self.y)
    }

    /// Arithmetic mean of a set of coordinates, `None` when empty
    pub fn mean(coords: &[Coordinate]) -> Option<Coordinate> {
        if coords.is_empty() {
            return None;
        }
        let n = coords.len() as f64;
        let (sx, sy) = coords
            .iter()
            .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));
        Some(Coordinate::new(sx / n, sy / n))
    }
}

/// One of the four regions of dream space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quadrant {
    DynamicUpper,
    StaticUpper,
    DynamicDowner,
    StaticDowner,
}

impl Quadrant {
    /// Zero counts as static on x and downer on y
    pub fn of(x: f64, y: f64) -> Self {
        match (x > 0.0, y > 0.0) {
            (true, true) => Quadrant::DynamicUpper,
            (false, true) => Quadrant::StaticUpper,
            (true, false) => Quadrant::DynamicDowner,
            (false, false) => Quadrant::StaticDowner,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Quadrant::DynamicUpper => "Dynamic Upper (Energetic Positive)",
            Quadrant::StaticUpper => "Static Upper (Peaceful Positive)",
            Quadrant::DynamicDowner => "Dynamic Downer (Chaotic Negative)",
            Quadrant::StaticDowner => "Static Downer (Stagnant Negative)",
        }
    }
}

impl Serialize for Quadrant {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
