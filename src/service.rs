use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::core::{
    DreamError, DreamRecord, DreamScorer, DreamStore, InMemoryDreamStore, LexiconSentiment,
    Result, UserStats,
};
use crate::symbol::{Palette, SymbolRenderer};

pub const ANONYMOUS_USER: &str = "anonymous";

/// Body of an analysis request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DreamInput {
    pub dream_text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A user's symbol plus where their newest dream sits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolResponse {
    pub symbol_base64: String,
    pub dream_count: usize,
    /// (static/dynamic, upper/downer) of the newest dream, (0, 0) without dreams
    pub coordinates: (f64, f64),
}

/// Scores, stores and renders dreams
pub struct DreamService {
    scorer: DreamScorer,
    renderer: SymbolRenderer,
    store: Box<dyn DreamStore>,
    min_dream_length: usize,
}

impl DreamService {
    pub fn new(
        scorer: DreamScorer,
        renderer: SymbolRenderer,
        store: Box<dyn DreamStore>,
        min_dream_length: usize,
    ) -> Self {
        Self {
            scorer,
            renderer,
            store,
            min_dream_length,
        }
    }

    /// Wire the built-in components from configuration
    pub fn from_config(config: &Config) -> Self {
        let scorer = DreamScorer::new(
            Arc::new(config.lexicon()),
            Arc::new(LexiconSentiment::default()),
            config.scoring.weights.clone(),
        );
        let renderer = SymbolRenderer::new(Palette::default(), config.render.clone());

        Self::new(
            scorer,
            renderer,
            Box::new(InMemoryDreamStore::new()),
            config.scoring.min_dream_length,
        )
    }

    pub fn scorer(&self) -> &DreamScorer {
        &self.scorer
    }

    pub fn renderer(&self) -> &SymbolRenderer {
        &self.renderer
    }

    /// Validate, score and store one dream
    pub fn analyze_dream(&mut self, input: DreamInput) -> Result<DreamRecord> {
        let length = input.dream_text.chars().count();
        if length < self.min_dream_length {
            return Err(DreamError::Validation(format!(
                "dream_text must be at least {} characters, got {}",
                self.min_dream_length, length
            )));
        }

        let user_id = input
            .user_id
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| ANONYMOUS_USER.to_string());

        let analysis = self.scorer.score(&input.dream_text);
        let record = DreamRecord::new(input.dream_text, user_id, analysis);
        self.store.put(record.clone())?;

        info!(
            dream_id = %record.id,
            user_id = %record.user_id,
            x = record.analysis.static_dynamic_score,
            y = record.analysis.upper_downer_score,
            stored = self.store.count(),
            "dream analyzed"
        );
        Ok(record)
    }

    pub fn generate_symbol(&self, user_id: &str) -> SymbolResponse {
        let dreams = self.store.list_by_user(user_id);
        let png = self.renderer.render(&dreams);

        let coordinates = dreams
            .last()
            .map(|d| {
                let c = d.coordinate();
                (c.x, c.y)
            })
            .unwrap_or((0.0, 0.0));

        SymbolResponse {
            symbol_base64: STANDARD.encode(png),
            dream_count: dreams.len(),
            coordinates,
        }
    }

    pub fn user_stats(&self, user_id: &str) -> UserStats {
        self.store.stats(user_id)
    }

    pub fn get_dream(&self, dream_id: &str) -> Result<DreamRecord> {
        self.store
            .get(dream_id)
            .cloned()
            .ok_or_else(|| DreamError::NotFound(dream_id.to_string()))
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn service() -> DreamService {
        DreamService::from_config(&Config::default_config(PathBuf::from(".")))
    }

    fn input(text: &str, user: Option<&str>) -> DreamInput {
        DreamInput {
            dream_text: text.to_string(),
            user_id: user.map(str::to_string),
        }
    }

    #[test]
    fn test_analyze_and_fetch() {
        let mut service = service();
        let record = service
            .analyze_dream(input("I was flying over a beautiful landscape", Some("alice")))
            .unwrap();

        assert_eq!(record.user_id, "alice");
        assert!(record.analysis.upper_downer_score > 0.0);

        let fetched = service.get_dream(&record.id).unwrap();
        assert_eq!(fetched.dream_text, record.dream_text);
    }

    #[test]
    fn test_short_text_rejected() {
        let mut service = service();
        let err = service.analyze_dream(input("too short", None)).unwrap_err();
        assert!(matches!(err, DreamError::Validation(_)));

        let err = service.analyze_dream(input("", None)).unwrap_err();
        assert!(matches!(err, DreamError::Validation(_)));

        assert!(service.analyze_dream(input("I fell down.", None)).is_ok());
    }

    #[test]
    fn test_length_counts_characters() {
        let mut service = service();
        // nine characters, more than ten bytes
        assert!(service.analyze_dream(input("ééééééééé", None)).is_err());
    }

    #[test]
    fn test_default_user() {
        let mut service = service();
        let record = service.analyze_dream(input("I was running fast", None)).unwrap();
        assert_eq!(record.user_id, ANONYMOUS_USER);

        let record = service.analyze_dream(input("I was running fast", Some("  "))).unwrap();
        assert_eq!(record.user_id, ANONYMOUS_USER);
        assert_eq!(service.user_stats(ANONYMOUS_USER).total_dreams, 2);
    }

    #[test]
    fn test_config_cannot_raise_caps() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("config.json"),
            r#"{ "scoring": { "max_keywords": 50 }, "render": { "max_layers": 40, "size_inches": 1.0, "dpi": 100 } }"#,
        )
        .unwrap();
        let config = Config::new(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(config.scoring.weights.max_keywords, 50);
        assert_eq!(config.render.max_layers, 40);

        let mut service = DreamService::from_config(&config);
        let record = service
            .analyze_dream(input(
                "flying soaring light bright laughing happy joy love celebration \
                 success winning beautiful wonderful amazing",
                Some("carol"),
            ))
            .unwrap();
        assert_eq!(record.analysis.keywords.len(), 10);

        let coords: Vec<_> = (0..25).map(|i| crate::core::Coordinate::new(0.0, i as f64 / 100.0)).collect();
        let symbol = service.renderer().render_coordinates(&coords);
        assert_eq!(symbol.dream_layers, 10);
    }

    #[test]
    fn test_missing_dream() {
        let service = service();
        assert!(matches!(service.get_dream("nope"), Err(DreamError::NotFound(_))));
    }

    #[test]
    fn test_symbol_without_dreams() {
        let service = service();
        let symbol = service.generate_symbol("new_user");
        assert_eq!(symbol.dream_count, 0);
        assert_eq!(symbol.coordinates, (0.0, 0.0));
        assert!(!symbol.symbol_base64.is_empty());
    }

    #[test]
    fn test_symbol_uses_latest_dream() {
        let mut service = service();
        service
            .analyze_dream(input("I was flying through golden light", Some("bob")))
            .unwrap();
        let latest = service
            .analyze_dream(input("I was sitting alone in the dark", Some("bob")))
            .unwrap();

        let symbol = service.generate_symbol("bob");
        assert_eq!(symbol.dream_count, 2);
        assert_eq!(
            symbol.coordinates,
            (latest.analysis.static_dynamic_score, latest.analysis.upper_downer_score)
        );

        let png = STANDARD.decode(&symbol.symbol_base64).unwrap();
        assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_user_stats() {
        let mut service = service();
        for text in [
            "I was flying through the clouds feeling amazing",
            "I was running fast through a forest",
            "I was sitting quietly by a lake",
        ] {
            service.analyze_dream(input(text, Some("stats_user"))).unwrap();
        }

        let stats = service.user_stats("stats_user");
        assert_eq!(stats.total_dreams, 3);
        assert!(stats.averages.is_some());
        assert_eq!(service.user_stats("ghost").total_dreams, 0);
    }
}
