use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::palette::Palette;
use super::raster::{self, Viewport, FALLBACK_PIXEL_PNG};
use super::scene;
use crate::core::error::Result;
use crate::core::{Coordinate, DreamRecord};

pub const DEFAULT_SIZE_INCHES: f64 = 6.0;
pub const DEFAULT_DPI: u32 = 150;
/// Dreams beyond this count only influence the averages
pub const DEFAULT_MAX_LAYERS: usize = scene::MAX_LAYERS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub size_inches: f64,
    pub dpi: u32,
    pub max_layers: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            size_inches: DEFAULT_SIZE_INCHES,
            dpi: DEFAULT_DPI,
            max_layers: DEFAULT_MAX_LAYERS,
        }
    }
}

/// Which step of the fallback chain produced an image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolTier {
    Full,
    Base,
    Minimal,
    Pixel,
}

/// PNG bytes plus the tier that produced them
#[derive(Debug, Clone)]
pub struct RenderedSymbol {
    pub png: Vec<u8>,
    pub tier: SymbolTier,
    pub dream_layers: usize,
}

/// Renders a user's dream history as an evolving symbol.
///
/// Rendering never fails outward: each tier falls back to the next, down to a
/// constant 1x1 PNG.
#[derive(Debug, Clone)]
pub struct SymbolRenderer {
    palette: Palette,
    settings: RenderSettings,
}

impl SymbolRenderer {
    pub fn new(palette: Palette, settings: RenderSettings) -> Self {
        Self { palette, settings }
    }

    /// Symbol for dreams ordered oldest first
    pub fn render(&self, dreams: &[&DreamRecord]) -> Vec<u8> {
        let coords: Vec<Coordinate> = dreams.iter().map(|d| d.coordinate()).collect();
        self.render_coordinates(&coords).png
    }

    pub fn render_coordinates(&self, coords: &[Coordinate]) -> RenderedSymbol {
        info!(dreams = coords.len(), "starting symbol generation");

        if !coords.is_empty() {
            match self.full_symbol(coords) {
                Ok(symbol) => {
                    info!(layers = symbol.dream_layers, "symbol generation completed");
                    return symbol;
                }
                Err(e) => error!(error = %e, "full symbol failed, falling back to base symbol"),
            }
        } else {
            warn!("no dreams provided, generating base symbol");
        }

        match self.base_symbol() {
            Ok(png) => return tiered(png, SymbolTier::Base),
            Err(e) => error!(error = %e, "base symbol failed, falling back to minimal symbol"),
        }

        match raster::minimal_symbol() {
            Ok(png) => tiered(png, SymbolTier::Minimal),
            Err(e) => {
                error!(error = %e, "minimal symbol failed, returning fallback pixel");
                tiered(FALLBACK_PIXEL_PNG.to_vec(), SymbolTier::Pixel)
            }
        }
    }

    fn viewport(&self) -> Result<Viewport> {
        Viewport::new(self.settings.size_inches, self.settings.dpi)
    }

    fn full_symbol(&self, coords: &[Coordinate]) -> Result<RenderedSymbol> {
        let scene = scene::compose(coords, &self.palette, self.settings.max_layers)?;
        let png = raster::rasterize(&scene, &self.viewport()?)?;
        Ok(RenderedSymbol {
            png,
            tier: SymbolTier::Full,
            dream_layers: scene.dream_layers,
        })
    }

    fn base_symbol(&self) -> Result<Vec<u8>> {
        raster::rasterize(&scene::placeholder(&self.palette), &self.viewport()?)
    }
}

impl Default for SymbolRenderer {
    fn default() -> Self {
        Self::new(Palette::default(), RenderSettings::default())
    }
}

fn tiered(png: Vec<u8>, tier: SymbolTier) -> RenderedSymbol {
    RenderedSymbol {
        png,
        tier,
        dream_layers: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DreamAnalysis;

    fn small() -> SymbolRenderer {
        SymbolRenderer::new(
            Palette::default(),
            RenderSettings {
                size_inches: 2.0,
                dpi: 50,
                ..RenderSettings::default()
            },
        )
    }

    fn dims(png: &[u8]) -> (u32, u32) {
        let img = image::load_from_memory(png).unwrap();
        (img.width(), img.height())
    }

    fn record(x: f64, y: f64) -> DreamRecord {
        DreamRecord::new(
            "a dream".to_string(),
            "test_user".to_string(),
            DreamAnalysis::new(y, x, 0.8, vec![]),
        )
    }

    #[test]
    fn test_empty_history_renders_base() {
        let symbol = small().render_coordinates(&[]);
        assert_eq!(symbol.tier, SymbolTier::Base);
        assert!(!symbol.png.is_empty());
        assert_eq!(dims(&symbol.png), (100, 100));
    }

    #[test]
    fn test_default_resolution() {
        let dream = record(0.6, 0.8);
        let png = SymbolRenderer::default().render(&[&dream]);
        assert_eq!(dims(&png), (900, 900));
    }

    #[test]
    fn test_multiple_dreams() {
        let dreams: Vec<DreamRecord> = (0..5)
            .map(|i| record(0.1 * i as f64 - 0.2, 0.2 * i as f64 - 0.4))
            .collect();
        let refs: Vec<&DreamRecord> = dreams.iter().collect();

        let png = small().render(&refs);
        assert!(!png.is_empty());
    }

    #[test]
    fn test_layers_capped() {
        let coords: Vec<_> = (0..37).map(|i| Coordinate::new(0.5, (i % 7) as f64 / 10.0)).collect();
        let symbol = small().render_coordinates(&coords);
        assert_eq!(symbol.tier, SymbolTier::Full);
        assert_eq!(symbol.dream_layers, 10);
    }

    #[test]
    fn test_bad_scores_fall_back_to_base() {
        let symbol = small().render_coordinates(&[Coordinate::new(f64::INFINITY, 0.1)]);
        assert_eq!(symbol.tier, SymbolTier::Base);
        assert_eq!(dims(&symbol.png), (100, 100));
    }

    #[test]
    fn test_bad_canvas_falls_back_to_minimal() {
        let renderer = SymbolRenderer::new(
            Palette::default(),
            RenderSettings {
                dpi: 0,
                ..RenderSettings::default()
            },
        );

        let symbol = renderer.render_coordinates(&[Coordinate::new(0.2, 0.2)]);
        assert_eq!(symbol.tier, SymbolTier::Minimal);
        assert_eq!(dims(&symbol.png), (raster::MINIMAL_SIZE_PX, raster::MINIMAL_SIZE_PX));

        let symbol = renderer.render_coordinates(&[]);
        assert_eq!(symbol.tier, SymbolTier::Minimal);
    }
}
