use image::Rgba;

use crate::core::{Coordinate, Quadrant};

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Color([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8])
    }

    pub fn with_alpha(self, alpha: f32) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8])
    }

    pub fn opaque(self) -> Rgba<u8> {
        self.with_alpha(1.0)
    }
}

pub const WHITE: Color = Color::hex(0xFFFFFF);
pub const BLACK: Color = Color::hex(0x000000);
pub const GOLD: Color = Color::hex(0xFFD700);
pub const LIGHT_GRAY: Color = Color::hex(0xD3D3D3);
pub const LIGHT_BLUE: Color = Color::hex(0xADD8E6);

/// Above this mean upper/downer score the background turns warm
pub const WARM_BACKGROUND_THRESHOLD: f64 = 0.3;
/// Below this mean upper/downer score the background turns dark
pub const DARK_BACKGROUND_THRESHOLD: f64 = -0.3;

/// Colors used by the symbol renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Gold, orange, pink, turquoise
    pub upper: Vec<Color>,
    /// Purple, indigo, navy, dark slate
    pub downer: Vec<Color>,
    pub warm_background: Color,
    pub dark_background: Color,
    pub neutral_background: Color,
    /// Fallback when a palette is empty
    pub neutral: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            upper: vec![
                Color::hex(0xFFD700),
                Color::hex(0xFFA500),
                Color::hex(0xFF69B4),
                Color::hex(0x00CED1),
            ],
            downer: vec![
                Color::hex(0x800080),
                Color::hex(0x4B0082),
                Color::hex(0x191970),
                Color::hex(0x2F4F4F),
            ],
            warm_background: Color::hex(0xFFF8DC),
            dark_background: Color::hex(0x2F2F2F),
            neutral_background: Color::hex(0xF5F5F5),
            neutral: Color::hex(0x808080),
        }
    }
}

impl Palette {
    pub fn background(&self, avg_y: f64) -> Color {
        if avg_y > WARM_BACKGROUND_THRESHOLD {
            self.warm_background
        } else if avg_y < DARK_BACKGROUND_THRESHOLD {
            self.dark_background
        } else {
            self.neutral_background
        }
    }

    /// Base disk color for the averaged position
    pub fn primary(&self, avg: Coordinate) -> Color {
        let pick = |colors: &[Color], index: usize| colors.get(index).copied().unwrap_or(self.neutral);
        match avg.quadrant() {
            Quadrant::DynamicUpper => pick(&self.upper, 0),
            Quadrant::StaticUpper => pick(&self.upper, 3),
            Quadrant::DynamicDowner => pick(&self.downer, 0),
            Quadrant::StaticDowner => pick(&self.downer, 2),
        }
    }

    /// Color of a single dream layer, picked by intensity `(|x| + |y|) / 2`
    pub fn dream_color(&self, dream: Coordinate) -> Color {
        let colors = if dream.y > 0.0 { &self.upper } else { &self.downer };
        if colors.is_empty() {
            return self.neutral;
        }

        let intensity = (dream.x.abs() + dream.y.abs()) / 2.0;
        let index = ((intensity * colors.len() as f64).floor() as usize).min(colors.len() - 1);
        colors[index]
    }
}
