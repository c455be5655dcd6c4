//! Geometry of a dream symbol in world coordinates.
//!
//! The symbol lives in the square window `[-WORLD_EXTENT, WORLD_EXTENT]` on
//! both axes with the dreamer's core at the origin. Composition only decides
//! what to draw and where; `raster` turns a [`Scene`] into pixels.

use std::f64::consts::PI;

use super::palette::{Color, Palette, BLACK, GOLD, LIGHT_GRAY, WHITE};
use crate::core::error::{DreamError, Result};
use crate::core::Coordinate;

pub const WORLD_EXTENT: f64 = 1.5;

/// Most dreams drawn as individual layers
pub const MAX_LAYERS: usize = 10;

pub const BASE_RADIUS: f64 = 0.3;
pub const BASE_ALPHA: f32 = 0.8;
pub const LAYER_ALPHA: f32 = 0.7;
pub const LAYER_BASE_RADIUS: f64 = 0.5;
pub const LAYER_RADIUS_STEP: f64 = 0.1;
pub const LAYER_SCALE: f64 = 0.5;
pub const TRIANGLE_RADIUS: f64 = 0.1;
pub const SQUARE_SIDE: f64 = 0.1;
pub const CIRCLE_RADIUS: f64 = 0.05;

/// Mean upper/downer above which a star is drawn at the center
pub const STAR_THRESHOLD: f64 = 0.5;
/// Mean upper/downer below which a dark core is drawn
pub const DARK_CORE_THRESHOLD: f64 = -0.5;
/// |mean static/dynamic| above which rays are drawn
pub const RAY_THRESHOLD: f64 = 0.5;
pub const STAR_RADIUS: f64 = 0.15;
pub const DARK_CORE_RADIUS: f64 = 0.1;
pub const RAY_COUNT: usize = 8;
pub const DYNAMIC_RAY_LENGTH: f64 = 0.2;
pub const STATIC_RAY_LENGTH: f64 = 0.15;

/// Outline width in points (1/72 inch)
pub const EDGE_WIDTH_PT: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn polar(radius: f64, angle: f64) -> Self {
        Self::new(radius * angle.cos(), radius * angle.sin())
    }

    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width_pt: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Disk {
        center: Point,
        radius: f64,
        fill: Color,
        alpha: f32,
        edge: Option<Stroke>,
    },
    /// Regular triangle with one vertex pointing up
    Triangle {
        center: Point,
        radius: f64,
        fill: Color,
        alpha: f32,
    },
    Square {
        center: Point,
        side: f64,
        fill: Color,
        alpha: f32,
    },
    /// Five-point star, filled and outlined
    Star {
        center: Point,
        radius: f64,
        fill: Color,
        edge: Stroke,
    },
    Line {
        from: Point,
        to: Point,
        stroke: Stroke,
        alpha: f32,
    },
}

impl Shape {
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Disk { .. } => "disk",
            Shape::Triangle { .. } => "triangle",
            Shape::Square { .. } => "square",
            Shape::Star { .. } => "star",
            Shape::Line { .. } => "line",
        }
    }
}

/// Everything needed to rasterize one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub background: Color,
    /// Base disk first, then dream layers, then the central overlay
    pub shapes: Vec<Shape>,
    /// Number of individual dream layers among `shapes`
    pub dream_layers: usize,
}

/// Scene for a user without dreams
pub fn placeholder(palette: &Palette) -> Scene {
    Scene {
        background: palette.neutral_background,
        shapes: vec![base_disk(LIGHT_GRAY)],
        dream_layers: 0,
    }
}

/// Scene for a non-empty history of dream coordinates, oldest first.
///
/// Averages use every coordinate; only the first `max_layers` (never more
/// than [`MAX_LAYERS`]) become layers.
pub fn compose(coords: &[Coordinate], palette: &Palette, max_layers: usize) -> Result<Scene> {
    if let Some(bad) = coords.iter().find(|c| !c.is_finite()) {
        return Err(DreamError::Render(format!(
            "non-finite dream coordinate ({}, {})",
            bad.x, bad.y
        )));
    }
    let avg = Coordinate::mean(coords)
        .ok_or_else(|| DreamError::Render("no dreams to compose".to_string()))?;

    let complexity = coords.len().min(max_layers).min(MAX_LAYERS);
    let mut shapes = Vec::with_capacity(complexity + RAY_COUNT + 2);

    shapes.push(base_disk(palette.primary(avg)));

    for (index, dream) in coords.iter().take(complexity).enumerate() {
        shapes.push(dream_layer(*dream, index, complexity, palette));
    }

    central_overlay(avg, &mut shapes);

    Ok(Scene {
        background: palette.background(avg.y),
        shapes,
        dream_layers: complexity,
    })
}

fn base_disk(fill: Color) -> Shape {
    Shape::Disk {
        center: Point::ORIGIN,
        radius: BASE_RADIUS,
        fill,
        alpha: BASE_ALPHA,
        edge: Some(Stroke {
            color: WHITE,
            width_pt: EDGE_WIDTH_PT,
        }),
    }
}

/// Layers spiral outward around the base disk
fn layer_position(index: usize, total: usize) -> Point {
    let angle = 2.0 * PI * index as f64 / total as f64;
    let radius = LAYER_BASE_RADIUS + index as f64 * LAYER_RADIUS_STEP;
    Point::polar(radius * LAYER_SCALE, angle)
}

fn dream_layer(dream: Coordinate, index: usize, total: usize, palette: &Palette) -> Shape {
    let center = layer_position(index, total);
    let fill = palette.dream_color(dream);

    if dream.x.abs() > dream.y.abs() {
        if dream.x > 0.0 {
            Shape::Triangle {
                center,
                radius: TRIANGLE_RADIUS,
                fill,
                alpha: LAYER_ALPHA,
            }
        } else {
            Shape::Square {
                center,
                side: SQUARE_SIDE,
                fill,
                alpha: LAYER_ALPHA,
            }
        }
    } else {
        Shape::Disk {
            center,
            radius: CIRCLE_RADIUS,
            fill,
            alpha: LAYER_ALPHA,
            edge: None,
        }
    }
}

fn central_overlay(avg: Coordinate, shapes: &mut Vec<Shape>) {
    if avg.y > STAR_THRESHOLD {
        shapes.push(Shape::Star {
            center: Point::ORIGIN,
            radius: STAR_RADIUS,
            fill: WHITE,
            edge: Stroke {
                color: GOLD,
                width_pt: EDGE_WIDTH_PT,
            },
        });
    } else if avg.y < DARK_CORE_THRESHOLD {
        shapes.push(Shape::Disk {
            center: Point::ORIGIN,
            radius: DARK_CORE_RADIUS,
            fill: BLACK,
            alpha: 0.8,
            edge: None,
        });
    }

    if avg.x.abs() > RAY_THRESHOLD {
        let length = if avg.x > 0.0 {
            DYNAMIC_RAY_LENGTH
        } else {
            STATIC_RAY_LENGTH
        };
        for k in 0..RAY_COUNT {
            let angle = 2.0 * PI * k as f64 / RAY_COUNT as f64;
            shapes.push(Shape::Line {
                from: Point::ORIGIN,
                to: Point::polar(length, angle),
                stroke: Stroke {
                    color: WHITE,
                    width_pt: EDGE_WIDTH_PT,
                },
                alpha: 0.8,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(pairs: &[(f64, f64)]) -> Vec<Coordinate> {
        pairs.iter().map(|&(x, y)| Coordinate::new(x, y)).collect()
    }

    fn kinds(scene: &Scene) -> Vec<&'static str> {
        scene.shapes.iter().map(Shape::kind).collect()
    }

    #[test]
    fn test_placeholder() {
        let palette = Palette::default();
        let scene = placeholder(&palette);
        assert_eq!(scene.background, palette.neutral_background);
        assert_eq!(scene.dream_layers, 0);
        assert_eq!(kinds(&scene), vec!["disk"]);
    }

    #[test]
    fn test_single_dream() {
        let palette = Palette::default();
        let scene = compose(&coords(&[(0.6, 0.8)]), &palette, 10).unwrap();

        assert_eq!(scene.dream_layers, 1);
        assert_eq!(scene.background, palette.warm_background);
        // base, emotion-dominant circle, star, 8 rays
        assert_eq!(kinds(&scene)[..3], ["disk", "disk", "star"]);
        assert_eq!(scene.shapes.len(), 3 + RAY_COUNT);

        match &scene.shapes[0] {
            Shape::Disk { fill, .. } => assert_eq!(*fill, palette.upper[0]),
            other => panic!("unexpected base shape {other:?}"),
        }
    }

    #[test]
    fn test_layer_shapes() {
        let palette = Palette::default();
        let scene = compose(&coords(&[(0.9, 0.1), (-0.9, 0.1), (0.1, -0.9)]), &palette, 10).unwrap();

        assert_eq!(kinds(&scene)[1..4], ["triangle", "square", "disk"]);
    }

    #[test]
    fn test_layer_positions() {
        let first = layer_position(0, 4);
        assert!((first.x - 0.25).abs() < 1e-12);
        assert!(first.y.abs() < 1e-12);

        let second = layer_position(1, 4);
        assert!(second.x.abs() < 1e-12);
        assert!((second.y - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_complexity_cap() {
        let palette = Palette::default();
        let many: Vec<_> = (0..25).map(|i| Coordinate::new(0.0, i as f64 / 100.0)).collect();
        let scene = compose(&many, &palette, 10).unwrap();
        assert_eq!(scene.dream_layers, 10);

        let few = compose(&many[..3], &palette, 10).unwrap();
        assert_eq!(few.dream_layers, 3);
    }

    #[test]
    fn test_oversized_layer_limit_is_capped() {
        let palette = Palette::default();
        let many: Vec<_> = (0..25).map(|i| Coordinate::new(0.0, i as f64 / 100.0)).collect();
        let scene = compose(&many, &palette, 40).unwrap();

        assert_eq!(scene.dream_layers, MAX_LAYERS);
        // base disk, one shape per layer, no overlay near the origin
        assert_eq!(scene.shapes.len(), 1 + MAX_LAYERS);
    }

    #[test]
    fn test_averages_use_all_dreams() {
        let palette = Palette::default();
        // the first ten are upper, the rest pull the mean below -0.3
        let mut history = vec![Coordinate::new(0.0, 0.1); 10];
        history.extend(vec![Coordinate::new(0.0, -1.0); 30]);

        let scene = compose(&history, &palette, 10).unwrap();
        assert_eq!(scene.background, palette.dark_background);
        assert!(kinds(&scene).iter().all(|k| *k != "star"));
    }

    #[test]
    fn test_overlays() {
        let palette = Palette::default();

        let dark = compose(&coords(&[(0.0, -0.9)]), &palette, 10).unwrap();
        assert_eq!(kinds(&dark), vec!["disk", "disk", "disk"]);

        let neutral = compose(&coords(&[(0.1, 0.1)]), &palette, 10).unwrap();
        assert_eq!(neutral.shapes.len(), 2);

        let static_rays = compose(&coords(&[(-0.9, 0.0)]), &palette, 10).unwrap();
        let line_lengths: Vec<f64> = static_rays
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Line { to, .. } => Some((to.x * to.x + to.y * to.y).sqrt()),
                _ => None,
            })
            .collect();
        assert_eq!(line_lengths.len(), RAY_COUNT);
        assert!(line_lengths.iter().all(|l| (l - STATIC_RAY_LENGTH).abs() < 1e-12));
    }

    #[test]
    fn test_non_finite_rejected() {
        let palette = Palette::default();
        let result = compose(&coords(&[(f64::NAN, 0.2)]), &palette, 10);
        assert!(matches!(result, Err(DreamError::Render(_))));
        assert!(compose(&[], &palette, 10).is_err());
    }
}
