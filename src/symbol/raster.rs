use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_hollow_circle_mut, draw_polygon_mut, Blend, Canvas,
};
use imageproc::point::Point as PixelPoint;

use super::palette::{BLACK, LIGHT_BLUE, WHITE};
use super::scene::{Point, Scene, Shape, Stroke, WORLD_EXTENT};
use crate::core::error::{DreamError, Result};

/// Largest canvas side accepted, in pixels
pub const MAX_CANVAS_PX: u32 = 4096;

/// Side of the minimal fallback image
pub const MINIMAL_SIZE_PX: u32 = 100;

/// A 1x1 PNG returned when nothing else can be encoded
pub const FALLBACK_PIXEL_PNG: [u8; 70] = [
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0xda, 0x63, 0x64,
    0x60, 0xf8, 0x5f, 0x0f, 0x00, 0x02, 0x87, 0x01, 0x80, 0xeb, 0x47, 0xba, 0x92, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Maps the world window onto a square pixel canvas
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    size_px: u32,
    dpi: f64,
}

impl Viewport {
    pub fn new(size_inches: f64, dpi: u32) -> Result<Self> {
        let size = size_inches * dpi as f64;
        if !size.is_finite() || size < 1.0 || size > MAX_CANVAS_PX as f64 {
            return Err(DreamError::Render(format!(
                "canvas of {size_inches} in at {dpi} dpi is outside 1..={MAX_CANVAS_PX} px"
            )));
        }
        Ok(Self {
            size_px: size.round() as u32,
            dpi: dpi as f64,
        })
    }

    pub fn size_px(&self) -> u32 {
        self.size_px
    }

    fn scale(&self) -> f64 {
        self.size_px as f64 / (2.0 * WORLD_EXTENT)
    }

    /// World point to pixel position, y pointing down
    fn to_pixel(&self, p: Point) -> (f64, f64) {
        let s = self.scale();
        ((p.x + WORLD_EXTENT) * s, (WORLD_EXTENT - p.y) * s)
    }

    fn length(&self, world: f64) -> f64 {
        world * self.scale()
    }

    fn stroke_px(&self, stroke: &Stroke) -> f64 {
        (stroke.width_pt * self.dpi / 72.0).max(1.0)
    }
}

/// Draw a scene and encode it as PNG
pub fn rasterize(scene: &Scene, viewport: &Viewport) -> Result<Vec<u8>> {
    let size = viewport.size_px();
    let mut canvas = Blend(RgbaImage::from_pixel(size, size, scene.background.opaque()));

    for shape in &scene.shapes {
        draw_shape(&mut canvas, shape, viewport);
    }

    encode_png(canvas.0)
}

/// Flat white canvas with a single light-blue disk, independent of any
/// configuration
pub fn minimal_symbol() -> Result<Vec<u8>> {
    let mut img = RgbaImage::from_pixel(MINIMAL_SIZE_PX, MINIMAL_SIZE_PX, WHITE.opaque());
    let center = (MINIMAL_SIZE_PX as i32 / 2, MINIMAL_SIZE_PX as i32 / 2);
    let radius = MINIMAL_SIZE_PX as i32 / 4;

    draw_filled_circle_mut(&mut img, center, radius, LIGHT_BLUE.opaque());
    draw_hollow_circle_mut(&mut img, center, radius, BLACK.opaque());

    encode_png(img)
}

fn encode_png(img: RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img).write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

fn draw_shape(canvas: &mut Blend<RgbaImage>, shape: &Shape, vp: &Viewport) {
    match shape {
        Shape::Disk {
            center,
            radius,
            fill,
            alpha,
            edge,
        } => {
            let c = round_point(vp.to_pixel(*center));
            let r = vp.length(*radius).round().max(1.0) as i32;
            draw_filled_circle_mut(canvas, c, r, fill.with_alpha(*alpha));
            if let Some(edge) = edge {
                let width = vp.stroke_px(edge).round() as i32;
                draw_ring(canvas, c, r, width.min(r), edge.color.with_alpha(*alpha));
            }
        }
        Shape::Triangle {
            center,
            radius,
            fill,
            alpha,
        } => {
            let vertices = regular_polygon(*center, *radius, 3, 0.0);
            fill_polygon(canvas, &vertices, vp, fill.with_alpha(*alpha));
        }
        Shape::Square {
            center,
            side,
            fill,
            alpha,
        } => {
            let h = side / 2.0;
            let vertices = [
                Point::new(center.x - h, center.y - h),
                Point::new(center.x + h, center.y - h),
                Point::new(center.x + h, center.y + h),
                Point::new(center.x - h, center.y + h),
            ];
            fill_polygon(canvas, &vertices, vp, fill.with_alpha(*alpha));
        }
        Shape::Star {
            center,
            radius,
            fill,
            edge,
        } => {
            let vertices = star(*center, *radius);
            fill_polygon(canvas, &vertices, vp, fill.opaque());
            for (i, from) in vertices.iter().enumerate() {
                let to = vertices[(i + 1) % vertices.len()];
                stroke_segment(canvas, *from, to, edge, vp, edge.color.opaque());
            }
        }
        Shape::Line {
            from,
            to,
            stroke,
            alpha,
        } => {
            stroke_segment(canvas, *from, *to, stroke, vp, stroke.color.with_alpha(*alpha));
        }
    }
}

/// Annulus of `width` pixels just inside radius `r`, each pixel blended once
fn draw_ring(canvas: &mut Blend<RgbaImage>, (cx, cy): (i32, i32), r: i32, width: i32, color: Rgba<u8>) {
    let (w, h) = canvas.dimensions();
    let outer = (r as f64 + 0.5).powi(2);
    let inner = ((r - width) as f64 + 0.5).powi(2);

    for y in (cy - r).max(0)..=(cy + r).min(h as i32 - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(w as i32 - 1) {
            let (dx, dy) = ((x - cx) as f64, (y - cy) as f64);
            let d2 = dx * dx + dy * dy;
            if d2 <= outer && d2 > inner {
                canvas.draw_pixel(x as u32, y as u32, color);
            }
        }
    }
}

/// Vertices of a regular polygon, the first one pointing up when `rotation` is 0
fn regular_polygon(center: Point, radius: f64, sides: usize, rotation: f64) -> Vec<Point> {
    (0..sides)
        .map(|k| {
            let angle = std::f64::consts::FRAC_PI_2 + rotation + std::f64::consts::TAU * k as f64 / sides as f64;
            Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
        })
        .collect()
}

/// Five-point star alternating between the outer radius and the inner
/// radius of a regular pentagram
fn star(center: Point, radius: f64) -> Vec<Point> {
    let inner = radius * 0.382;
    let outer = regular_polygon(center, radius, 5, 0.0);
    let inner = regular_polygon(center, inner, 5, std::f64::consts::PI / 5.0);
    outer.into_iter().zip(inner).flat_map(|(o, i)| [o, i]).collect()
}

fn round_point((x, y): (f64, f64)) -> (i32, i32) {
    (x.round() as i32, y.round() as i32)
}

fn fill_polygon(canvas: &mut Blend<RgbaImage>, vertices: &[Point], vp: &Viewport, color: Rgba<u8>) {
    let mut poly: Vec<PixelPoint<i32>> = Vec::with_capacity(vertices.len());
    for v in vertices {
        let (x, y) = round_point(vp.to_pixel(*v));
        let p = PixelPoint::new(x, y);
        if poly.last() != Some(&p) {
            poly.push(p);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    // degenerate at this resolution
    if poly.len() < 3 {
        return;
    }
    draw_polygon_mut(canvas, &poly, color);
}

/// A thick segment drawn as a filled quad
fn stroke_segment(
    canvas: &mut Blend<RgbaImage>,
    from: Point,
    to: Point,
    stroke: &Stroke,
    vp: &Viewport,
    color: Rgba<u8>,
) {
    let (x0, y0) = vp.to_pixel(from);
    let (x1, y1) = vp.to_pixel(to);
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len = (dx * dx + dy * dy).sqrt();
    if len < 1.0 {
        return;
    }

    let half = vp.stroke_px(stroke) / 2.0;
    let (nx, ny) = (-dy / len * half, dx / len * half);
    let corners = [
        (x0 + nx, y0 + ny),
        (x1 + nx, y1 + ny),
        (x1 - nx, y1 - ny),
        (x0 - nx, y0 - ny),
    ];

    let mut poly: Vec<PixelPoint<i32>> = Vec::with_capacity(4);
    for corner in corners {
        let (x, y) = round_point(corner);
        let p = PixelPoint::new(x, y);
        if !poly.contains(&p) {
            poly.push(p);
        }
    }
    if poly.len() < 3 {
        return;
    }
    draw_polygon_mut(canvas, &poly, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Pixel;
    use crate::symbol::palette::Palette;
    use crate::symbol::scene;

    fn decode(bytes: &[u8]) -> RgbaImage {
        image::load_from_memory(bytes).unwrap().to_rgba8()
    }

    #[test]
    fn test_viewport_bounds() {
        assert_eq!(Viewport::new(6.0, 150).unwrap().size_px(), 900);
        assert!(Viewport::new(0.0, 150).is_err());
        assert!(Viewport::new(6.0, 0).is_err());
        assert!(Viewport::new(100.0, 300).is_err());
        assert!(Viewport::new(f64::NAN, 100).is_err());
    }

    #[test]
    fn test_viewport_mapping() {
        let vp = Viewport::new(3.0, 100).unwrap();
        assert_eq!(vp.to_pixel(Point::ORIGIN), (150.0, 150.0));
        assert_eq!(vp.to_pixel(Point::new(-1.5, 1.5)), (0.0, 0.0));
        assert_eq!(vp.length(0.5), 50.0);
    }

    #[test]
    fn test_placeholder_pixels() {
        let palette = Palette::default();
        let vp = Viewport::new(2.0, 50).unwrap();
        let img = decode(&rasterize(&scene::placeholder(&palette), &vp).unwrap());

        assert_eq!(img.dimensions(), (100, 100));
        assert_eq!(*img.get_pixel(1, 1), palette.neutral_background.opaque());
        // disk center is blended light gray, darker than the background
        let center = img.get_pixel(50, 50);
        assert!(center[0] < palette.neutral_background.0[0]);
    }

    #[test]
    fn test_rasterize_full_scene() {
        let palette = Palette::default();
        let coords: Vec<_> = [(0.9, 0.7), (-0.8, 0.6), (0.2, 0.9)]
            .iter()
            .map(|&(x, y)| crate::core::Coordinate::new(x, y))
            .collect();
        let scene = scene::compose(&coords, &palette, 10).unwrap();
        let vp = Viewport::new(6.0, 150).unwrap();

        let img = decode(&rasterize(&scene, &vp).unwrap());
        assert_eq!(img.dimensions(), (900, 900));
        assert_eq!(*img.get_pixel(0, 0), palette.warm_background.opaque());
    }

    #[test]
    fn test_minimal_symbol() {
        let img = decode(&minimal_symbol().unwrap());
        assert_eq!(img.dimensions(), (MINIMAL_SIZE_PX, MINIMAL_SIZE_PX));
        assert_eq!(*img.get_pixel(0, 0), WHITE.opaque());
        assert_eq!(*img.get_pixel(50, 50), LIGHT_BLUE.opaque());
    }

    #[test]
    fn test_fallback_pixel_decodes() {
        let img = decode(&FALLBACK_PIXEL_PNG);
        assert_eq!(img.dimensions(), (1, 1));
    }

    #[test]
    fn test_ring_blends_each_pixel_once() {
        let mut canvas = Blend(RgbaImage::from_pixel(40, 40, BLACK.opaque()));
        let edge = WHITE.with_alpha(0.5);
        draw_ring(&mut canvas, (20, 20), 10, 4, edge);

        let mut expected = BLACK.opaque();
        expected.blend(&edge);

        for x in 27..=30 {
            assert_eq!(*canvas.0.get_pixel(x, 20), expected);
        }
        assert_eq!(*canvas.0.get_pixel(20, 20), BLACK.opaque());
        assert_eq!(*canvas.0.get_pixel(26, 20), BLACK.opaque());
        assert_eq!(*canvas.0.get_pixel(31, 20), BLACK.opaque());
    }

    #[test]
    fn test_ring_clipped_at_canvas_edge() {
        let mut canvas = Blend(RgbaImage::from_pixel(10, 10, BLACK.opaque()));
        draw_ring(&mut canvas, (0, 0), 8, 3, WHITE.opaque());
        assert_eq!(*canvas.0.get_pixel(7, 0), WHITE.opaque());
        assert_eq!(*canvas.0.get_pixel(0, 0), BLACK.opaque());
    }

    #[test]
    fn test_star_vertices() {
        let points = star(Point::ORIGIN, 0.15);
        assert_eq!(points.len(), 10);
        assert!((points[0].y - 0.15).abs() < 1e-12);
        assert!(points[0].x.abs() < 1e-12);
    }
}
