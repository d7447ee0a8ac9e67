//! tiny-skia rendering of the recording waveform.
//!
//! Every frame draws a faint reference ring and three nested translucent
//! contours derived from the same smoothed frame.

pub mod contour;
mod surface;

use crate::waveform::SmoothedFrame;
use tiny_skia::*;

pub use contour::{Contour, ValueTransform, Vec2};
pub use surface::{lock_surface, shared, SharedSurface, Surface};

const LOG_TARGET: &str = "render";

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("cannot allocate a {width}x{height} surface")]
    Allocation { width: u32, height: u32 },
    #[error("surface is not attached")]
    Detached,
    #[error("failed to encode png: {0}")]
    Encode(String),
}

/// 8-bit RGB with a fractional alpha, as the palette is written.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_color(self) -> Color {
        let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::from_rgba8(self.r, self.g, self.b, alpha)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerSpec {
    pub name: &'static str,
    pub radius_factor: f64,
    pub amplitude_factor: f64,
    pub transform: ValueTransform,
    /// Gradient colour at the inner radius; the outer stop is the same RGB, fully transparent.
    pub color: Rgba,
}

impl LayerSpec {
    pub fn values(&self, frame: &SmoothedFrame) -> SmoothedFrame {
        self.transform.map(frame)
    }
}

/// Outer, middle and inner layers, in draw order.
pub const LAYERS: [LayerSpec; 3] = [
    LayerSpec {
        name: "outer",
        radius_factor: 1.0,
        amplitude_factor: 0.4,
        transform: ValueTransform::Identity,
        color: Rgba::new(244, 114, 182, 0.2),
    },
    LayerSpec {
        name: "middle",
        radius_factor: 0.85,
        amplitude_factor: 0.3,
        transform: ValueTransform::SineRipple,
        color: Rgba::new(249, 168, 212, 0.15),
    },
    LayerSpec {
        name: "inner",
        radius_factor: 0.7,
        amplitude_factor: 0.2,
        transform: ValueTransform::CosineRipple,
        color: Rgba::new(253, 224, 235, 0.1),
    },
];

const REFERENCE_RING: Rgba = Rgba::new(244, 63, 94, 0.08);
const REFERENCE_RING_WIDTH: f32 = 8.0;
const OUTLINE_ALPHA: f32 = 0.15;
const OUTLINE_WIDTH: f32 = 0.5;
/// Gradient runs from `base * GRADIENT_INNER` to `base * GRADIENT_OUTER`.
const GRADIENT_INNER: f64 = 0.5;
const GRADIENT_OUTER: f64 = 1.8;

/// Canvas-relative placement derived from the pixmap size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    pub center: Vec2,
    pub base_radius: f64,
    pub ring_radius: f64,
}

impl Geometry {
    pub fn for_canvas(width: u32, height: u32) -> Self {
        let width = f64::from(width);
        Self {
            center: Vec2::new(width / 2.0, f64::from(height) / 2.0),
            base_radius: width / 3.0,
            ring_radius: width / 3.2,
        }
    }
}

/// Clears `pixmap` and draws the ring plus all three layers for `frame`.
pub fn draw_frame(pixmap: &mut Pixmap, frame: &SmoothedFrame, now_ms: f64) {
    let geometry = Geometry::for_canvas(pixmap.width(), pixmap.height());
    pixmap.fill(Color::TRANSPARENT);

    draw_reference_ring(pixmap, &geometry);

    let rotation = contour::rotation(now_ms);
    for layer in &LAYERS {
        draw_layer(pixmap, &geometry, layer, frame, rotation);
    }
}

fn draw_reference_ring(pixmap: &mut Pixmap, geometry: &Geometry) {
    let Some(circle) = PathBuilder::from_circle(
        geometry.center.x as f32,
        geometry.center.y as f32,
        geometry.ring_radius as f32,
    ) else {
        return;
    };

    let mut paint = Paint::default();
    paint.set_color(REFERENCE_RING.to_color());
    paint.anti_alias = true;

    let stroke = Stroke {
        width: REFERENCE_RING_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(&circle, &paint, &stroke, Transform::identity(), None);
}

fn draw_layer(
    pixmap: &mut Pixmap,
    geometry: &Geometry,
    layer: &LayerSpec,
    frame: &SmoothedFrame,
    rotation: f64,
) {
    let base_radius = geometry.base_radius * layer.radius_factor;
    let values = layer.values(frame);

    let Some(path) = contour::trace(
        &values,
        geometry.center,
        base_radius,
        layer.amplitude_factor,
        rotation,
    )
    .and_then(|c| build_path(&c)) else {
        tracing::trace!(target: LOG_TARGET, layer = layer.name, "degenerate contour skipped");
        return;
    };

    let center = Point::from_xy(geometry.center.x as f32, geometry.center.y as f32);
    let inner_stop = (GRADIENT_INNER / GRADIENT_OUTER) as f32;
    let shader = RadialGradient::new(
        center,
        center,
        (base_radius * GRADIENT_OUTER) as f32,
        vec![
            GradientStop::new(0.0, layer.color.to_color()),
            GradientStop::new(inner_stop, layer.color.to_color()),
            GradientStop::new(1.0, layer.color.with_alpha(0.0).to_color()),
        ],
        SpreadMode::Pad,
        Transform::identity(),
    );

    if let Some(shader) = shader {
        let fill = Paint {
            shader,
            anti_alias: true,
            ..Paint::default()
        };
        pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
    }

    let mut outline = Paint::default();
    outline.set_color(layer.color.with_alpha(OUTLINE_ALPHA).to_color());
    outline.anti_alias = true;
    let stroke = Stroke {
        width: OUTLINE_WIDTH,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &outline, &stroke, Transform::identity(), None);
}

fn build_path(contour: &Contour) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(contour.start.x as f32, contour.start.y as f32);
    for c in &contour.curves {
        pb.cubic_to(
            c.ctrl1.x as f32,
            c.ctrl1.y as f32,
            c.ctrl2.x as f32,
            c.ctrl2.y as f32,
            c.to.x as f32,
            c.to.y as f32,
        );
    }
    pb.close();
    pb.finish()
}
