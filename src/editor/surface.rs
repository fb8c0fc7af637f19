//! Drawing surface for the image editor.
//!
//! The editor draws vector shapes over a background raster. [`DrawingSurface`]
//! is the seam between editor logic and whatever renders the canvas;
//! [`RasterSurface`] is the in-process implementation backed by the `image`
//! crate.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Identifier of an object on a surface.
pub type ObjectId = u64;

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Opaque red, the default annotation color.
    pub const RED: Color = Color([255, 0, 0, 255]);

    /// Fully transparent.
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);
}

impl Default for Color {
    fn default() -> Self {
        Color::RED
    }
}

/// Shape geometry in image coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Ellipse inscribed in a bounding box
    Ellipse {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Straight segment
    Line { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Segment with a two-stroke head at its end
    Arrow { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// Freehand stroke
    Path { points: Vec<(f32, f32)> },
    /// Text label anchored at its top-left corner
    Text {
        x: f32,
        y: f32,
        content: String,
        #[serde(default = "default_font_size")]
        font_size: f32,
    },
}

/// Length of each arrow head stroke.
pub const ARROW_HEAD_SIZE: f32 = 20.0;

/// Average glyph width relative to the font size, for text bounds.
const GLYPH_WIDTH_RATIO: f32 = 0.6;

fn default_font_size() -> f32 {
    20.0
}

type Segment = ((f32, f32), (f32, f32));

/// Shaft and both head strokes of an arrow. The head strokes leave the tip
/// at 30 degrees on either side of the shaft.
fn arrow_segments(x1: f32, y1: f32, x2: f32, y2: f32) -> [Segment; 3] {
    let angle = (y2 - y1).atan2(x2 - x1);
    let spread = std::f32::consts::PI / 6.0;
    let head = |offset: f32| {
        (
            x2 - ARROW_HEAD_SIZE * (angle + offset).cos(),
            y2 - ARROW_HEAD_SIZE * (angle + offset).sin(),
        )
    };
    let tip = (x2, y2);
    [((x1, y1), tip), (tip, head(-spread)), (tip, head(spread))]
}

fn points_bounds<'a>(points: impl IntoIterator<Item = &'a (f32, f32)>) -> (f32, f32, f32, f32) {
    points.into_iter().fold(
        (f32::MAX, f32::MAX, f32::MIN, f32::MIN),
        |(min_x, min_y, max_x, max_y), (x, y)| {
            (min_x.min(*x), min_y.min(*y), max_x.max(*x), max_y.max(*y))
        },
    )
}

impl Shape {
    /// Bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (f32, f32, f32, f32) {
        match self {
            Shape::Rect { x, y, width, height } | Shape::Ellipse { x, y, width, height } => {
                (*x, *y, x + width, y + height)
            }
            Shape::Line { x1, y1, x2, y2 } => (x1.min(*x2), y1.min(*y2), x1.max(*x2), y1.max(*y2)),
            Shape::Arrow { x1, y1, x2, y2 } => {
                let segments = arrow_segments(*x1, *y1, *x2, *y2);
                points_bounds(segments.iter().flat_map(|(a, b)| [a, b]))
            }
            Shape::Path { points } => points_bounds(points),
            Shape::Text {
                x,
                y,
                content,
                font_size,
            } => {
                let width = content.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO;
                (*x, *y, x + width, y + font_size)
            }
        }
    }

    /// Stroked segments of line-like shapes.
    fn segments(&self) -> Vec<Segment> {
        match self {
            Shape::Line { x1, y1, x2, y2 } => vec![((*x1, *y1), (*x2, *y2))],
            Shape::Arrow { x1, y1, x2, y2 } => arrow_segments(*x1, *y1, *x2, *y2).to_vec(),
            Shape::Path { points } => points.windows(2).map(|pair| (pair[0], pair[1])).collect(),
            Shape::Rect { .. } | Shape::Ellipse { .. } | Shape::Text { .. } => Vec::new(),
        }
    }
}

/// A shape with its style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingObject {
    /// Identifier, unique on its surface
    #[serde(default)]
    pub id: ObjectId,
    /// Geometry
    pub shape: Shape,
    /// Outline color
    #[serde(default)]
    pub stroke: Color,
    /// Outline width in pixels
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f32,
    /// Fill color for closed shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Color>,
}

fn default_stroke_width() -> f32 {
    2.0
}

impl DrawingObject {
    /// Unfilled object with the default stroke.
    pub fn new(shape: Shape) -> Self {
        Self {
            id: 0,
            shape,
            stroke: Color::default(),
            stroke_width: default_stroke_width(),
            fill: None,
        }
    }

    /// Set the outline (builder style).
    pub fn with_stroke(mut self, color: Color, width: f32) -> Self {
        self.stroke = color;
        self.stroke_width = width;
        self
    }

    /// Set the fill (builder style).
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }

    /// Whether a point lies on or inside the object, with some tolerance for thin strokes.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let tolerance = self.stroke_width / 2.0 + 2.0;
        match &self.shape {
            Shape::Line { .. } | Shape::Arrow { .. } | Shape::Path { .. } => self
                .shape
                .segments()
                .into_iter()
                .any(|(a, b)| distance_to_segment(x, y, a, b) <= tolerance),
            Shape::Rect { .. } | Shape::Ellipse { .. } | Shape::Text { .. } => {
                let (min_x, min_y, max_x, max_y) = self.shape.bounds();
                x >= min_x - tolerance
                    && x <= max_x + tolerance
                    && y >= min_y - tolerance
                    && y <= max_y + tolerance
            }
        }
    }
}

/// Canvas operations the editor relies on.
pub trait DrawingSurface {
    /// Width and height of the background in pixels.
    fn size(&self) -> (u32, u32);

    /// Add an object and return its id.
    fn add_object(&mut self, object: DrawingObject) -> ObjectId;

    /// Remove an object.
    fn remove_object(&mut self, id: ObjectId) -> Option<DrawingObject>;

    /// Objects in paint order.
    fn objects(&self) -> &[DrawingObject];

    /// Serialize the objects (not the background).
    fn to_json(&self) -> Result<String>;

    /// Replace every object with a previously serialized set.
    fn load_json(&mut self, json: &str) -> Result<()>;

    /// Topmost object under a point in image coordinates.
    fn hit_test(&self, x: f32, y: f32) -> Option<ObjectId>;

    /// Flatten background and objects into a PNG.
    fn render_png(&self) -> Result<Vec<u8>>;
}

#[derive(Serialize, Deserialize)]
struct SurfaceSnapshot {
    objects: Vec<DrawingObject>,
}

/// Surface backed by an in-memory RGBA raster.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    background: RgbaImage,
    objects: Vec<DrawingObject>,
    next_id: ObjectId,
}

impl RasterSurface {
    /// Surface over an existing raster.
    pub fn new(background: RgbaImage) -> Self {
        Self {
            background,
            objects: Vec::new(),
            next_id: 1,
        }
    }

    /// Decode encoded image bytes (PNG, JPEG, ...) as the background.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let background = image::load_from_memory(bytes)?.to_rgba8();
        log::debug!(
            "🖼️ Editor surface {}x{}",
            background.width(),
            background.height()
        );
        Ok(Self::new(background))
    }

    /// Blank white surface.
    pub fn blank(width: u32, height: u32) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])))
    }
}

impl DrawingSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.background.dimensions()
    }

    fn add_object(&mut self, mut object: DrawingObject) -> ObjectId {
        object.id = self.next_id;
        self.next_id += 1;
        let id = object.id;
        self.objects.push(object);
        id
    }

    fn remove_object(&mut self, id: ObjectId) -> Option<DrawingObject> {
        let index = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(index))
    }

    fn objects(&self) -> &[DrawingObject] {
        &self.objects
    }

    fn to_json(&self) -> Result<String> {
        let snapshot = SurfaceSnapshot {
            objects: self.objects.clone(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    fn load_json(&mut self, json: &str) -> Result<()> {
        let snapshot: SurfaceSnapshot = serde_json::from_str(json)?;
        self.next_id = snapshot
            .objects
            .iter()
            .map(|o| o.id)
            .max()
            .unwrap_or(0)
            .max(self.next_id - 1)
            + 1;
        self.objects = snapshot.objects;
        Ok(())
    }

    fn hit_test(&self, x: f32, y: f32) -> Option<ObjectId> {
        self.objects
            .iter()
            .rev()
            .find(|object| object.contains(x, y))
            .map(|object| object.id)
    }

    fn render_png(&self) -> Result<Vec<u8>> {
        let mut canvas = self.background.clone();
        for object in &self.objects {
            paint(&mut canvas, object);
        }
        let mut bytes = Vec::new();
        canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}

fn distance_to_segment(px: f32, py: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((px - a.0) * dx + (py - a.1) * dy) / length_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

/// Alpha-blend `color` over the pixel at `(x, y)` if it is on the canvas.
fn blend(canvas: &mut RgbaImage, x: i64, y: i64, color: Color) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    let [r, g, b, a] = color.0;
    let alpha = a as f32 / 255.0;
    for (channel, value) in pixel.0.iter_mut().take(3).zip([r, g, b]) {
        *channel = (value as f32 * alpha + *channel as f32 * (1.0 - alpha)).round() as u8;
    }
    pixel.0[3] = pixel.0[3].max(a);
}

/// Paint every pixel whose center satisfies `inside` within the given bounds.
fn fill_where(
    canvas: &mut RgbaImage,
    bounds: (f32, f32, f32, f32),
    color: Color,
    inside: impl Fn(f32, f32) -> bool,
) {
    let (min_x, min_y, max_x, max_y) = bounds;
    let (width, height) = (canvas.width() as f32, canvas.height() as f32);
    let x0 = min_x.floor().max(0.0) as i64;
    let y0 = min_y.floor().max(0.0) as i64;
    let x1 = max_x.ceil().min(width) as i64;
    let y1 = max_y.ceil().min(height) as i64;
    for y in y0..y1 {
        for x in x0..x1 {
            if inside(x as f32 + 0.5, y as f32 + 0.5) {
                blend(canvas, x, y, color);
            }
        }
    }
}

fn paint(canvas: &mut RgbaImage, object: &DrawingObject) {
    let half = object.stroke_width / 2.0;
    let (min_x, min_y, max_x, max_y) = object.shape.bounds();
    let padded = (min_x - half, min_y - half, max_x + half, max_y + half);

    match &object.shape {
        Shape::Rect { .. } => {
            if let Some(fill) = object.fill {
                fill_where(canvas, (min_x, min_y, max_x, max_y), fill, |_, _| true);
            }
            fill_where(canvas, padded, object.stroke, |x, y| {
                let inner = x > min_x + half && x < max_x - half && y > min_y + half && y < max_y - half;
                !inner
            });
        }
        Shape::Ellipse { .. } => {
            let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
            let (rx, ry) = ((max_x - min_x) / 2.0, (max_y - min_y) / 2.0);
            if rx <= 0.0 || ry <= 0.0 {
                return;
            }
            let norm = |x: f32, y: f32, grow: f32| {
                ((x - cx) / (rx + grow)).powi(2) + ((y - cy) / (ry + grow)).powi(2)
            };
            if let Some(fill) = object.fill {
                fill_where(canvas, (min_x, min_y, max_x, max_y), fill, |x, y| norm(x, y, 0.0) <= 1.0);
            }
            fill_where(canvas, padded, object.stroke, |x, y| {
                norm(x, y, half) <= 1.0 && norm(x, y, -half) > 1.0
            });
        }
        Shape::Line { .. } | Shape::Arrow { .. } | Shape::Path { .. } => {
            let segments = object.shape.segments();
            fill_where(canvas, padded, object.stroke, |x, y| {
                segments
                    .iter()
                    .any(|(a, b)| distance_to_segment(x, y, *a, *b) <= half.max(0.5))
            });
        }
        Shape::Text { content, .. } => {
            // Glyphs are drawn by the host canvas; the raster keeps the background
            log::debug!("Text '{}' not rasterized", content);
        }
    }
}
