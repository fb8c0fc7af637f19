//! Zoom and pan state of the editor canvas.

use crate::config::EditorConfig;

/// Lower zoom bound used before an image is fitted.
pub const DEFAULT_MIN_ZOOM: f32 = 0.1;

/// Base of the wheel zoom curve: `zoom *= WHEEL_ZOOM_BASE ^ delta`.
pub const WHEEL_ZOOM_BASE: f32 = 0.999;

/// Fallback for a zoom step that would not change the zoom.
const FALLBACK_ZOOM_STEP: f32 = 1.2;

/// Pan/zoom state with the bounds the editor enforces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Current zoom factor
    pub zoom: f32,
    /// Horizontal pan in screen pixels
    pub pan_x: f32,
    /// Vertical pan in screen pixels
    pub pan_y: f32,
    min_zoom: f32,
    max_zoom: f32,
    step: f32,
}

impl Viewport {
    /// Viewport at 100% with bounds from the editor settings.
    ///
    /// The upper bound is at least 1.0 and the step greater than 1.0.
    pub fn new(config: &EditorConfig) -> Self {
        let step = if config.zoom_step.is_finite() && config.zoom_step > 1.0 {
            config.zoom_step
        } else {
            log::warn!("Ignoring zoom step {}, using {}", config.zoom_step, FALLBACK_ZOOM_STEP);
            FALLBACK_ZOOM_STEP
        };
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: config.max_zoom.max(1.0),
            step,
        }
    }

    /// Smallest allowed zoom.
    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    /// Largest allowed zoom.
    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    /// Fit an image into its container.
    ///
    /// The fitted scale never exceeds 1.0, so small images are shown at their
    /// real size. That scale becomes the lower zoom bound.
    pub fn fit(&mut self, image_width: u32, image_height: u32, container_width: f32, container_height: f32) {
        if image_width == 0 || image_height == 0 || container_width <= 0.0 || container_height <= 0.0 {
            log::warn!("Cannot fit {}x{} into {}x{}", image_width, image_height, container_width, container_height);
            return;
        }
        let scale_x = container_width / image_width as f32;
        let scale_y = container_height / image_height as f32;
        let fit = scale_x.min(scale_y).min(1.0).min(self.max_zoom);

        self.min_zoom = fit;
        self.zoom = fit;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * self.step).min(self.max_zoom);
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / self.step).max(self.min_zoom);
        if self.zoom <= self.min_zoom {
            self.pan_x = 0.0;
            self.pan_y = 0.0;
        }
    }

    /// Apply a mouse wheel delta. Positive deltas zoom out.
    pub fn wheel(&mut self, delta: f32) {
        let zoom = self.zoom * WHEEL_ZOOM_BASE.powf(delta);
        self.zoom = zoom.max(self.min_zoom).min(self.max_zoom);
    }

    /// Pan by a screen-space delta. Ignored while fully zoomed out.
    pub fn pan_by(&mut self, dx: f32, dy: f32) -> bool {
        if self.zoom <= self.min_zoom {
            return false;
        }
        self.pan_x += dx;
        self.pan_y += dy;
        true
    }

    /// Convert a screen point to image coordinates.
    pub fn to_image(&self, screen_x: f32, screen_y: f32) -> (f32, f32) {
        ((screen_x - self.pan_x) / self.zoom, (screen_y - self.pan_y) / self.zoom)
    }

    /// Zoom level for the toolbar, e.g. `"120%"`.
    pub fn percent_label(&self) -> String {
        format!("{}%", (self.zoom * 100.0).round() as i32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_zoom_in_capped() {
        let mut viewport = Viewport::default();
        for _ in 0..20 {
            viewport.zoom_in();
        }
        assert!(approx_eq(viewport.zoom, 5.0));
        assert_eq!(viewport.percent_label(), "500%");
    }

    #[test]
    fn test_zoom_step() {
        let mut viewport = Viewport::default();
        viewport.zoom_in();
        assert!(approx_eq(viewport.zoom, 1.2));
        assert_eq!(viewport.percent_label(), "120%");
        viewport.zoom_out();
        assert!(approx_eq(viewport.zoom, 1.0));
    }

    #[test]
    fn test_default_min_zoom() {
        let mut viewport = Viewport::default();
        for _ in 0..50 {
            viewport.zoom_out();
        }
        assert!(approx_eq(viewport.zoom, DEFAULT_MIN_ZOOM));
    }

    #[test]
    fn test_fit_large_image() {
        let mut viewport = Viewport::default();
        viewport.fit(2000, 1000, 800.0, 600.0);
        assert!(approx_eq(viewport.zoom, 0.4));
        assert!(approx_eq(viewport.min_zoom(), 0.4));

        viewport.zoom_out();
        assert!(approx_eq(viewport.zoom, 0.4));
    }

    #[test]
    fn test_fit_small_image_stays_at_real_size() {
        let mut viewport = Viewport::default();
        viewport.fit(100, 50, 800.0, 600.0);
        assert!(approx_eq(viewport.zoom, 1.0));
    }

    #[test]
    fn test_fit_ignores_empty_sizes() {
        let mut viewport = Viewport::default();
        viewport.fit(0, 100, 800.0, 600.0);
        assert!(approx_eq(viewport.zoom, 1.0));
        assert!(approx_eq(viewport.min_zoom(), DEFAULT_MIN_ZOOM));
    }

    #[test]
    fn test_wheel_zoom() {
        let mut viewport = Viewport::default();
        viewport.wheel(-100.0);
        assert!(approx_eq(viewport.zoom, 0.999f32.powf(-100.0)));
        assert!(viewport.zoom > 1.0);

        viewport.wheel(100_000.0);
        assert!(approx_eq(viewport.zoom, DEFAULT_MIN_ZOOM));
    }

    #[test]
    fn test_bad_bounds_are_tamed() {
        let config = EditorConfig {
            max_zoom: 0.5,
            zoom_step: 0.0,
            ..EditorConfig::default()
        };
        let mut viewport = Viewport::new(&config);
        assert!(approx_eq(viewport.max_zoom(), 1.0));

        viewport.fit(100, 50, 800.0, 600.0);
        viewport.wheel(10.0);
        assert!(viewport.min_zoom() <= viewport.max_zoom());
        assert!(viewport.zoom > 0.0);

        viewport.zoom_in();
        assert!(approx_eq(viewport.zoom, 1.0));
        let (x, y) = viewport.to_image(10.0, 20.0);
        assert!(x.is_finite() && y.is_finite());

        viewport.zoom_out();
        assert!(viewport.zoom > 0.0);
    }

    #[test]
    fn test_pan_only_when_zoomed_in() {
        let mut viewport = Viewport::default();
        viewport.fit(2000, 1000, 800.0, 600.0);
        assert!(!viewport.pan_by(10.0, 10.0));

        viewport.zoom_in();
        assert!(viewport.pan_by(10.0, -5.0));
        assert!(approx_eq(viewport.pan_x, 10.0));
        assert!(approx_eq(viewport.pan_y, -5.0));

        let (x, y) = viewport.to_image(10.0, -5.0);
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(y, 0.0));
    }
}
