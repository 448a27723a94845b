//! Preview and export compositing.
//!
//! # Single draw path
//!
//! [`draw_layer`] is the only function that puts a layer on a surface. The
//! live preview, the composite, the aggregate mask and every per-slot mask go
//! through it with the matrix from [`AffineState::forward`], so preview and
//! export cannot drift apart. The gizmo overlay is drawn only on the preview
//! surface, after all layers.
//!
//! Surfaces are premultiplied `tiny_skia::Pixmap`s; anything handed out is
//! converted to straight RGBA first.

mod overlay;
pub(crate) mod surface;

pub use overlay::draw_overlay;
pub use surface::{new_surface, to_straight_rgba};

use image::RgbaImage;
use thiserror::Error;
use tiny_skia::{BlendMode, FilterQuality, Pixmap, PixmapPaint};
use tracing::debug;

use crate::affine::AffineState;
use crate::config::MASK_SLOT_COUNT;
use crate::geometry::{Affine, CanvasFrame};
use crate::layers::{LayerImage, LayerStack};
use crate::mask::{alpha_to_grayscale, assemble_slots};

/// Errors raised while compositing.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The rasteriser refused a surface of this size.
    #[error("Cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },

    /// Source pixels don't match the surface size.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    PixelData { expected: usize, actual: usize },
}

/// Whether the preview includes the active layer's handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Visible,
    Hidden,
}

/// Everything the completion call carries, as straight RGBA.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    /// Background plus all layers.
    pub composite: RgbaImage,
    /// All layers, no background, alpha as gray.
    pub mask: RgbaImage,
    /// One mask per original slot; unused slots hold the placeholder.
    pub layer_masks: [RgbaImage; MASK_SLOT_COUNT],
}

/// Draw one layer with its placement.
pub fn draw_layer(target: &mut Pixmap, image: &LayerImage, state: &AffineState, canvas: CanvasFrame) {
    let paint = PixmapPaint {
        opacity: state.opacity() as f32,
        blend_mode: BlendMode::SourceOver,
        quality: FilterQuality::Bilinear,
    };
    let transform = state.forward(canvas, image.size()).to_skia();
    target.draw_pixmap(0, 0, image.pixmap(), &paint, transform, None);
}

/// Stretch the background over the whole canvas.
pub fn draw_background(target: &mut Pixmap, background: &LayerImage, canvas: CanvasFrame) {
    let size = background.size();
    let stretch = Affine::IDENTITY.scale(
        canvas.width() as f64 / size.width as f64,
        canvas.height() as f64 / size.height as f64,
    );
    target.draw_pixmap(
        0,
        0,
        background.pixmap(),
        &PixmapPaint::default(),
        stretch.to_skia(),
        None,
    );
}

fn draw_stack(target: &mut Pixmap, stack: &LayerStack) {
    let canvas = stack.canvas();
    for (layer, state) in stack.draw_list() {
        draw_layer(target, layer.image(), &state, canvas);
    }
}

/// Owns the on-screen surface and produces export surfaces on demand.
#[derive(Debug, Clone)]
pub struct Compositor {
    canvas: CanvasFrame,
    preview: Pixmap,
}

impl Compositor {
    pub fn new(canvas: CanvasFrame) -> Result<Self, RenderError> {
        Ok(Self {
            canvas,
            preview: new_surface(canvas.width(), canvas.height())?,
        })
    }

    pub fn canvas(&self) -> CanvasFrame {
        self.canvas
    }

    /// Redraw the preview: background, layers in display order, overlay.
    pub fn render_preview(&mut self, background: &LayerImage, stack: &LayerStack, overlay: Overlay) {
        self.preview.fill(tiny_skia::Color::TRANSPARENT);
        draw_background(&mut self.preview, background, self.canvas);
        draw_stack(&mut self.preview, stack);
        if overlay == Overlay::Visible {
            draw_overlay(&mut self.preview, stack.gizmo());
        }
    }

    /// Premultiplied preview surface as last rendered.
    pub fn preview(&self) -> &Pixmap {
        &self.preview
    }

    /// Straight RGBA copy of the preview.
    pub fn preview_rgba(&self) -> RgbaImage {
        to_straight_rgba(&self.preview)
    }

    /// Render composite, aggregate mask and per-slot masks on fresh surfaces.
    pub fn render_export(
        &self,
        background: &LayerImage,
        stack: &LayerStack,
    ) -> Result<ExportBundle, RenderError> {
        let (width, height) = (self.canvas.width(), self.canvas.height());

        let mut composite = new_surface(width, height)?;
        draw_background(&mut composite, background, self.canvas);
        draw_stack(&mut composite, stack);

        let mut aggregate = new_surface(width, height)?;
        draw_stack(&mut aggregate, stack);

        let mut per_layer = Vec::with_capacity(stack.len());
        for (layer, state) in stack.draw_list() {
            let mut surface = new_surface(width, height)?;
            draw_layer(&mut surface, layer.image(), &state, self.canvas);
            per_layer.push((layer.slot(), alpha_to_grayscale(&surface)));
        }
        debug!(layers = per_layer.len(), width, height, "rendered export surfaces");

        Ok(ExportBundle {
            composite: to_straight_rgba(&composite),
            mask: alpha_to_grayscale(&aggregate),
            layer_masks: assemble_slots(per_layer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::geometry::Point;
    use crate::layers::{Layer, LayerSlot};
    use crate::mask::placeholder_mask;

    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn canvas() -> CanvasFrame {
        CanvasFrame::new(100, 100).unwrap()
    }

    fn placed(slot: u8, w: u32, h: u32, rgba: [u8; 4], at: (f64, f64), opacity: f64) -> Layer {
        let mut state = AffineState::identity();
        state.translate(at.0, at.1);
        state.set_opacity(opacity);
        Layer::new(
            format!("layer {}", slot),
            LayerSlot::new(slot).unwrap(),
            LayerImage::filled(w, h, rgba).unwrap(),
            opacity,
        )
        .with_transform(state)
    }

    fn two_layer_stack() -> LayerStack {
        let red = placed(1, 20, 20, [255, 0, 0, 255], (0.0, 0.0), 1.0);
        let green = placed(2, 10, 10, [0, 255, 0, 255], (20.0, 0.0), 0.5);
        LayerStack::new(vec![red, green], canvas(), &EditorConfig::default()).unwrap()
    }

    fn background() -> LayerImage {
        LayerImage::filled(4, 4, BLUE).unwrap()
    }

    fn assert_near(actual: [u8; 4], expected: [u8; 4]) {
        for (a, e) in actual.iter().zip(expected) {
            assert!((*a as i16 - e as i16).abs() <= 1, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_reference_composite() {
        let compositor = Compositor::new(canvas()).unwrap();
        let bundle = compositor.render_export(&background(), &two_layer_stack()).unwrap();
        let px = |x, y| bundle.composite.get_pixel(x, y).0;

        // Red layer spans 40..60, green 65..75 at half opacity.
        assert_near(px(50, 50), [255, 0, 0, 255]);
        assert_near(px(70, 50), [0, 128, 128, 255]);
        assert_near(px(10, 10), BLUE);
        assert_near(px(90, 90), BLUE);
    }

    #[test]
    fn test_preview_without_overlay_matches_export() {
        let stack = two_layer_stack();
        let mut compositor = Compositor::new(canvas()).unwrap();
        compositor.render_preview(&background(), &stack, Overlay::Hidden);
        let bundle = compositor.render_export(&background(), &stack).unwrap();
        assert_eq!(compositor.preview_rgba(), bundle.composite);
    }

    #[test]
    fn test_overlay_only_touches_its_bounds() {
        let config = EditorConfig {
            screen_width: 800,
            screen_height: 600,
            ..EditorConfig::default()
        };
        let canvas = CanvasFrame::new(400, 400).unwrap();
        let small = placed(1, 20, 20, [255, 0, 0, 255], (-120.0, 100.0), 1.0);
        let stack = LayerStack::new(vec![small], canvas, &config).unwrap();
        let bg = background();

        let mut compositor = Compositor::new(canvas).unwrap();
        compositor.render_preview(&bg, &stack, Overlay::Visible);
        let preview = compositor.preview_rgba();
        let composite = compositor.render_export(&bg, &stack).unwrap().composite;

        let (min, max) = stack.gizmo().overlay_bounds();
        let mut differing_inside = 0;
        for (x, y, p) in preview.enumerate_pixels() {
            let inside = (x as f64) >= min.x.floor()
                && (x as f64) <= max.x.ceil()
                && (y as f64) >= min.y.floor()
                && (y as f64) <= max.y.ceil();
            if inside {
                if *p != *composite.get_pixel(x, y) {
                    differing_inside += 1;
                }
            } else {
                assert_eq!(*p, *composite.get_pixel(x, y), "overlay leaked at {},{}", x, y);
            }
        }
        assert!(differing_inside > 0, "overlay was not drawn");
    }

    #[test]
    fn test_aggregate_mask_has_no_background() {
        let compositor = Compositor::new(canvas()).unwrap();
        let bundle = compositor.render_export(&background(), &two_layer_stack()).unwrap();
        assert_eq!(bundle.mask.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(bundle.mask.get_pixel(50, 50).0, [255, 255, 255, 255]);
        assert_near(bundle.mask.get_pixel(70, 50).0, [128, 128, 128, 255]);
    }

    #[test]
    fn test_layer_masks_follow_original_slot() {
        let first = placed(1, 10, 10, [9, 9, 9, 255], (0.0, 0.0), 1.0);
        let second = placed(2, 10, 10, [9, 9, 9, 255], (30.0, 0.0), 1.0);
        let third = placed(3, 10, 10, [9, 9, 9, 255], (-30.0, 0.0), 1.0);
        let mut stack =
            LayerStack::new(vec![first, second, third], canvas(), &EditorConfig::default())
                .unwrap();
        assert!(stack.reorder(2, 0));
        let order: Vec<u8> = stack.layers().iter().map(|l| l.slot().get()).collect();
        assert_eq!(order, vec![3, 1, 2]);

        let mut compositor = Compositor::new(canvas()).unwrap();
        compositor.render_preview(&background(), &stack, Overlay::Hidden);
        let bundle = compositor.render_export(&background(), &stack).unwrap();
        assert_eq!(compositor.preview_rgba(), bundle.composite);

        let white = [255, 255, 255, 255];
        // slot 1 sits at the center, slot 2 to the right, slot 3 to the left
        assert_eq!(bundle.layer_masks[0].get_pixel(50, 50).0, white);
        assert_eq!(bundle.layer_masks[0].get_pixel(80, 50).0, [0, 0, 0, 255]);
        assert_eq!(bundle.layer_masks[1].get_pixel(80, 50).0, white);
        assert_eq!(bundle.layer_masks[2].get_pixel(20, 50).0, white);
        for mask in &bundle.layer_masks[3..] {
            assert_eq!(*mask, placeholder_mask());
        }
    }

    #[test]
    fn test_preview_uses_live_gizmo_state() {
        let mut stack = two_layer_stack();
        stack.gizmo_mut().state_mut().set_position(Point::new(-40.0, -40.0));
        let mut compositor = Compositor::new(canvas()).unwrap();
        compositor.render_preview(&background(), &stack, Overlay::Hidden);
        let preview = compositor.preview_rgba();
        assert_near(preview.get_pixel(10, 10).0, [255, 0, 0, 255]);
        assert_near(preview.get_pixel(50, 50).0, BLUE);
    }

    #[test]
    fn test_background_stretches() {
        let mut target = new_surface(10, 6).unwrap();
        let bg = LayerImage::filled(2, 3, BLUE).unwrap();
        draw_background(&mut target, &bg, CanvasFrame::new(10, 6).unwrap());
        let rgba = to_straight_rgba(&target);
        assert_eq!(rgba.get_pixel(5, 3).0, BLUE);
        assert_eq!(rgba.get_pixel(0, 0).0, BLUE);
        assert_eq!(rgba.get_pixel(9, 5).0, BLUE);
    }
}
