//! Gizmo overlay: dashed frame, handles and rotation stem.
//!
//! Everything is drawn in the gizmo's object frame, so line widths and handle
//! radii scale with the layer exactly as hit testing does.

use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, StrokeDash, Transform};

use crate::gizmo::{handle_layout, Handle, TransformGizmo};

const PRIMARY: [u8; 4] = [0x21, 0x96, 0xF3, 0xFF];
const HANDLE: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];
const SHADOW: [u8; 4] = [0, 0, 0, 77];

fn paint([r, g, b, a]: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn stroke(width: f32, dash: Option<f32>) -> Stroke {
    Stroke {
        width,
        dash: dash.and_then(|len| StrokeDash::new(vec![len, len], 0.0)),
        ..Stroke::default()
    }
}

/// Draw the overlay for `gizmo` on top of `target`.
pub fn draw_overlay(target: &mut Pixmap, gizmo: &TransformGizmo) {
    let transform = gizmo.state().object_to_canvas(gizmo.canvas()).to_skia();
    let metrics = gizmo.metrics();
    let (hw, hh) = metrics.padded_half_extents(gizmo.image_size());
    let border = metrics.border_width as f32;
    let handle = metrics.handle_size as f32;
    let (hw, hh) = (hw as f32, hh as f32);

    if let Some(rect) = Rect::from_ltrb(-hw, -hh, hw, hh) {
        let frame = PathBuilder::from_rect(rect);
        target.stroke_path(
            &frame,
            &paint(PRIMARY),
            &stroke(border, Some(border * 4.0)),
            transform,
            None,
        );
    }

    for (kind, at) in handle_layout(gizmo.image_size(), metrics) {
        if kind == Handle::Rotate {
            continue;
        }
        draw_knob(target, at.x as f32, at.y as f32, handle * 0.5, handle * 0.6, border, transform);
    }

    let stem_top = -hh - metrics.rotate_distance as f32;
    let mut stem = PathBuilder::new();
    stem.move_to(0.0, -hh);
    stem.line_to(0.0, stem_top);
    if let Some(stem) = stem.finish() {
        target.stroke_path(
            &stem,
            &paint(PRIMARY),
            &stroke(border, Some(border * 2.0)),
            transform,
            None,
        );
    }

    let knob = handle * 0.8;
    draw_knob(target, 0.0, stem_top, knob, knob * 1.1, border, transform);
}

/// Shadow disc, then a white disc with a primary ring.
fn draw_knob(
    target: &mut Pixmap,
    x: f32,
    y: f32,
    radius: f32,
    shadow_radius: f32,
    border: f32,
    transform: Transform,
) {
    if let Some(shadow) = PathBuilder::from_circle(x, y, shadow_radius) {
        target.fill_path(&shadow, &paint(SHADOW), FillRule::Winding, transform, None);
    }
    if let Some(disc) = PathBuilder::from_circle(x, y, radius) {
        target.fill_path(&disc, &paint(HANDLE), FillRule::Winding, transform, None);
        target.stroke_path(&disc, &paint(PRIMARY), &stroke(border, None), transform, None);
    }
}
