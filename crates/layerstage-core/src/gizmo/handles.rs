//! Handle identities and their object-space layout.

use serde::Serialize;

use crate::geometry::{Point, Size};

/// Which corner of the padded bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomRight,
        Corner::BottomLeft,
    ];

    /// Sign of the corner along each local axis.
    pub fn direction(self) -> (f64, f64) {
        match self {
            Corner::TopLeft => (-1.0, -1.0),
            Corner::TopRight => (1.0, -1.0),
            Corner::BottomRight => (1.0, 1.0),
            Corner::BottomLeft => (-1.0, 1.0),
        }
    }
}

/// Which edge midpoint of the padded bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Top, Edge::Right, Edge::Bottom, Edge::Left];
}

/// Result of a hit test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "at", rename_all = "snake_case")]
pub enum Handle {
    Corner(Corner),
    Edge(Edge),
    Rotate,
    /// Inside the padded box but not on a handle.
    Body,
}

/// Handle sizing in object-space units.
///
/// Derived from the display diagonal so handles stay usable on dense screens,
/// with hard floors for small ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HandleMetrics {
    pub border_width: f64,
    pub handle_size: f64,
    pub rotate_distance: f64,
    pub hit_radius: f64,
}

impl HandleMetrics {
    pub fn from_screen(width: u32, height: u32) -> Self {
        let diagonal = (width as f64).hypot(height as f64);
        Self {
            border_width: (diagonal * 0.002).max(4.0),
            handle_size: (diagonal * 0.008).max(16.0),
            rotate_distance: (diagonal * 0.02).max(48.0),
            hit_radius: (diagonal * 0.01).max(32.0),
        }
    }

    /// Gap between the image edge and the bounding box.
    pub fn padding(&self) -> f64 {
        self.handle_size
    }

    /// Half extents of the padded bounding box around an image.
    pub fn padded_half_extents(&self, image: Size) -> (f64, f64) {
        let (hw, hh) = image.half_extents();
        (hw + self.padding(), hh + self.padding())
    }
}

/// Every handle with its object-space center, in hit-test priority order:
/// corners, then edges, then rotate.
pub fn handle_layout(image: Size, metrics: &HandleMetrics) -> [(Handle, Point); 9] {
    let (hw, hh) = metrics.padded_half_extents(image);
    let corner = |c: Corner| {
        let (sx, sy) = c.direction();
        (Handle::Corner(c), Point::new(sx * hw, sy * hh))
    };
    let edge = |e: Edge| {
        let at = match e {
            Edge::Top => Point::new(0.0, -hh),
            Edge::Right => Point::new(hw, 0.0),
            Edge::Bottom => Point::new(0.0, hh),
            Edge::Left => Point::new(-hw, 0.0),
        };
        (Handle::Edge(e), at)
    };
    let [c0, c1, c2, c3] = Corner::ALL.map(corner);
    let [e0, e1, e2, e3] = Edge::ALL.map(edge);
    [
        c0,
        c1,
        c2,
        c3,
        e0,
        e1,
        e2,
        e3,
        (Handle::Rotate, Point::new(0.0, -hh - metrics.rotate_distance)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_floors_on_small_screen() {
        let m = HandleMetrics::from_screen(800, 600);
        assert_eq!(m.border_width, 4.0);
        assert_eq!(m.handle_size, 16.0);
        assert_eq!(m.rotate_distance, 48.0);
        assert_eq!(m.hit_radius, 32.0);
    }

    #[test]
    fn test_metrics_scale_with_large_screen() {
        // 6000x8000 has a diagonal of 10000
        let m = HandleMetrics::from_screen(6000, 8000);
        assert!((m.border_width - 20.0).abs() < 1e-9);
        assert!((m.handle_size - 80.0).abs() < 1e-9);
        assert!((m.rotate_distance - 200.0).abs() < 1e-9);
        assert!((m.hit_radius - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_layout_order_and_positions() {
        let m = HandleMetrics::from_screen(800, 600);
        let layout = handle_layout(Size::new(100, 60), &m);
        assert_eq!(layout[0], (Handle::Corner(Corner::TopLeft), Point::new(-66.0, -46.0)));
        assert_eq!(layout[2].0, Handle::Corner(Corner::BottomRight));
        assert_eq!(layout[4], (Handle::Edge(Edge::Top), Point::new(0.0, -46.0)));
        assert_eq!(layout[7], (Handle::Edge(Edge::Left), Point::new(-66.0, 0.0)));
        assert_eq!(layout[8], (Handle::Rotate, Point::new(0.0, -94.0)));
    }

    #[test]
    fn test_handle_serializes_tagged() {
        let json = serde_json::to_string(&Handle::Corner(Corner::TopLeft)).unwrap();
        assert_eq!(json, r#"{"kind":"corner","at":"top_left"}"#);
        let json = serde_json::to_string(&Handle::Body).unwrap();
        assert_eq!(json, r#"{"kind":"body"}"#);
    }
}
