use egui::{Pos2, Rect};

use crate::document::Scale;
use crate::element::Shape;

/// Rounds each coordinate of `p` to the nearest multiple of `grid_size`.
///
/// Callers gate on `GridSettings::snap_enabled`; a non-positive grid size
/// leaves the point untouched.
pub fn snap_to_grid(p: Pos2, grid_size: f32) -> Pos2 {
    if grid_size <= 0.0 {
        return p;
    }
    Pos2::new(
        (p.x / grid_size).round() * grid_size,
        (p.y / grid_size).round() * grid_size,
    )
}

/// Euclidean distance between two points.
pub fn distance(a: Pos2, b: Pos2) -> f32 {
    a.distance(b)
}

/// Shoelace-formula area of a polygon, in square pixels.
///
/// The points are treated as a closed ring whether or not the last point
/// repeats the first. Fewer than three points have no area.
pub fn polygon_area(points: &[Pos2]) -> f32 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        sum += points[i].x * points[j].y;
        sum -= points[j].x * points[i].y;
    }
    (sum / 2.0).abs()
}

/// Real-world area of a shape in square meters, rounded to two decimals.
///
/// Lines and paths have no area; callers must not show an area for them.
pub fn area(shape: &Shape, scale: &Scale) -> Option<f32> {
    let square_pixels = match shape {
        Shape::Rectangle { width, height, .. } => width * height,
        Shape::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
        Shape::Polygon { points } => polygon_area(points),
        Shape::Path { .. } | Shape::Line { .. } => return None,
    };
    let ppm = scale.pixels_per_meter();
    Some(round2(square_pixels / (ppm * ppm)))
}

pub(crate) fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

/// Whether `p` falls inside (or on the boundary of) a shape.
///
/// Only closed shapes are hit-testable: rectangles use an inclusive bounds
/// check, circles a radius check, polygons even-odd ray casting. Lines and
/// paths always miss.
pub fn hit_test(shape: &Shape, p: Pos2) -> bool {
    match shape {
        Shape::Rectangle {
            x,
            y,
            width,
            height,
        } => p.x >= *x && p.x <= x + width && p.y >= *y && p.y <= y + height,
        Shape::Circle { x, y, radius } => distance(Pos2::new(*x, *y), p) <= *radius,
        Shape::Polygon { points } => point_in_polygon(p, points),
        Shape::Path { .. } | Shape::Line { .. } => false,
    }
}

/// Even-odd ray-casting point-in-polygon test over a closed ring.
pub fn point_in_polygon(p: Pos2, points: &[Pos2]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (points[i].x, points[i].y);
        let (xj, yj) = (points[j].x, points[j].y);
        let crosses = (yi > p.y) != (yj > p.y);
        if crosses && p.x < (xj - xi) * (p.y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Axis-aligned bounding rectangle of a shape.
pub fn bounding_rect(shape: &Shape) -> Rect {
    match shape {
        Shape::Rectangle {
            x,
            y,
            width,
            height,
        } => Rect::from_min_size(Pos2::new(*x, *y), egui::vec2(*width, *height)),
        Shape::Circle { x, y, radius } => {
            Rect::from_center_size(Pos2::new(*x, *y), egui::vec2(radius * 2.0, radius * 2.0))
        }
        Shape::Polygon { points } | Shape::Path { points } => bounds_of(points),
        Shape::Line { x1, y1, x2, y2 } => {
            Rect::from_two_pos(Pos2::new(*x1, *y1), Pos2::new(*x2, *y2))
        }
    }
}

fn bounds_of(points: &[Pos2]) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }
    let mut min = points[0];
    let mut max = points[0];
    for p in points {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect::from_min_max(min, max)
}
