use egui::{Align2, Color32, FontId, Pos2, Rect, Stroke, Vec2};

use crate::context::EditorContext;
use crate::document::Document;
use crate::element::{Element, Shape};
use crate::geometry::distance;
use crate::layer::{FALLBACK_FILL, FALLBACK_OUTLINE};
use crate::session::ToolKind;

const GRID_COLOR: Color32 = Color32::from_gray(220);
const SELECTION_COLOR: Color32 = Color32::from_rgb(0x1e, 0x6f, 0xd8);
const LABEL_COLOR: Color32 = Color32::from_gray(40);
const OUTLINE_WIDTH: f32 = 2.0;
const PREVIEW_WIDTH: f32 = 1.5;
const VERTEX_RADIUS: f32 = 3.0;

/// Stateless draw pass over the canvas painter.
///
/// Rendering is a pure read of the document and the session's transient
/// state; calling it any number of times mutates nothing.
#[derive(Debug, Default)]
pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    /// Repaints the whole canvas: grid, elements bottom-to-top, selection
    /// highlight, then the in-progress preview on top.
    ///
    /// `cursor` is the live pointer position in canvas coordinates, used for
    /// the rubber-band and drag previews.
    pub fn render(
        &self,
        painter: &egui::Painter,
        canvas: Rect,
        context: &EditorContext,
        cursor: Option<Pos2>,
    ) {
        let origin = canvas.min.to_vec2();
        let document = &context.document;

        if document.grid.enabled {
            self.draw_grid(painter, canvas, document.grid.size.max(1) as f32);
        }

        for element in document.elements_in_z_order() {
            match document.layer(&element.layer) {
                Some(layer) if !layer.visible => continue,
                Some(layer) => self.draw_element(painter, origin, element, document, layer.opacity),
                // Unknown layer key: draw unmodulated rather than lose the element.
                None => self.draw_element(painter, origin, element, document, 1.0),
            }
        }

        if let Some(element) = context.selection.selected_element(document) {
            self.draw_selection(painter, origin, element);
        }

        self.draw_preview(painter, origin, context, cursor);
    }

    fn draw_grid(&self, painter: &egui::Painter, canvas: Rect, step: f32) {
        let stroke = Stroke::new(1.0, GRID_COLOR);
        let mut x = canvas.left();
        while x <= canvas.right() {
            painter.line_segment(
                [Pos2::new(x, canvas.top()), Pos2::new(x, canvas.bottom())],
                stroke,
            );
            x += step;
        }
        let mut y = canvas.top();
        while y <= canvas.bottom() {
            painter.line_segment(
                [Pos2::new(canvas.left(), y), Pos2::new(canvas.right(), y)],
                stroke,
            );
            y += step;
        }
    }

    fn draw_element(
        &self,
        painter: &egui::Painter,
        origin: Vec2,
        element: &Element,
        document: &Document,
        layer_opacity: f32,
    ) {
        let style = document.resolved_style(element);
        let outline = with_alpha(style.outline_color, style.outline_alpha * layer_opacity);
        let fill = with_alpha(style.fill_color, style.fill_alpha * layer_opacity);
        let stroke = Stroke::new(OUTLINE_WIDTH, outline);

        match &element.shape {
            Shape::Rectangle {
                x,
                y,
                width,
                height,
            } => {
                let rect = Rect::from_min_size(Pos2::new(*x, *y), Vec2::new(*width, *height))
                    .translate(origin);
                painter.rect(rect, 0.0, fill, stroke);
            }
            Shape::Circle { x, y, radius } => {
                painter.circle(Pos2::new(*x, *y) + origin, *radius, fill, stroke);
            }
            Shape::Polygon { points } => {
                let screen: Vec<Pos2> = points.iter().map(|p| *p + origin).collect();
                painter.add(egui::Shape::convex_polygon(screen, fill, stroke));
            }
            Shape::Path { points } => {
                let screen: Vec<Pos2> = points.iter().map(|p| *p + origin).collect();
                painter.add(egui::Shape::line(screen, stroke));
            }
            Shape::Line { x1, y1, x2, y2 } => {
                painter.line_segment(
                    [Pos2::new(*x1, *y1) + origin, Pos2::new(*x2, *y2) + origin],
                    stroke,
                );
            }
        }

        if let Some(label) = &element.label {
            let center = element.bounding_rect().center() + origin;
            painter.text(
                center,
                Align2::CENTER_CENTER,
                label,
                FontId::proportional(13.0),
                LABEL_COLOR,
            );
        }
    }

    /// Dashed outline around the selected element's bounds.
    fn draw_selection(&self, painter: &egui::Painter, origin: Vec2, element: &Element) {
        let bounds = element.bounding_rect().translate(origin).expand(4.0);
        let stroke = Stroke::new(1.5, SELECTION_COLOR);
        let corners = [
            bounds.left_top(),
            bounds.right_top(),
            bounds.right_bottom(),
            bounds.left_bottom(),
            bounds.left_top(),
        ];
        for pair in corners.windows(2) {
            painter.extend(egui::Shape::dashed_line(pair, stroke, 5.0, 4.0));
        }
    }

    /// Live overlay for the shape under construction. Nothing drawn here is
    /// ever part of the document.
    fn draw_preview(
        &self,
        painter: &egui::Painter,
        origin: Vec2,
        context: &EditorContext,
        cursor: Option<Pos2>,
    ) {
        let layer = context.document.layer(&context.active_layer);
        let outline = layer.map(|l| l.outline_color).unwrap_or(FALLBACK_OUTLINE);
        let fill = with_alpha(layer.map(|l| l.fill_color).unwrap_or(FALLBACK_FILL), 0.15);
        let stroke = Stroke::new(PREVIEW_WIDTH, with_alpha(outline, 0.9));

        match context.session.active_tool() {
            Some(ToolKind::Rectangle) => {
                if let (Some(anchor), Some(cursor)) = (context.session.drag_anchor(), cursor) {
                    let rect = Rect::from_two_pos(anchor + origin, cursor + origin);
                    painter.rect(rect, 0.0, fill, stroke);
                }
            }
            Some(ToolKind::Circle) => {
                if let (Some(anchor), Some(cursor)) = (context.session.drag_anchor(), cursor) {
                    painter.circle(anchor + origin, distance(anchor, cursor), fill, stroke);
                }
            }
            Some(ToolKind::Line) => {
                if let (Some(anchor), Some(cursor)) = (context.session.drag_anchor(), cursor) {
                    painter.line_segment([anchor + origin, cursor + origin], stroke);
                }
            }
            Some(ToolKind::Polygon) | Some(ToolKind::Path) => {
                let points = context.session.in_progress();
                if points.is_empty() {
                    return;
                }
                let screen: Vec<Pos2> = points.iter().map(|p| *p + origin).collect();
                if screen.len() >= 2 {
                    painter.add(egui::Shape::line(screen.clone(), stroke));
                }
                for p in &screen {
                    painter.circle_filled(*p, VERTEX_RADIUS, stroke.color);
                }
                // Rubber band from the last committed vertex to the cursor.
                if let Some(cursor) = cursor {
                    let last = screen[screen.len() - 1];
                    painter.extend(egui::Shape::dashed_line(
                        &[last, cursor + origin],
                        stroke,
                        6.0,
                        4.0,
                    ));
                }
            }
            Some(ToolKind::Freehand) => {
                let points = context.session.in_progress();
                if points.len() >= 2 {
                    let screen: Vec<Pos2> = points.iter().map(|p| *p + origin).collect();
                    painter.add(egui::Shape::line(screen, stroke));
                }
            }
            Some(ToolKind::Select) | None => {}
        }
    }
}

fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}
