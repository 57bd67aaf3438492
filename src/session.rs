use egui::Pos2;

use crate::command::Command;
use crate::document::GridSettings;
use crate::element::{Element, Shape};
use crate::geometry::{distance, snap_to_grid};
use crate::layer::LayerId;

/// A polygon press within this many pixels of the first vertex closes the
/// ring (once at least three vertices exist).
pub const POLYGON_CLOSE_RADIUS: f32 = 10.0;
/// Freehand samples closer than this to the last recorded point are dropped.
pub const FREEHAND_MIN_STEP: f32 = 2.0;
/// A freehand stroke ending within this many pixels of its start is treated
/// as a closed polygon rather than an open path.
pub const FREEHAND_CLOSE_RADIUS: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Select,
    Rectangle,
    Circle,
    Line,
    Polygon,
    Path,
    Freehand,
}

impl ToolKind {
    pub const ALL: [ToolKind; 7] = [
        ToolKind::Select,
        ToolKind::Rectangle,
        ToolKind::Circle,
        ToolKind::Line,
        ToolKind::Polygon,
        ToolKind::Path,
        ToolKind::Freehand,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::Select => "Select",
            ToolKind::Rectangle => "Rectangle",
            ToolKind::Circle => "Circle",
            ToolKind::Line => "Line",
            ToolKind::Polygon => "Polygon",
            ToolKind::Path => "Path",
            ToolKind::Freehand => "Freehand",
        }
    }
}

/// What a pointer press produced: a selection request at a point, or a
/// completed shape as a command ready for the history.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Select(Pos2),
    Commit(Command),
}

/// The interactive shape-construction state machine.
///
/// Holds only transient per-gesture state; nothing here is ever persisted.
/// Every recorded point is snapped (when snapping is enabled) before any
/// distance or threshold comparison.
pub struct DrawingSession {
    active_tool: Option<ToolKind>,
    in_progress: Vec<Pos2>,
    drag_anchor: Option<Pos2>,
    pointer_down: bool,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self {
            active_tool: None,
            in_progress: Vec::new(),
            drag_anchor: None,
            pointer_down: false,
        }
    }

    pub fn active_tool(&self) -> Option<ToolKind> {
        self.active_tool
    }

    /// Switching tools abandons any partially built shape.
    pub fn set_tool(&mut self, tool: Option<ToolKind>) {
        self.reset();
        self.active_tool = tool;
    }

    /// Vertices accumulated by the multi-point and freehand tools.
    pub fn in_progress(&self) -> &[Pos2] {
        &self.in_progress
    }

    pub fn drag_anchor(&self) -> Option<Pos2> {
        self.drag_anchor
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Discards all transient construction state (Escape).
    pub fn reset(&mut self) {
        self.in_progress.clear();
        self.drag_anchor = None;
        self.pointer_down = false;
    }

    /// Primary pointer press on the canvas, in canvas pixel coordinates.
    pub fn pointer_down(
        &mut self,
        pos: Pos2,
        grid: &GridSettings,
        layer: &LayerId,
    ) -> Option<SessionEvent> {
        let p = self.snapped(pos, grid);
        match self.active_tool {
            // No tool behaves like the select tool: a press is a hit-test.
            None | Some(ToolKind::Select) => Some(SessionEvent::Select(p)),
            Some(ToolKind::Rectangle) | Some(ToolKind::Circle) | Some(ToolKind::Line) => {
                self.drag_anchor = Some(p);
                self.pointer_down = true;
                None
            }
            Some(ToolKind::Polygon) => {
                if self.in_progress.len() >= 3
                    && distance(p, self.in_progress[0]) <= POLYGON_CLOSE_RADIUS
                {
                    let points = std::mem::take(&mut self.in_progress);
                    return Some(SessionEvent::Commit(self.commit(
                        Shape::Polygon { points },
                        layer,
                    )));
                }
                self.in_progress.push(p);
                None
            }
            Some(ToolKind::Path) => {
                self.in_progress.push(p);
                None
            }
            Some(ToolKind::Freehand) => {
                self.pointer_down = true;
                self.in_progress.clear();
                self.in_progress.push(p);
                None
            }
        }
    }

    /// Pointer motion. Only the freehand tool records points here; the other
    /// tools read the live cursor straight from the renderer for previews.
    pub fn pointer_move(&mut self, pos: Pos2, grid: &GridSettings) {
        if self.active_tool != Some(ToolKind::Freehand) || !self.pointer_down {
            return;
        }
        let p = self.snapped(pos, grid);
        match self.in_progress.last() {
            Some(last) if distance(*last, p) <= FREEHAND_MIN_STEP => {}
            _ => self.in_progress.push(p),
        }
    }

    /// Primary pointer release. Completes single-drag shapes and classifies
    /// finished freehand strokes.
    pub fn pointer_up(
        &mut self,
        pos: Pos2,
        grid: &GridSettings,
        layer: &LayerId,
    ) -> Option<Command> {
        let p = self.snapped(pos, grid);
        let was_down = std::mem::replace(&mut self.pointer_down, false);
        match self.active_tool {
            Some(ToolKind::Rectangle) => {
                let anchor = self.drag_anchor.take()?;
                // Zero-size drags are accepted as-is.
                Some(self.commit(
                    Shape::Rectangle {
                        x: anchor.x.min(p.x),
                        y: anchor.y.min(p.y),
                        width: (p.x - anchor.x).abs(),
                        height: (p.y - anchor.y).abs(),
                    },
                    layer,
                ))
            }
            Some(ToolKind::Circle) => {
                let anchor = self.drag_anchor.take()?;
                Some(self.commit(
                    Shape::Circle {
                        x: anchor.x,
                        y: anchor.y,
                        radius: distance(anchor, p),
                    },
                    layer,
                ))
            }
            Some(ToolKind::Line) => {
                let anchor = self.drag_anchor.take()?;
                Some(self.commit(
                    Shape::Line {
                        x1: anchor.x,
                        y1: anchor.y,
                        x2: p.x,
                        y2: p.y,
                    },
                    layer,
                ))
            }
            Some(ToolKind::Freehand) => {
                if !was_down {
                    return None;
                }
                let points = std::mem::take(&mut self.in_progress);
                if points.len() <= 2 {
                    return None;
                }
                let closed = distance(points[0], points[points.len() - 1]) <= FREEHAND_CLOSE_RADIUS;
                let shape = if closed {
                    Shape::Polygon { points }
                } else {
                    Shape::Path { points }
                };
                Some(self.commit(shape, layer))
            }
            _ => None,
        }
    }

    /// Secondary press: force-commits an open path of at least two points.
    /// Polygons close by clicking near the start or pressing Enter instead.
    pub fn right_click(&mut self, layer: &LayerId) -> Option<Command> {
        if self.active_tool == Some(ToolKind::Path) && self.in_progress.len() >= 2 {
            let points = std::mem::take(&mut self.in_progress);
            return Some(self.commit(Shape::Path { points }, layer));
        }
        None
    }

    /// Enter: commits the accumulated multi-point shape if it is complete
    /// (three points for a polygon, two for a path); otherwise the press is
    /// silently ignored and construction continues.
    pub fn commit_pending(&mut self, layer: &LayerId) -> Option<Command> {
        match self.active_tool {
            Some(ToolKind::Polygon) if self.in_progress.len() >= 3 => {
                let points = std::mem::take(&mut self.in_progress);
                Some(self.commit(Shape::Polygon { points }, layer))
            }
            Some(ToolKind::Path) if self.in_progress.len() >= 2 => {
                let points = std::mem::take(&mut self.in_progress);
                Some(self.commit(Shape::Path { points }, layer))
            }
            _ => None,
        }
    }

    fn commit(&mut self, shape: Shape, layer: &LayerId) -> Command {
        self.reset();
        Command::AddElement {
            element: Element::new(shape, layer.clone()),
        }
    }

    fn snapped(&self, pos: Pos2, grid: &GridSettings) -> Pos2 {
        if grid.snap_enabled {
            snap_to_grid(pos, grid.size as f32)
        } else {
            pos
        }
    }
}

impl Default for DrawingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn no_snap() -> GridSettings {
        GridSettings {
            size: 20,
            enabled: true,
            snap_enabled: false,
        }
    }

    fn layer() -> LayerId {
        LayerId::new("ground")
    }

    fn shape_of(command: Command) -> Shape {
        match command {
            Command::AddElement { element } => element.shape,
        }
    }

    #[test]
    fn tool_change_discards_partial_shape() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Polygon));
        session.pointer_down(pos2(0.0, 0.0), &no_snap(), &layer());
        session.pointer_down(pos2(50.0, 0.0), &no_snap(), &layer());
        assert_eq!(session.in_progress().len(), 2);

        session.set_tool(Some(ToolKind::Rectangle));
        assert!(session.in_progress().is_empty());
        assert!(session.drag_anchor().is_none());
    }

    #[test]
    fn rectangle_drag_normalizes_corners() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Rectangle));
        session.pointer_down(pos2(100.0, 80.0), &no_snap(), &layer());
        let cmd = session
            .pointer_up(pos2(20.0, 20.0), &no_snap(), &layer())
            .unwrap();
        assert_eq!(
            shape_of(cmd),
            Shape::Rectangle {
                x: 20.0,
                y: 20.0,
                width: 80.0,
                height: 60.0,
            }
        );
    }

    #[test]
    fn zero_size_drag_is_accepted() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Circle));
        session.pointer_down(pos2(40.0, 40.0), &no_snap(), &layer());
        let cmd = session
            .pointer_up(pos2(40.0, 40.0), &no_snap(), &layer())
            .unwrap();
        assert_eq!(
            shape_of(cmd),
            Shape::Circle {
                x: 40.0,
                y: 40.0,
                radius: 0.0,
            }
        );
    }

    #[test]
    fn release_without_press_commits_nothing() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Line));
        assert!(session
            .pointer_up(pos2(10.0, 10.0), &no_snap(), &layer())
            .is_none());
    }

    #[test]
    fn polygon_closes_near_start_point() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Polygon));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(100.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(100.0, 100.0), &grid, &layer());
        session.pointer_down(pos2(0.0, 100.0), &grid, &layer());
        // Within 10 px of the start: closes with the four accumulated points.
        let event = session.pointer_down(pos2(4.0, 3.0), &grid, &layer()).unwrap();
        let SessionEvent::Commit(cmd) = event else {
            panic!("expected a commit");
        };
        match shape_of(cmd) {
            Shape::Polygon { points } => assert_eq!(points.len(), 4),
            other => panic!("expected polygon, got {}", other.kind()),
        }
        assert!(session.in_progress().is_empty());
    }

    #[test]
    fn polygon_close_needs_three_points() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Polygon));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(100.0, 0.0), &grid, &layer());
        // Near the start but only two points: the press appends instead.
        assert!(session.pointer_down(pos2(2.0, 2.0), &grid, &layer()).is_none());
        assert_eq!(session.in_progress().len(), 3);
    }

    #[test]
    fn enter_with_too_few_points_is_ignored() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Polygon));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(50.0, 0.0), &grid, &layer());
        assert!(session.commit_pending(&layer()).is_none());
        // Construction continues with the same points.
        assert_eq!(session.in_progress().len(), 2);
    }

    #[test]
    fn enter_commits_complete_path() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Path));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(60.0, 40.0), &grid, &layer());
        let cmd = session.commit_pending(&layer()).unwrap();
        match shape_of(cmd) {
            Shape::Path { points } => assert_eq!(points.len(), 2),
            other => panic!("expected path, got {}", other.kind()),
        }
    }

    #[test]
    fn right_click_commits_path_but_not_polygon() {
        let grid = no_snap();

        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Path));
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(30.0, 30.0), &grid, &layer());
        assert!(session.right_click(&layer()).is_some());

        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Polygon));
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(30.0, 0.0), &grid, &layer());
        session.pointer_down(pos2(30.0, 30.0), &grid, &layer());
        assert!(session.right_click(&layer()).is_none());
        assert_eq!(session.in_progress().len(), 3);
    }

    #[test]
    fn escape_discards_unconditionally() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Path));
        session.pointer_down(pos2(0.0, 0.0), &no_snap(), &layer());
        session.pointer_down(pos2(10.0, 10.0), &no_snap(), &layer());
        session.reset();
        assert!(session.in_progress().is_empty());
        assert!(session.commit_pending(&layer()).is_none());
    }

    #[test]
    fn freehand_decimates_dense_samples() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Freehand));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_move(pos2(1.0, 0.0), &grid); // within 2 px, dropped
        session.pointer_move(pos2(1.5, 0.5), &grid); // still within 2 px
        session.pointer_move(pos2(5.0, 0.0), &grid); // recorded
        assert_eq!(session.in_progress().len(), 2);
    }

    #[test]
    fn freehand_classifies_closed_stroke_as_polygon() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Freehand));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_move(pos2(100.0, 0.0), &grid);
        session.pointer_move(pos2(100.0, 100.0), &grid);
        session.pointer_move(pos2(0.0, 100.0), &grid);
        // Ends 15 px from the start: inside the 20 px closing radius.
        let cmd = session
            .pointer_up(pos2(0.0, 15.0), &grid, &layer())
            .unwrap();
        match shape_of(cmd) {
            Shape::Polygon { .. } => {}
            other => panic!("expected polygon, got {}", other.kind()),
        }
    }

    #[test]
    fn freehand_classifies_open_stroke_as_path() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Freehand));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_move(pos2(100.0, 0.0), &grid);
        session.pointer_move(pos2(200.0, 50.0), &grid);
        let cmd = session
            .pointer_up(pos2(300.0, 100.0), &grid, &layer())
            .unwrap();
        match shape_of(cmd) {
            Shape::Path { .. } => {}
            other => panic!("expected path, got {}", other.kind()),
        }
    }

    #[test]
    fn freehand_short_stroke_is_discarded() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Freehand));
        let grid = no_snap();
        session.pointer_down(pos2(0.0, 0.0), &grid, &layer());
        session.pointer_move(pos2(30.0, 0.0), &grid);
        assert!(session.pointer_up(pos2(30.0, 0.0), &grid, &layer()).is_none());
        assert!(session.in_progress().is_empty());
    }

    #[test]
    fn points_snap_before_threshold_checks() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Polygon));
        let grid = GridSettings::default(); // snap at 20 px
        session.pointer_down(pos2(1.0, 1.0), &grid, &layer()); // snaps to (0,0)
        session.pointer_down(pos2(99.0, 2.0), &grid, &layer()); // (100,0)
        session.pointer_down(pos2(101.0, 99.0), &grid, &layer()); // (100,100)
        // Raw press at (9,1) snaps to (0,0), exactly on the first vertex.
        let event = session.pointer_down(pos2(9.0, 1.0), &grid, &layer()).unwrap();
        assert!(matches!(event, SessionEvent::Commit(_)));
    }

    #[test]
    fn select_press_requests_hit_test_at_snapped_point() {
        let mut session = DrawingSession::new();
        session.set_tool(Some(ToolKind::Select));
        let grid = GridSettings::default();
        let event = session.pointer_down(pos2(28.0, 31.0), &grid, &layer()).unwrap();
        assert_eq!(event, SessionEvent::Select(pos2(20.0, 40.0)));
    }
}
