use egui::Pos2;

use crate::document::Document;
use crate::element::Element;

/// Tracks the single selected element, by index into the document's
/// insertion-ordered element collection.
///
/// There is no multi-select. The index is cleared whenever the collection
/// may have shifted under it (undo, load, new project).
#[derive(Debug, Default)]
pub struct SelectionController {
    selected: Option<usize>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hit-tests elements in reverse insertion order, so the most recently
    /// drawn of several overlapping elements wins. A miss clears the
    /// selection rather than being an error.
    pub fn select_at(&mut self, p: Pos2, document: &Document) -> Option<usize> {
        self.selected = document
            .elements()
            .iter()
            .enumerate()
            .rev()
            .find(|(_, element)| element.hit_test(p))
            .map(|(index, _)| index);
        self.selected
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_element<'doc>(&self, document: &'doc Document) -> Option<&'doc Element> {
        self.selected.and_then(|index| document.element(index))
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Shape;
    use crate::layer::LayerId;
    use egui::pos2;

    fn doc_with_two_overlapping_rects() -> Document {
        let mut doc = Document::default();
        doc.add_element(Element::new(
            Shape::Rectangle {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 100.0,
            },
            LayerId::new("ground"),
        ));
        doc.add_element(Element::new(
            Shape::Rectangle {
                x: 50.0,
                y: 50.0,
                width: 100.0,
                height: 100.0,
            },
            LayerId::new("ground"),
        ));
        doc
    }

    #[test]
    fn newest_of_overlapping_elements_wins() {
        let doc = doc_with_two_overlapping_rects();
        let mut selection = SelectionController::new();
        assert_eq!(selection.select_at(pos2(75.0, 75.0), &doc), Some(1));
    }

    #[test]
    fn point_only_inside_older_element_selects_it() {
        let doc = doc_with_two_overlapping_rects();
        let mut selection = SelectionController::new();
        assert_eq!(selection.select_at(pos2(10.0, 10.0), &doc), Some(0));
    }

    #[test]
    fn miss_clears_selection() {
        let doc = doc_with_two_overlapping_rects();
        let mut selection = SelectionController::new();
        selection.select_at(pos2(75.0, 75.0), &doc);
        assert!(selection.selected_index().is_some());
        assert_eq!(selection.select_at(pos2(500.0, 500.0), &doc), None);
        assert!(selection.selected_index().is_none());
    }

    #[test]
    fn open_shapes_are_not_selectable() {
        let mut doc = Document::default();
        doc.add_element(Element::new(
            Shape::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 100.0,
                y2: 0.0,
            },
            LayerId::new("hardscape"),
        ));
        let mut selection = SelectionController::new();
        assert_eq!(selection.select_at(pos2(50.0, 0.0), &doc), None);
    }
}
