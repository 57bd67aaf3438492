use std::collections::VecDeque;

use crate::document::Document;
use crate::element::Element;

/// Default number of edits kept undoable.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// A reversible edit against the document's element collection.
///
/// Commands are plain data records; apply/revert dispatch over the variant
/// instead of captured closures, so the log owns everything it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Appends an element (its style is stamped by the document on apply)
    AddElement { element: Element },
}

impl Command {
    pub fn apply(&self, document: &mut Document) {
        match self {
            Command::AddElement { element } => {
                document.add_element(element.clone());
            }
        }
    }

    pub fn revert(&self, document: &mut Document) {
        match self {
            Command::AddElement { .. } => {
                document.remove_last_element();
            }
        }
    }

    /// Short human-readable description for logs and the history panel.
    pub fn describe(&self) -> String {
        match self {
            Command::AddElement { element } => format!(
                "add {} on layer {}",
                element.shape.kind(),
                element.layer
            ),
        }
    }
}

/// Bounded log of executed commands driving undo.
///
/// Eviction is FIFO: once the log is full, the oldest edit silently stops
/// being undoable. There is no redo stack; an undone command is discarded.
pub struct CommandHistory {
    log: VecDeque<Command>,
    capacity: usize,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            log: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Applies the command to the document and records it.
    pub fn execute(&mut self, command: Command, document: &mut Document) {
        log::debug!("execute: {}", command.describe());
        command.apply(document);
        self.log.push_back(command);
        while self.log.len() > self.capacity {
            self.log.pop_front();
        }
    }

    /// Reverts the most recent recorded command. No-op on an empty log.
    pub fn undo(&mut self, document: &mut Document) -> bool {
        match self.log.pop_back() {
            Some(command) => {
                log::debug!("undo: {}", command.describe());
                command.revert(document);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.log.is_empty()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.log.iter()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new()
    }
}
