#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod catalog;
pub mod command;
pub mod context;
pub mod document;
pub mod element;
pub mod geometry;
pub mod layer;
pub mod panels;
pub mod project_io;
pub mod renderer;
pub mod selection;
pub mod session;

pub use app::GroundPlanApp;
pub use command::{Command, CommandHistory};
pub use context::EditorContext;
pub use document::{Document, GridSettings, Scale};
pub use element::{Element, Shape};
pub use layer::{Layer, LayerId};
pub use renderer::Renderer;
pub use selection::SelectionController;
pub use session::{DrawingSession, SessionEvent, ToolKind};
