//! Margin Core - Platform-agnostic annotation model with bounded undo history
//!
//! This crate provides the data structures and editing logic for the Margin
//! annotation tool. The [`History`] log keeps a capped, linear series of
//! annotation snapshots for undo/redo; [`App`] owns one per open document and
//! records a snapshot after every finished edit.

pub mod app;
pub mod caret;
pub mod history;
pub mod model;

pub use app::{App, Focus, InputTarget, Mode};
pub use caret::Caret;
pub use history::{History, HistoryConfig, Snapshot, DEFAULT_CAPACITY};
pub use model::{Annotation, Category, Document, Severity, TextRange};
