pub mod annotation;
pub mod document;
pub mod text_range;

pub use annotation::{Annotation, Category, Severity};
pub use document::Document;
pub use text_range::TextRange;
