//! In-memory object graph: value model, field access, dialogue runs

pub mod accessor;
pub mod dialogue;
pub mod labels;
mod value;

pub use labels::Labels;
pub use value::{HashKey, Object, Value};
