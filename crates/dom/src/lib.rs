//! Arena-backed document model.
//!
//! A `Document` owns every node it creates; `NodeRef` handles address nodes by
//! key. Structural mutation is validated and reported through `DomError`.

mod arena;
mod document;
mod error;
mod serialize;
mod types;

pub use crate::document::{Document, NodeRef};
pub use crate::error::DomError;
pub use crate::serialize::to_markup;
pub use crate::types::{Node, NodeKey, NodeKind};
