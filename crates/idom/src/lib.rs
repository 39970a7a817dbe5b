//! Patch-time state for incremental DOM rendering.
//!
//! A `ContextStack` tracks the active patch contexts. Each `PatchContext` owns
//! a cursor over the subtree being patched, the namespace stack used to pick
//! the namespace of new elements, and the logs of created and deleted nodes
//! handed to the configured `Notifications` hooks when the patch finishes.
//!
//! The stack is threaded explicitly through every call, which makes nested
//! patches (a patch started while another one is running) plain recursion.

pub mod builder;
pub mod namespace;

mod context;
mod error;
mod notifications;
mod patch;
mod walker;

pub use crate::builder::{element_close, element_open, element_void, skip, text};
pub use crate::context::{ContextScope, ContextStack, ContextStats, Namespace, PatchContext};
pub use crate::error::{MalformedRootReason, PatchError};
pub use crate::namespace::{
    SVG_NAMESPACE, enter_tag, exit_tag, is_namespace_boundary, namespace_for_tag, with_tag,
};
pub use crate::notifications::{NotificationHook, Notifications};
pub use crate::patch::patch;
pub use crate::walker::TreeWalker;
