//! Element creation at the cursor of the active context.
//!
//! Existing nodes are reused when they match what is requested at the cursor
//! position (same element name and namespace, or any text node); otherwise a
//! new node is inserted before the cursor. Children left unvisited when an
//! element closes are removed.

use crate::context::ContextStack;
use crate::error::PatchError;
use crate::namespace::{enter_tag, exit_tag, namespace_for_tag};
use dom::{Document, NodeKind, NodeRef};

/// Opens `tag` at the cursor and descends into it.
pub fn element_open(stack: &mut ContextStack, tag: &str) -> Result<NodeRef, PatchError> {
    let namespace = namespace_for_tag(stack, tag)?;
    let node = align(
        stack,
        |node| node.is_element_named(tag) && node.namespace().as_deref() == namespace.as_deref(),
        |doc| doc.create_element_ns(tag, namespace.clone()),
    )?;
    enter_tag(stack, tag)?;
    stack.require_current_mut()?.walker_mut().first_child()?;
    Ok(node)
}

/// Closes the element opened by the matching `element_open` and returns it.
///
/// Fails with `MismatchedClose` if `tag` is not the innermost open element,
/// before anything is removed or the namespace stack is touched.
pub fn element_close(stack: &mut ContextStack, tag: &str) -> Result<NodeRef, PatchError> {
    let walker = stack.require_current()?.walker();
    let open = walker
        .current_parent()
        .filter(|parent| *parent != walker.root())
        .cloned()
        .ok_or(PatchError::CursorOutsideRoot)?;
    if !open.is_element_named(tag) {
        let open_name = match open.kind()? {
            NodeKind::Element { name, .. } => name.to_string(),
            _ => String::new(),
        };
        log::warn!(target: "idom.context", "element_close({tag:?}) while {open_name:?} is open");
        return Err(PatchError::MismatchedClose {
            open: open_name,
            close: tag.to_string(),
        });
    }

    clear_unvisited(stack)?;
    exit_tag(stack, tag)?;
    let walker = stack.require_current_mut()?.walker_mut();
    walker.parent_node();
    walker.next_sibling()?;
    Ok(open)
}

/// Opens and immediately closes `tag`.
pub fn element_void(stack: &mut ContextStack, tag: &str) -> Result<NodeRef, PatchError> {
    element_open(stack, tag)?;
    element_close(stack, tag)
}

/// Places a text node with `value` at the cursor.
pub fn text(stack: &mut ContextStack, value: &str) -> Result<NodeRef, PatchError> {
    let node = align(stack, NodeRef::is_text, |doc| doc.create_text(value))?;
    if let NodeKind::Text { text } = node.kind()? {
        if text != value {
            node.set_text(value)?;
        }
    }
    stack.require_current_mut()?.walker_mut().next_sibling()?;
    Ok(node)
}

/// Leaves the remaining children of the current parent untouched.
///
/// Used when the children are owned by something else, such as a nested patch.
pub fn skip(stack: &mut ContextStack) -> Result<(), PatchError> {
    stack.require_current_mut()?.walker_mut().skip_to_end();
    Ok(())
}

/// Removes every child of the current parent from the cursor onwards.
///
/// A cursor node that was already removed (by a nested patch over the same
/// children) ends the sweep; its former siblings can no longer be reached.
pub(crate) fn clear_unvisited(stack: &mut ContextStack) -> Result<(), PatchError> {
    let ctx = stack.require_current_mut()?;
    while let Some(node) = ctx.walker().current_node().cloned() {
        if !node.is_live() {
            ctx.walker_mut().skip_to_end();
            break;
        }
        ctx.walker_mut().next_sibling()?;
        node.remove()?;
        ctx.mark_deleted(node);
    }
    Ok(())
}

fn align(
    stack: &mut ContextStack,
    matches: impl FnOnce(&NodeRef) -> bool,
    create: impl FnOnce(&Document) -> NodeRef,
) -> Result<NodeRef, PatchError> {
    let ctx = stack.require_current_mut()?;
    if let Some(current) = ctx.walker().current_node() {
        if matches(current) {
            return Ok(current.clone());
        }
    }
    let parent = ctx
        .walker()
        .current_parent()
        .cloned()
        .ok_or(PatchError::CursorOutsideRoot)?;
    let node = create(ctx.document());
    match ctx.walker().current_node() {
        Some(before) => parent.insert_before(&node, before)?,
        None => parent.append_child(&node)?,
    }
    ctx.walker_mut().set_current(node.clone());
    ctx.mark_created(node.clone());
    Ok(node)
}
