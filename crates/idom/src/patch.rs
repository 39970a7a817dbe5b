use crate::builder::clear_unvisited;
use crate::context::ContextStack;
use crate::error::PatchError;

/// Patches the children of `root` with whatever `f` places at the cursor.
///
/// A fresh context is entered for the duration of `f`, so `f` may call `patch`
/// again for another subtree. On success, children of `root` that `f` did not
/// visit are removed, change hooks are notified once and the enclosing context
/// becomes active again. On error the context is discarded without notifying.
pub fn patch<R>(
    stack: &mut ContextStack,
    root: dom::NodeRef,
    f: impl FnOnce(&mut ContextStack) -> Result<R, PatchError>,
) -> Result<R, PatchError> {
    let mut scope = stack.scoped(root)?;
    let depth = scope.depth();
    scope.require_current_mut()?.walker_mut().first_child()?;

    let value = f(&mut *scope)?;

    scope.unwind_to(depth);
    let ctx = scope.require_current()?;
    let open = ctx.walker().depth().saturating_sub(1);
    if open > 0 {
        log::warn!(target: "idom.context", "patch body left {open} element(s) open");
        return Err(PatchError::UnclosedElements(open));
    }
    let entered = ctx.namespace_depth() - 1;
    if entered > 0 {
        log::warn!(target: "idom.context", "patch body left {entered} namespace(s) entered");
        return Err(PatchError::UnclosedNamespaces(entered));
    }

    clear_unvisited(&mut *scope)?;
    scope.require_current_mut()?.walker_mut().parent_node();
    scope.finish()?;
    Ok(value)
}
