//! Patch contexts and the stack of active contexts.
//!
//! Invariants:
//! - A context's namespace stack is never empty; its bottom entry is the default namespace.
//! - The innermost active context is the last entry of the `ContextStack`.
//! - A context exclusively owns its walker and change logs; nothing outside the
//!   stack holds on to a context while it is active.
//! - Change logs exist only if the matching hook was configured when the context was entered.

use crate::error::{MalformedRootReason, PatchError};
use crate::notifications::{NotificationHook, Notifications};
use crate::walker::TreeWalker;
use dom::{Document, NodeKind, NodeRef};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Namespace new elements are created in; `None` is the default (HTML) namespace.
pub type Namespace = Option<Arc<str>>;

struct ChangeLog {
    hook: NotificationHook,
    nodes: Vec<NodeRef>,
}

impl ChangeLog {
    fn resolve(hook: &Option<NotificationHook>) -> Option<Self> {
        hook.as_ref().map(|hook| ChangeLog {
            hook: hook.clone(),
            nodes: Vec::new(),
        })
    }

    /// Hands the batch to the hook and empties the log. Empty logs are not reported.
    fn flush(&mut self) -> bool {
        if self.nodes.is_empty() {
            return false;
        }
        let batch = std::mem::take(&mut self.nodes);
        (self.hook)(&batch);
        true
    }
}

/// State of one (possibly nested) patch invocation.
pub struct PatchContext {
    walker: TreeWalker,
    document: Document,
    namespaces: Vec<Namespace>,
    created: Option<ChangeLog>,
    deleted: Option<ChangeLog>,
}

impl PatchContext {
    /// Creates a context for patching the subtree under `root`.
    ///
    /// `root` must be a live element or document fragment. The hooks present in
    /// `notifications` at this moment decide which change logs the context keeps.
    pub fn new(root: NodeRef, notifications: &Notifications) -> Result<Self, PatchError> {
        let Some(document) = root.owner_document() else {
            let reason = if root.is_live() {
                MalformedRootReason::DocumentNode
            } else {
                MalformedRootReason::Detached
            };
            log::warn!(target: "idom.context", "rejected patch root {root:?}: {reason:?}");
            return Err(PatchError::MalformedRoot(reason));
        };
        match root.kind()? {
            NodeKind::Element { .. } | NodeKind::DocumentFragment => {}
            _ => {
                log::warn!(target: "idom.context", "rejected patch root {root:?}: not a container");
                return Err(PatchError::MalformedRoot(
                    MalformedRootReason::NotAContainer,
                ));
            }
        }

        Ok(Self {
            walker: TreeWalker::new(root),
            document,
            namespaces: vec![None],
            created: ChangeLog::resolve(&notifications.nodes_created),
            deleted: ChangeLog::resolve(&notifications.nodes_deleted),
        })
    }

    pub fn root(&self) -> &NodeRef {
        self.walker.root()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn walker(&self) -> &TreeWalker {
        &self.walker
    }

    pub fn walker_mut(&mut self) -> &mut TreeWalker {
        &mut self.walker
    }

    /// Namespace new elements should be created in at the current position.
    pub fn current_namespace(&self) -> Option<&str> {
        self.namespaces.last().and_then(|ns| ns.as_deref())
    }

    /// Shared handle to the namespace on top of the stack.
    pub fn current_namespace_arc(&self) -> Namespace {
        self.namespaces.last().cloned().flatten()
    }

    /// Number of entries on the namespace stack, the default entry included.
    pub fn namespace_depth(&self) -> usize {
        self.namespaces.len()
    }

    pub fn enter_namespace(&mut self, namespace: Namespace) {
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "idom.namespace",
            "enter namespace {:?} (depth {})",
            namespace.as_deref(),
            self.namespaces.len() + 1
        );
        self.namespaces.push(namespace);
    }

    pub fn exit_namespace(&mut self) -> Result<(), PatchError> {
        if self.namespaces.len() <= 1 {
            log::warn!(target: "idom.namespace", "exit_namespace with only the default entry left");
            return Err(PatchError::NamespaceStackUnderflow);
        }
        let _exited = self.namespaces.pop();
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(
            target: "idom.namespace",
            "exit namespace {:?} (depth {})",
            _exited.as_ref().and_then(|ns| ns.as_deref()),
            self.namespaces.len()
        );
        Ok(())
    }

    pub fn tracks_created(&self) -> bool {
        self.created.is_some()
    }

    pub fn tracks_deleted(&self) -> bool {
        self.deleted.is_some()
    }

    pub fn mark_created(&mut self, node: NodeRef) {
        if let Some(log) = &mut self.created {
            log.nodes.push(node);
        }
    }

    pub fn mark_deleted(&mut self, node: NodeRef) {
        if let Some(log) = &mut self.deleted {
            log.nodes.push(node);
        }
    }

    /// Nodes recorded as created and not yet flushed; `None` if not tracked.
    pub fn created_nodes(&self) -> Option<&[NodeRef]> {
        self.created.as_ref().map(|log| log.nodes.as_slice())
    }

    /// Nodes recorded as deleted and not yet flushed; `None` if not tracked.
    pub fn deleted_nodes(&self) -> Option<&[NodeRef]> {
        self.deleted.as_ref().map(|log| log.nodes.as_slice())
    }

    /// Sends each non-empty log to its hook as one batch, then empties it.
    ///
    /// A second call without new marks invokes nothing.
    pub fn notify_changes(&mut self) {
        if let Some(log) = &mut self.created {
            let count = log.nodes.len();
            if log.flush() {
                log::debug!(target: "idom.notify", "notified {count} created node(s)");
            }
        }
        if let Some(log) = &mut self.deleted {
            let count = log.nodes.len();
            if log.flush() {
                log::debug!(target: "idom.notify", "notified {count} deleted node(s)");
            }
        }
    }
}

impl std::fmt::Debug for PatchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatchContext")
            .field("root", self.root())
            .field("namespaces", &self.namespaces)
            .field("created", &self.created_nodes())
            .field("deleted", &self.deleted_nodes())
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContextStats {
    pub contexts_entered: u64,
    pub max_depth: u32,
}

/// Active patch contexts, innermost last.
///
/// Holds `Rc` handles and is therefore confined to the thread that created it.
#[derive(Debug, Default)]
pub struct ContextStack {
    contexts: Vec<PatchContext>,
    notifications: Notifications,
    stats: ContextStats,
}

impl ContextStack {
    pub fn new(notifications: Notifications) -> Self {
        Self {
            contexts: Vec::new(),
            notifications,
            stats: ContextStats::default(),
        }
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Replaces the hook configuration. Contexts already entered keep the hooks
    /// they resolved on entry.
    pub fn set_notifications(&mut self, notifications: Notifications) {
        self.notifications = notifications;
    }

    /// Makes a new context rooted at `root` the active one.
    pub fn enter(&mut self, root: NodeRef) -> Result<(), PatchError> {
        let context = PatchContext::new(root, &self.notifications)?;
        self.contexts.push(context);
        self.stats.contexts_entered = self.stats.contexts_entered.saturating_add(1);
        self.stats.max_depth = self.stats.max_depth.max(self.contexts.len() as u32);
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "idom.context", "entered context (depth {})", self.contexts.len());
        Ok(())
    }

    /// Drops back to the enclosing context and returns the one that was active.
    pub fn restore(&mut self) -> Result<PatchContext, PatchError> {
        let Some(context) = self.contexts.pop() else {
            log::warn!(target: "idom.context", "restore with no active context");
            return Err(PatchError::NoActiveContext);
        };
        #[cfg(any(test, feature = "debug-stats"))]
        log::trace!(target: "idom.context", "restored context (depth {})", self.contexts.len());
        Ok(context)
    }

    pub fn current(&self) -> Option<&PatchContext> {
        self.contexts.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut PatchContext> {
        self.contexts.last_mut()
    }

    pub(crate) fn require_current(&self) -> Result<&PatchContext, PatchError> {
        self.current().ok_or(PatchError::NoActiveContext)
    }

    pub(crate) fn require_current_mut(&mut self) -> Result<&mut PatchContext, PatchError> {
        self.current_mut().ok_or(PatchError::NoActiveContext)
    }

    pub fn depth(&self) -> usize {
        self.contexts.len()
    }

    pub fn stats(&self) -> ContextStats {
        self.stats
    }

    /// Enters a context that is unwound when the returned guard is dropped.
    ///
    /// Dropping the guard (early return, `?`, panic) discards the context and
    /// anything entered above it without notifying. Call `ContextScope::finish`
    /// to notify and restore on success.
    pub fn scoped(&mut self, root: NodeRef) -> Result<ContextScope<'_>, PatchError> {
        let base_depth = self.contexts.len();
        self.enter(root)?;
        Ok(ContextScope {
            stack: self,
            base_depth,
        })
    }

    pub(crate) fn unwind_to(&mut self, depth: usize) {
        if self.contexts.len() > depth {
            log::debug!(
                target: "idom.context",
                "unwinding {} context(s) to depth {depth}",
                self.contexts.len() - depth
            );
            self.contexts.truncate(depth);
        }
    }
}

/// Guard returned by `ContextStack::scoped`.
pub struct ContextScope<'a> {
    stack: &'a mut ContextStack,
    base_depth: usize,
}

impl ContextScope<'_> {
    /// Notifies the scoped context's hooks and restores the enclosing context.
    ///
    /// Contexts entered above the scoped one and never restored are discarded first.
    pub fn finish(mut self) -> Result<(), PatchError> {
        let depth = self.base_depth + 1;
        self.stack.unwind_to(depth);
        let mut context = self.stack.restore()?;
        context.notify_changes();
        Ok(())
    }
}

impl Deref for ContextScope<'_> {
    type Target = ContextStack;

    fn deref(&self) -> &ContextStack {
        &*self.stack
    }
}

impl DerefMut for ContextScope<'_> {
    fn deref_mut(&mut self) -> &mut ContextStack {
        &mut *self.stack
    }
}

impl Drop for ContextScope<'_> {
    fn drop(&mut self) {
        self.stack.unwind_to(self.base_depth);
    }
}
