//! Change-notification configuration.
//!
//! Each hook is optional. A context checks which hooks exist once, when it is
//! entered, and only allocates the matching log if the hook is present.

use dom::NodeRef;
use std::fmt;
use std::rc::Rc;

/// Callback receiving one ordered batch of nodes per patch.
pub type NotificationHook = Rc<dyn Fn(&[NodeRef])>;

#[derive(Clone, Default)]
pub struct Notifications {
    pub nodes_created: Option<NotificationHook>,
    pub nodes_deleted: Option<NotificationHook>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_nodes_created(mut self, hook: impl Fn(&[NodeRef]) + 'static) -> Self {
        self.nodes_created = Some(Rc::new(hook));
        self
    }

    pub fn on_nodes_deleted(mut self, hook: impl Fn(&[NodeRef]) + 'static) -> Self {
        self.nodes_deleted = Some(Rc::new(hook));
        self
    }
}

impl fmt::Debug for Notifications {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Notifications")
            .field("nodes_created", &self.nodes_created.is_some())
            .field("nodes_deleted", &self.nodes_deleted.is_some())
            .finish()
    }
}
