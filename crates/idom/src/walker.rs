//! Cursor over the subtree being patched.
//!
//! The cursor sits on a node (or past the last child of the current parent,
//! `current_node() == None`) and keeps the chain of parents it descended
//! through, so it never needs parent pointers and never climbs above its root.

use dom::{DomError, NodeRef};

#[derive(Debug)]
pub struct TreeWalker {
    root: NodeRef,
    current: Option<NodeRef>,
    parents: Vec<NodeRef>,
}

impl TreeWalker {
    pub fn new(root: NodeRef) -> Self {
        Self {
            current: Some(root.clone()),
            root,
            parents: Vec::new(),
        }
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn current_node(&self) -> Option<&NodeRef> {
        self.current.as_ref()
    }

    pub fn current_parent(&self) -> Option<&NodeRef> {
        self.parents.last()
    }

    /// Number of parents above the cursor.
    pub fn depth(&self) -> usize {
        self.parents.len()
    }

    /// Moves the cursor onto `node`, which the caller has placed at the cursor position.
    pub fn set_current(&mut self, node: NodeRef) {
        self.current = Some(node);
    }

    /// Descends into the current node. Returns `false` if the cursor is past the end.
    pub fn first_child(&mut self) -> Result<bool, DomError> {
        let Some(current) = self.current.take() else {
            return Ok(false);
        };
        self.current = current.first_child()?;
        self.parents.push(current);
        Ok(true)
    }

    pub fn next_sibling(&mut self) -> Result<(), DomError> {
        if let Some(current) = self.current.take() {
            self.current = current.next_sibling()?;
        }
        Ok(())
    }

    /// Moves the cursor past the last child of the current parent without
    /// visiting the siblings in between.
    pub fn skip_to_end(&mut self) {
        self.current = None;
    }

    /// Ascends to the current parent. Returns `false` when already at the root level.
    pub fn parent_node(&mut self) -> bool {
        match self.parents.pop() {
            Some(parent) => {
                self.current = Some(parent);
                true
            }
            None => false,
        }
    }
}
