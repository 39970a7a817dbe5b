use crate::arena::DomArena;
use crate::error::DomError;
use crate::types::{Node, NodeKey, NodeKind};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Shared handle to one document tree.
///
/// Cloning the handle shares the tree. Handles are `!Send`; a document and
/// everything patching it live on one thread.
#[derive(Clone)]
pub struct Document {
    arena: Rc<RefCell<DomArena>>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            arena: Rc::new(RefCell::new(DomArena::new())),
        }
    }

    /// Handle to the document node itself.
    pub fn node(&self) -> NodeRef {
        self.handle(NodeKey::DOCUMENT)
    }

    pub fn ptr_eq(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }

    pub fn create_element(&self, name: &str) -> NodeRef {
        self.create_element_ns(name, None::<Arc<str>>)
    }

    pub fn create_element_ns(&self, name: &str, namespace: Option<impl Into<Arc<str>>>) -> NodeRef {
        self.create(NodeKind::Element {
            name: name.into(),
            namespace: namespace.map(Into::into),
        })
    }

    pub fn create_text(&self, text: &str) -> NodeRef {
        self.create(NodeKind::Text {
            text: text.to_string(),
        })
    }

    pub fn create_comment(&self, text: &str) -> NodeRef {
        self.create(NodeKind::Comment {
            text: text.to_string(),
        })
    }

    pub fn create_document_fragment(&self) -> NodeRef {
        self.create(NodeKind::DocumentFragment)
    }

    /// Number of live nodes, the document node included.
    pub fn live_count(&self) -> usize {
        self.arena.borrow().live_count()
    }

    fn create(&self, kind: NodeKind) -> NodeRef {
        let key = self.arena.borrow_mut().insert_node(kind);
        self.handle(key)
    }

    fn handle(&self, key: NodeKey) -> NodeRef {
        NodeRef {
            doc: self.clone(),
            key,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Handle to one node of a `Document`.
#[derive(Clone)]
pub struct NodeRef {
    doc: Document,
    key: NodeKey,
}

impl NodeRef {
    pub fn key(&self) -> NodeKey {
        self.key
    }

    pub fn is_live(&self) -> bool {
        self.doc.arena.borrow().is_live(self.key)
    }

    /// Document this node belongs to.
    ///
    /// `None` for the document node itself and for removed nodes.
    pub fn owner_document(&self) -> Option<Document> {
        if self.key == NodeKey::DOCUMENT || !self.is_live() {
            return None;
        }
        Some(self.doc.clone())
    }

    pub fn kind(&self) -> Result<NodeKind, DomError> {
        self.doc.arena.borrow().kind(self.key).cloned()
    }

    pub fn is_element_named(&self, name: &str) -> bool {
        matches!(self.kind(), Ok(NodeKind::Element { name: n, .. }) if &*n == name)
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind(), Ok(NodeKind::Text { .. }))
    }

    pub fn namespace(&self) -> Option<String> {
        match self.kind() {
            Ok(NodeKind::Element { namespace, .. }) => namespace.as_deref().map(str::to_string),
            _ => None,
        }
    }

    pub fn parent(&self) -> Result<Option<NodeRef>, DomError> {
        let parent = self.doc.arena.borrow().parent(self.key)?;
        Ok(parent.map(|key| self.doc.handle(key)))
    }

    pub fn first_child(&self) -> Result<Option<NodeRef>, DomError> {
        let child = self.doc.arena.borrow().first_child(self.key)?;
        Ok(child.map(|key| self.doc.handle(key)))
    }

    pub fn next_sibling(&self) -> Result<Option<NodeRef>, DomError> {
        let sibling = self.doc.arena.borrow().next_sibling(self.key)?;
        Ok(sibling.map(|key| self.doc.handle(key)))
    }

    pub fn children(&self) -> Result<Vec<NodeRef>, DomError> {
        let arena = self.doc.arena.borrow();
        Ok(arena
            .children(self.key)?
            .iter()
            .map(|key| self.doc.handle(*key))
            .collect())
    }

    pub fn append_child(&self, child: &NodeRef) -> Result<(), DomError> {
        self.same_document(child)?;
        self.doc
            .arena
            .borrow_mut()
            .append_child(self.key, child.key)
    }

    pub fn insert_before(&self, child: &NodeRef, before: &NodeRef) -> Result<(), DomError> {
        self.same_document(child)?;
        self.same_document(before)?;
        self.doc
            .arena
            .borrow_mut()
            .insert_before(self.key, child.key, before.key)
    }

    /// Removes this node and its subtree from the document.
    pub fn remove(&self) -> Result<(), DomError> {
        self.doc.arena.borrow_mut().remove_subtree(self.key)
    }

    /// Replaces the data of a text or comment node.
    pub fn set_text(&self, text: &str) -> Result<(), DomError> {
        self.doc.arena.borrow_mut().set_text(self.key, text)
    }

    pub fn materialize(&self) -> Result<Node, DomError> {
        self.doc.arena.borrow().materialize(self.key)
    }

    fn same_document(&self, other: &NodeRef) -> Result<(), DomError> {
        if self.doc.ptr_eq(&other.doc) {
            Ok(())
        } else {
            Err(DomError::CrossDocument)
        }
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.doc.ptr_eq(&other.doc)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({})", self.key.0)
    }
}
