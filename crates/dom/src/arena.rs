//! Node storage for a single document.
//!
//! Invariants:
//! - Keys are allocated monotonically starting at `NodeKey::DOCUMENT` and are never reused.
//! - A node has at most one parent and appears once in that parent's child list.
//! - Removing a node removes its entire subtree and frees every removed record.

use crate::error::DomError;
use crate::types::{Node, NodeKey, NodeKind};
use std::collections::HashMap;

pub(crate) struct DomArena {
    nodes: HashMap<NodeKey, NodeRecord>,
    next_key: u32,
}

struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

impl DomArena {
    pub(crate) fn new() -> Self {
        let mut arena = Self {
            nodes: HashMap::new(),
            next_key: NodeKey::DOCUMENT.0,
        };
        let key = arena.insert_node(NodeKind::Document);
        debug_assert_eq!(key, NodeKey::DOCUMENT);
        arena
    }

    pub(crate) fn insert_node(&mut self, kind: NodeKind) -> NodeKey {
        let key = NodeKey(self.next_key);
        self.next_key = self
            .next_key
            .checked_add(1)
            .expect("document exhausted its node keys");
        self.nodes.insert(
            key,
            NodeRecord {
                kind,
                parent: None,
                children: Vec::new(),
            },
        );
        key
    }

    pub(crate) fn is_live(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(&key)
    }

    pub(crate) fn live_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn kind(&self, key: NodeKey) -> Result<&NodeKind, DomError> {
        Ok(&self.record(key)?.kind)
    }

    pub(crate) fn parent(&self, key: NodeKey) -> Result<Option<NodeKey>, DomError> {
        Ok(self.record(key)?.parent)
    }

    pub(crate) fn children(&self, key: NodeKey) -> Result<&[NodeKey], DomError> {
        Ok(&self.record(key)?.children)
    }

    pub(crate) fn first_child(&self, key: NodeKey) -> Result<Option<NodeKey>, DomError> {
        Ok(self.record(key)?.children.first().copied())
    }

    pub(crate) fn next_sibling(&self, key: NodeKey) -> Result<Option<NodeKey>, DomError> {
        let Some(parent) = self.record(key)?.parent else {
            return Ok(None);
        };
        let siblings = &self.record(parent)?.children;
        let pos = siblings
            .iter()
            .position(|k| *k == key)
            .ok_or(DomError::InvalidSibling {
                parent,
                before: key,
            })?;
        Ok(siblings.get(pos + 1).copied())
    }

    pub(crate) fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        self.record_mut(parent)?.children.push(child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub(crate) fn insert_before(
        &mut self,
        parent: NodeKey,
        child: NodeKey,
        before: NodeKey,
    ) -> Result<(), DomError> {
        self.check_insertion(parent, child)?;
        if self.record(before)?.parent != Some(parent) {
            debug_assert!(false, "before is not a child of parent");
            return Err(DomError::InvalidSibling { parent, before });
        }
        let siblings = &mut self.record_mut(parent)?.children;
        let pos = siblings
            .iter()
            .position(|k| *k == before)
            .ok_or(DomError::InvalidSibling { parent, before })?;
        siblings.insert(pos, child);
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub(crate) fn remove_subtree(&mut self, key: NodeKey) -> Result<(), DomError> {
        if key == NodeKey::DOCUMENT {
            return Err(DomError::WrongNodeKind(key));
        }
        let record = self.nodes.remove(&key).ok_or(DomError::MissingKey(key))?;
        if let Some(parent) = record.parent {
            if let Some(parent_record) = self.nodes.get_mut(&parent) {
                parent_record.children.retain(|k| *k != key);
            }
        }
        let mut pending = record.children;
        let mut removed = 1usize;
        while let Some(child) = pending.pop() {
            if let Some(child_record) = self.nodes.remove(&child) {
                pending.extend(child_record.children);
                removed += 1;
            }
        }
        log::trace!(target: "dom.arena", "removed node {} ({removed} record(s) freed)", key.0);
        Ok(())
    }

    pub(crate) fn set_text(&mut self, key: NodeKey, text: &str) -> Result<(), DomError> {
        match &mut self.record_mut(key)?.kind {
            NodeKind::Text { text: existing } | NodeKind::Comment { text: existing } => {
                existing.clear();
                existing.push_str(text);
                Ok(())
            }
            _ => Err(DomError::WrongNodeKind(key)),
        }
    }

    pub(crate) fn materialize(&self, key: NodeKey) -> Result<Node, DomError> {
        let record = self.record(key)?;
        let children = record
            .children
            .iter()
            .map(|child| self.materialize(*child))
            .collect::<Result<Vec<_>, _>>()?;
        let node = match &record.kind {
            NodeKind::Document => Node::Document { key, children },
            NodeKind::DocumentFragment => Node::DocumentFragment { key, children },
            NodeKind::Element { name, namespace } => Node::Element {
                key,
                name: name.clone(),
                namespace: namespace.clone(),
                children,
            },
            NodeKind::Text { text } => Node::Text {
                key,
                text: text.clone(),
            },
            NodeKind::Comment { text } => Node::Comment {
                key,
                text: text.clone(),
            },
        };
        Ok(node)
    }

    fn check_insertion(&self, parent: NodeKey, child: NodeKey) -> Result<(), DomError> {
        if parent == child || self.is_descendant(child, parent) {
            debug_assert!(false, "cannot create cycle");
            return Err(DomError::CycleDetected { parent, child });
        }
        if !self.record(parent)?.kind.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        let child_record = self.record(child)?;
        if child_record.parent.is_some() || matches!(child_record.kind, NodeKind::Document) {
            return Err(DomError::InvalidParent(child));
        }
        Ok(())
    }

    fn is_descendant(&self, ancestor: NodeKey, maybe_descendant: NodeKey) -> bool {
        let Some(record) = self.nodes.get(&ancestor) else {
            return false;
        };
        let mut stack = record.children.clone();
        while let Some(current) = stack.pop() {
            if current == maybe_descendant {
                return true;
            }
            if let Some(child) = self.nodes.get(&current) {
                stack.extend(child.children.iter().copied());
            }
        }
        false
    }

    fn record(&self, key: NodeKey) -> Result<&NodeRecord, DomError> {
        self.nodes.get(&key).ok_or(DomError::MissingKey(key))
    }

    fn record_mut(&mut self, key: NodeKey) -> Result<&mut NodeRecord, DomError> {
        self.nodes.get_mut(&key).ok_or(DomError::MissingKey(key))
    }
}

#[cfg(test)]
mod tests {
    use super::DomArena;
    use crate::error::DomError;
    use crate::types::{NodeKey, NodeKind};

    fn element(arena: &mut DomArena, name: &str) -> NodeKey {
        arena.insert_node(NodeKind::Element {
            name: name.into(),
            namespace: None,
        })
    }

    #[test]
    fn document_is_first_key() {
        let arena = DomArena::new();
        assert!(arena.is_live(NodeKey::DOCUMENT));
        assert_eq!(arena.kind(NodeKey::DOCUMENT), Ok(&NodeKind::Document));
    }

    #[test]
    fn insert_before_orders_siblings() {
        let mut arena = DomArena::new();
        let parent = element(&mut arena, "ul");
        let a = element(&mut arena, "li");
        let b = element(&mut arena, "li");
        arena.append_child(parent, b).unwrap();
        arena.insert_before(parent, a, b).unwrap();
        assert_eq!(arena.children(parent).unwrap(), &[a, b]);
        assert_eq!(arena.next_sibling(a).unwrap(), Some(b));
        assert_eq!(arena.next_sibling(b).unwrap(), None);
    }

    #[test]
    fn remove_subtree_kills_descendants() {
        let mut arena = DomArena::new();
        let outer = element(&mut arena, "div");
        let inner = element(&mut arena, "span");
        arena.append_child(NodeKey::DOCUMENT, outer).unwrap();
        arena.append_child(outer, inner).unwrap();
        arena.remove_subtree(outer).unwrap();
        assert!(!arena.is_live(outer));
        assert!(!arena.is_live(inner));
        assert!(arena.children(NodeKey::DOCUMENT).unwrap().is_empty());
        assert_eq!(arena.kind(inner), Err(DomError::MissingKey(inner)));
    }

    #[test]
    fn removed_records_are_freed() {
        let mut arena = DomArena::new();
        let list = element(&mut arena, "ul");
        arena.append_child(NodeKey::DOCUMENT, list).unwrap();
        let mut last = None;
        for round in 0..100 {
            let item = element(&mut arena, "li");
            let label = arena.insert_node(NodeKind::Text {
                text: format!("item {round}"),
            });
            arena.append_child(list, item).unwrap();
            arena.append_child(item, label).unwrap();
            if let Some(previous) = last.replace(item) {
                arena.remove_subtree(previous).unwrap();
            }
        }
        assert_eq!(arena.nodes.len(), 4);
        assert_eq!(arena.live_count(), 4);
        assert_eq!(arena.children(list).unwrap(), &[last.unwrap()]);
        assert!(arena.next_key > 200);
    }

    #[test]
    fn text_cannot_take_children() {
        let mut arena = DomArena::new();
        let text = arena.insert_node(NodeKind::Text {
            text: "hi".to_string(),
        });
        let child = element(&mut arena, "b");
        assert_eq!(
            arena.append_child(text, child),
            Err(DomError::InvalidParent(text))
        );
    }

    #[test]
    fn attached_child_cannot_be_appended_twice() {
        let mut arena = DomArena::new();
        let a = element(&mut arena, "div");
        let b = element(&mut arena, "div");
        let child = element(&mut arena, "p");
        arena.append_child(a, child).unwrap();
        assert_eq!(arena.append_child(b, child), Err(DomError::InvalidParent(child)));
    }
}
