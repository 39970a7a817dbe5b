use std::sync::Arc;

/// Stable node identity within one document arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub u32);

impl NodeKey {
    /// Reserved sentinel; never handed out by an arena.
    pub const INVALID: NodeKey = NodeKey(0);

    /// Key of the document node itself.
    pub const DOCUMENT: NodeKey = NodeKey(1);
}

/// Payload stored for each node in the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    DocumentFragment,
    Element {
        name: Arc<str>,
        namespace: Option<Arc<str>>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl NodeKind {
    pub fn allows_children(&self) -> bool {
        matches!(
            self,
            NodeKind::Document | NodeKind::DocumentFragment | NodeKind::Element { .. }
        )
    }
}

/// Owned snapshot of a subtree, detached from the arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Document {
        key: NodeKey,
        children: Vec<Node>,
    },
    DocumentFragment {
        key: NodeKey,
        children: Vec<Node>,
    },
    Element {
        key: NodeKey,
        name: Arc<str>,
        namespace: Option<Arc<str>>,
        children: Vec<Node>,
    },
    Text {
        key: NodeKey,
        text: String,
    },
    Comment {
        key: NodeKey,
        text: String,
    },
}

impl Node {
    pub fn key(&self) -> NodeKey {
        match self {
            Node::Document { key, .. }
            | Node::DocumentFragment { key, .. }
            | Node::Element { key, .. }
            | Node::Text { key, .. }
            | Node::Comment { key, .. } => *key,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Document { children, .. }
            | Node::DocumentFragment { children, .. }
            | Node::Element { children, .. } => children,
            Node::Text { .. } | Node::Comment { .. } => &[],
        }
    }

    /// Pre-order list of `(element name, namespace)` pairs.
    pub fn element_namespaces(&self) -> Vec<(String, Option<String>)> {
        fn walk(node: &Node, out: &mut Vec<(String, Option<String>)>) {
            if let Node::Element {
                name, namespace, ..
            } = node
            {
                out.push((name.to_string(), namespace.as_deref().map(str::to_string)));
            }
            for child in node.children() {
                walk(child, out);
            }
        }

        let mut out = Vec::new();
        walk(self, &mut out);
        out
    }
}
