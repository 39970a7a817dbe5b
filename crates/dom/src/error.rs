use crate::types::NodeKey;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomError {
    /// The key was never allocated or its subtree has been removed.
    MissingKey(NodeKey),
    /// The parent cannot hold children, or the child is already attached.
    InvalidParent(NodeKey),
    InvalidSibling { parent: NodeKey, before: NodeKey },
    CycleDetected { parent: NodeKey, child: NodeKey },
    WrongNodeKind(NodeKey),
    /// Both handles must belong to the same document.
    CrossDocument,
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::MissingKey(key) => write!(f, "node {} is not live", key.0),
            DomError::InvalidParent(key) => write!(f, "node {} cannot take this child", key.0),
            DomError::InvalidSibling { parent, before } => write!(
                f,
                "node {} is not a child of node {}",
                before.0, parent.0
            ),
            DomError::CycleDetected { parent, child } => write!(
                f,
                "inserting node {} under node {} would create a cycle",
                child.0, parent.0
            ),
            DomError::WrongNodeKind(key) => write!(f, "node {} has the wrong kind", key.0),
            DomError::CrossDocument => write!(f, "nodes belong to different documents"),
        }
    }
}

impl std::error::Error for DomError {}
