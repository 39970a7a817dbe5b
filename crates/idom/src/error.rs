use dom::DomError;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedRootReason {
    /// The document node has no owner document and cannot be patched directly.
    DocumentNode,
    /// Text and comment nodes cannot hold children.
    NotAContainer,
    /// The node was removed from its document.
    Detached,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchError {
    NoActiveContext,
    /// `exit_namespace` with only the default entry left; enter/exit tags are unbalanced.
    NamespaceStackUnderflow,
    MalformedRoot(MalformedRootReason),
    /// A node was placed while the cursor sat on the patch root instead of inside it.
    CursorOutsideRoot,
    /// The patch body returned with elements still open.
    UnclosedElements(usize),
    /// The patch body returned with namespaces entered through `enter_tag` and never exited.
    UnclosedNamespaces(usize),
    /// `element_close` named a different tag than the innermost open element.
    MismatchedClose { open: String, close: String },
    Dom(DomError),
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::NoActiveContext => write!(f, "no patch context is active"),
            PatchError::NamespaceStackUnderflow => {
                write!(f, "namespace stack underflow (unbalanced enter/exit tag)")
            }
            PatchError::MalformedRoot(reason) => {
                let detail = match reason {
                    MalformedRootReason::DocumentNode => "document node has no owner document",
                    MalformedRootReason::NotAContainer => "node cannot hold children",
                    MalformedRootReason::Detached => "node was removed from its document",
                };
                write!(f, "malformed patch root: {detail}")
            }
            PatchError::CursorOutsideRoot => write!(f, "cursor is not inside the patch root"),
            PatchError::UnclosedElements(count) => {
                write!(f, "patch finished with {count} element(s) still open")
            }
            PatchError::UnclosedNamespaces(count) => {
                write!(f, "patch finished with {count} namespace(s) still entered")
            }
            PatchError::MismatchedClose { open, close } => {
                write!(f, "element_close({close:?}) does not match open element {open:?}")
            }
            PatchError::Dom(err) => write!(f, "dom error: {err}"),
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatchError::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for PatchError {
    fn from(err: DomError) -> Self {
        PatchError::Dom(err)
    }
}
