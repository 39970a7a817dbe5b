//! Namespace resolution for element creation.
//!
//! Only two tags change the namespace: `svg` enters the SVG namespace and
//! `foreignObject` returns to the default namespace inside SVG content. Every
//! other tag inherits whatever namespace encloses it.

use crate::context::ContextStack;
use crate::error::PatchError;
use std::sync::{Arc, OnceLock};

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

static SVG_NAMESPACE_ARC: OnceLock<Arc<str>> = OnceLock::new();

fn svg_namespace() -> Arc<str> {
    SVG_NAMESPACE_ARC
        .get_or_init(|| Arc::from(SVG_NAMESPACE))
        .clone()
}

const SVG_TAG: &str = "svg";
const FOREIGN_OBJECT_TAG: &str = "foreignObject";

pub fn is_namespace_boundary(tag: &str) -> bool {
    tag == SVG_TAG || tag == FOREIGN_OBJECT_TAG
}

/// Updates the active context's namespace stack on entering `tag`.
pub fn enter_tag(stack: &mut ContextStack, tag: &str) -> Result<(), PatchError> {
    let namespace = match tag {
        SVG_TAG => Some(svg_namespace()),
        FOREIGN_OBJECT_TAG => None,
        _ => return Ok(()),
    };
    stack.require_current_mut()?.enter_namespace(namespace);
    Ok(())
}

/// Undoes `enter_tag` for the same tag on leaving its subtree.
pub fn exit_tag(stack: &mut ContextStack, tag: &str) -> Result<(), PatchError> {
    if !is_namespace_boundary(tag) {
        return Ok(());
    }
    stack.require_current_mut()?.exit_namespace()
}

/// Namespace an element named `tag` must be created in at the current position.
///
/// `svg` always resolves to the SVG namespace, since the element is created
/// before `enter_tag` runs for it.
pub fn namespace_for_tag(stack: &ContextStack, tag: &str) -> Result<Option<Arc<str>>, PatchError> {
    if tag == SVG_TAG {
        return Ok(Some(svg_namespace()));
    }
    Ok(stack.require_current()?.current_namespace_arc())
}

/// Runs `f` with `tag` entered. The tag is exited even if `f` fails; the
/// error from `f` wins over an exit error.
pub fn with_tag<R>(
    stack: &mut ContextStack,
    tag: &str,
    f: impl FnOnce(&mut ContextStack) -> Result<R, PatchError>,
) -> Result<R, PatchError> {
    enter_tag(stack, tag)?;
    let result = f(stack);
    let exited = exit_tag(stack, tag);
    let value = result?;
    exited?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::{SVG_NAMESPACE, enter_tag, exit_tag, namespace_for_tag, with_tag};
    use crate::context::ContextStack;
    use crate::error::PatchError;
    use dom::Document;
    use std::sync::Arc;

    fn active_stack() -> ContextStack {
        let doc = Document::new();
        let mut stack = ContextStack::default();
        stack.enter(doc.create_document_fragment()).unwrap();
        stack
    }

    fn current(stack: &ContextStack) -> Option<String> {
        stack
            .current()
            .unwrap()
            .current_namespace()
            .map(str::to_string)
    }

    #[test]
    fn svg_enters_and_exits() {
        let mut stack = active_stack();
        enter_tag(&mut stack, "svg").unwrap();
        assert_eq!(current(&stack).as_deref(), Some(SVG_NAMESPACE));
        exit_tag(&mut stack, "svg").unwrap();
        assert_eq!(current(&stack), None);
    }

    #[test]
    fn foreign_object_resets_to_default() {
        let mut stack = active_stack();
        enter_tag(&mut stack, "svg").unwrap();
        enter_tag(&mut stack, "foreignObject").unwrap();
        assert_eq!(current(&stack), None);
        exit_tag(&mut stack, "foreignObject").unwrap();
        assert_eq!(current(&stack).as_deref(), Some(SVG_NAMESPACE));
    }

    #[test]
    fn ordinary_tags_do_not_touch_the_stack() {
        let mut stack = active_stack();
        enter_tag(&mut stack, "div").unwrap();
        enter_tag(&mut stack, "SVG").unwrap();
        assert_eq!(stack.current().unwrap().namespace_depth(), 1);
        exit_tag(&mut stack, "div").unwrap();
        assert_eq!(stack.current().unwrap().namespace_depth(), 1);
    }

    #[test]
    fn svg_namespace_is_known_before_entering() {
        let stack = active_stack();
        assert_eq!(
            namespace_for_tag(&stack, "svg").unwrap().as_deref(),
            Some(SVG_NAMESPACE)
        );
        assert_eq!(namespace_for_tag(&stack, "div").unwrap(), None);
        let empty = ContextStack::default();
        assert_eq!(
            namespace_for_tag(&empty, "svg").unwrap().as_deref(),
            Some(SVG_NAMESPACE)
        );
        assert_eq!(namespace_for_tag(&empty, "g"), Err(PatchError::NoActiveContext));
    }

    #[test]
    fn resolved_namespaces_share_one_allocation() {
        let mut stack = active_stack();
        let created = namespace_for_tag(&stack, "svg").unwrap().unwrap();
        enter_tag(&mut stack, "svg").unwrap();
        let inherited = namespace_for_tag(&stack, "rect").unwrap().unwrap();
        assert!(Arc::ptr_eq(&created, &inherited));
    }

    #[test]
    fn unbalanced_exit_is_reported() {
        let mut stack = active_stack();
        assert_eq!(
            exit_tag(&mut stack, "foreignObject"),
            Err(PatchError::NamespaceStackUnderflow)
        );
    }

    #[test]
    fn with_tag_exits_on_error() {
        let mut stack = active_stack();
        let result: Result<(), PatchError> = with_tag(&mut stack, "svg", |stack| {
            assert_eq!(current(stack).as_deref(), Some(SVG_NAMESPACE));
            Err(PatchError::NoActiveContext)
        });
        assert_eq!(result, Err(PatchError::NoActiveContext));
        assert_eq!(stack.current().unwrap().namespace_depth(), 1);
    }
}
