#![allow(dead_code)]

use dom::NodeRef;
use idom::{ContextStack, Notifications, PatchError, element_close, element_open};
use serde::Deserialize;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub const NAMESPACES_FORMAT_V1: &str = "idom-namespaces-v1";

#[derive(Debug, Deserialize)]
pub struct NamespaceManifest {
    pub format: String,
    pub cases: Vec<NamespaceCase>,
}

#[derive(Debug, Deserialize)]
pub struct NamespaceCase {
    pub id: String,
    pub events: Vec<String>,
    pub expected: Vec<ExpectedElement>,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct ExpectedElement {
    pub tag: String,
    pub namespace: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagEvent<'a> {
    Open(&'a str),
    Close(&'a str),
}

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_namespace_manifest(path: &Path) -> NamespaceManifest {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|err| panic!("failed to read namespace fixtures {path:?}: {err}"));
    let manifest: NamespaceManifest = toml::from_str(&content)
        .unwrap_or_else(|err| panic!("failed to parse namespace fixtures {path:?}: {err}"));
    assert_eq!(
        manifest.format, NAMESPACES_FORMAT_V1,
        "unsupported namespace fixture format in {path:?}"
    );
    manifest
}

pub fn parse_event(raw: &str) -> TagEvent<'_> {
    if let Some(tag) = raw.strip_prefix('+') {
        TagEvent::Open(tag)
    } else if let Some(tag) = raw.strip_prefix('-') {
        TagEvent::Close(tag)
    } else {
        panic!("tag event must start with '+' or '-': {raw:?}")
    }
}

/// Replays `events` at the cursor of the active context.
pub fn replay(stack: &mut ContextStack, events: &[String]) -> Result<(), PatchError> {
    for raw in events {
        match parse_event(raw) {
            TagEvent::Open(tag) => {
                element_open(stack, tag)?;
            }
            TagEvent::Close(tag) => {
                element_close(stack, tag)?;
            }
        }
    }
    Ok(())
}

/// Collects every batch handed to the created/deleted hooks.
#[derive(Clone, Default)]
pub struct Recorder {
    pub created: Rc<RefCell<Vec<Vec<NodeRef>>>>,
    pub deleted: Rc<RefCell<Vec<Vec<NodeRef>>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_only(&self) -> Notifications {
        let created = self.created.clone();
        Notifications::new().on_nodes_created(move |nodes| created.borrow_mut().push(nodes.to_vec()))
    }

    pub fn deleted_only(&self) -> Notifications {
        let deleted = self.deleted.clone();
        Notifications::new().on_nodes_deleted(move |nodes| deleted.borrow_mut().push(nodes.to_vec()))
    }

    pub fn both(&self) -> Notifications {
        let created = self.created.clone();
        let deleted = self.deleted.clone();
        Notifications::new()
            .on_nodes_created(move |nodes| created.borrow_mut().push(nodes.to_vec()))
            .on_nodes_deleted(move |nodes| deleted.borrow_mut().push(nodes.to_vec()))
    }

    pub fn created_batches(&self) -> Vec<Vec<NodeRef>> {
        self.created.borrow().clone()
    }

    pub fn deleted_batches(&self) -> Vec<Vec<NodeRef>> {
        self.deleted.borrow().clone()
    }
}
