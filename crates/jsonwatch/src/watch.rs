//! Path-addressed subscriptions.
//!
//! The [`Registry`] owns every handler for the lifetime of a parse. Nodes
//! never see it directly: each node is handed a [`Scope`] holding a filtered,
//! read-only view of the subscriptions whose remaining path leads into that
//! node. Descending into a key or index keeps only entries whose head segment
//! matches and strips that segment, so a node notifies exactly the entries
//! whose remaining path is empty.
//!
//! A scope also links to its ancestors' completed members, which lets
//! document watchers observe the partial root value while a deeply nested
//! leaf is still growing.

use alloc::{boxed::Box, string::ToString, vec::Vec};
use core::cell::RefCell;

use crate::{
    ParserOptions, Value,
    node::{Node, PairNode, merge_pairs},
    path::{Segment, index_segment},
};

pub(crate) type Handler<'h> = RefCell<Box<dyn FnMut(&Value, &str) + 'h>>;

struct Subscription<'h> {
    path: Vec<Segment>,
    handler: Handler<'h>,
}

#[derive(Default)]
pub(crate) struct Registry<'h> {
    subscriptions: Vec<Subscription<'h>>,
    document: Vec<Handler<'h>>,
}

impl<'h> Registry<'h> {
    pub fn subscribe(&mut self, path: Vec<Segment>, handler: impl FnMut(&Value, &str) + 'h) {
        self.subscriptions.push(Subscription {
            path,
            handler: RefCell::new(Box::new(handler)),
        });
    }

    pub fn subscribe_document(&mut self, handler: impl FnMut(&Value, &str) + 'h) {
        self.document.push(RefCell::new(Box::new(handler)));
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len() + self.document.len()
    }
}

impl core::fmt::Debug for Registry<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field(
                "paths",
                &self.subscriptions.iter().map(|s| &s.path).collect::<Vec<_>>(),
            )
            .field("document", &self.document.len())
            .finish()
    }
}

/// Subscriptions relevant to one node, as `(remaining path, handler)`.
#[derive(Clone, Default)]
pub(crate) struct Watchers<'a, 'h> {
    entries: Vec<(&'a [Segment], &'a Handler<'h>)>,
}

impl<'a, 'h> Watchers<'a, 'h> {
    fn root(registry: &'a Registry<'h>) -> Self {
        Self {
            entries: registry
                .subscriptions
                .iter()
                .map(|s| (s.path.as_slice(), &s.handler))
                .collect(),
        }
    }

    fn descend(&self, segment: &str) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter_map(|&(rest, handler)| match rest.split_first() {
                    Some((head, tail)) if head == segment => Some((tail, handler)),
                    _ => None,
                })
                .collect(),
        }
    }

    fn has_targets(&self) -> bool {
        self.entries.iter().any(|(rest, _)| rest.is_empty())
    }

    fn notify(&self, value: &Value, fragment: &str) {
        for (_, handler) in self.entries.iter().filter(|(rest, _)| rest.is_empty()) {
            let mut handler = handler.borrow_mut();
            (*handler)(value, fragment);
        }
    }
}

/// Where a node sits in the document, for rebuilding the partial root.
enum Frame<'a> {
    Root,
    Member {
        parent: &'a Frame<'a>,
        siblings: &'a [PairNode],
        key: &'a str,
    },
    Element {
        parent: &'a Frame<'a>,
        siblings: &'a [Node],
    },
}

impl Frame<'_> {
    fn assemble(&self, leaf: Value) -> Value {
        match self {
            Frame::Root => leaf,
            Frame::Member {
                parent,
                siblings,
                key,
            } => {
                let mut map = merge_pairs(siblings);
                map.insert((*key).to_string(), leaf);
                parent.assemble(Value::Object(map))
            }
            Frame::Element { parent, siblings } => {
                let mut items: Vec<Value> = siblings.iter().map(Node::value).collect();
                items.push(leaf);
                parent.assemble(Value::Array(items))
            }
        }
    }
}

/// Everything a node needs to report updates.
pub(crate) struct Scope<'a, 'h> {
    watchers: Watchers<'a, 'h>,
    document: &'a [Handler<'h>],
    frame: Frame<'a>,
    // Containers enclosing this node.
    depth: usize,
    options: ParserOptions,
}

impl<'a, 'h> Scope<'a, 'h> {
    pub fn root(registry: &'a Registry<'h>, options: ParserOptions) -> Self {
        Self {
            watchers: Watchers::root(registry),
            document: &registry.document,
            frame: Frame::Root,
            depth: 0,
            options,
        }
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Number of containers enclosing this node.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// A scope that reports nothing, used while reading object keys.
    pub fn silent(&self) -> Scope<'_, 'h> {
        Scope {
            watchers: Watchers::default(),
            document: &self.document[..0],
            frame: Frame::Root,
            depth: self.depth,
            options: self.options,
        }
    }

    /// Scope for the value of member `key`, following the completed `siblings`.
    pub fn member<'b>(&'b self, siblings: &'b [PairNode], key: &'b str) -> Scope<'b, 'h> {
        Scope {
            watchers: self.watchers.descend(key),
            document: self.document,
            frame: Frame::Member {
                parent: &self.frame,
                siblings,
                key,
            },
            depth: self.depth + 1,
            options: self.options,
        }
    }

    /// Scope for the array element following the completed `siblings`.
    pub fn element<'b>(&'b self, siblings: &'b [Node]) -> Scope<'b, 'h> {
        Scope {
            watchers: self.watchers.descend(&index_segment(siblings.len())),
            document: self.document,
            frame: Frame::Element {
                parent: &self.frame,
                siblings,
            },
            depth: self.depth + 1,
            options: self.options,
        }
    }

    /// Reports an update of this node.
    ///
    /// `value` is only materialized when someone is listening.
    pub fn notify(&self, fragment: &str, value: impl FnOnce() -> Value) {
        if !self.watchers.has_targets() && self.document.is_empty() {
            return;
        }
        let value = value();
        self.watchers.notify(&value, fragment);
        if !self.document.is_empty() {
            let root = self.frame.assemble(value);
            for handler in self.document {
                let mut handler = handler.borrow_mut();
                (*handler)(&root, fragment);
            }
        }
    }
}
