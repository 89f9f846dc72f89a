//! The value node tree.
//!
//! A document is parsed by recursive descent over [`Node`]s. At every
//! position where a value may start, one non-blank lookahead character picks
//! the variant ([`Node::dispatch`]); the variant then consumes the rest of its
//! text from the reader, reporting updates through its [`Scope`].
//!
//! Containers own their children. A child is created, parsed to completion,
//! and only then appended, so a container's children are always complete and
//! the in-progress child is visible to document watchers only through the
//! scope chain.

mod array;
mod literal;
mod number;
mod object;
mod string;

use futures_core::Stream;
use futures_util::{FutureExt, future::LocalBoxFuture};
use tracing::trace;

pub(crate) use self::{
    array::ArrayNode,
    literal::{BooleanNode, NullNode},
    number::NumberNode,
    object::{ObjectNode, PairNode, merge_pairs},
    string::StringNode,
};
use crate::{ParseError, Value, reader::StreamReader, watch::Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

#[derive(Debug)]
pub(crate) enum Node {
    Object(ObjectNode),
    Array(ArrayNode),
    String(StringNode),
    Number(NumberNode),
    Boolean(BooleanNode),
    Null(NullNode),
}

impl Node {
    /// Selects the node for a value starting with `first`.
    pub(crate) fn dispatch<S>(first: char, reader: &StreamReader<S>) -> Result<Self, ParseError>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        let node = match first {
            '{' => Self::Object(ObjectNode::default()),
            '[' => Self::Array(ArrayNode::default()),
            '"' => Self::String(StringNode::default()),
            c if NumberNode::starts_with(c) => Self::Number(NumberNode::new(c)),
            c if BooleanNode::starts_with(c) => Self::Boolean(BooleanNode::new(c)),
            'n' => Self::Null(NullNode),
            c => return Err(reader.unexpected(c, Some("a JSON value"))),
        };
        trace!(kind = ?node.kind(), first = %node.first_char(), "dispatch");
        Ok(node)
    }

    pub(crate) fn kind(&self) -> Kind {
        match self {
            Self::Object(_) => Kind::Object,
            Self::Array(_) => Kind::Array,
            Self::String(_) => Kind::String,
            Self::Number(_) => Kind::Number,
            Self::Boolean(_) => Kind::Boolean,
            Self::Null(_) => Kind::Null,
        }
    }

    /// The character that selected this node.
    pub(crate) fn first_char(&self) -> char {
        match self {
            Self::Object(_) => '{',
            Self::Array(_) => '[',
            Self::String(_) => '"',
            Self::Number(n) => n.first_char(),
            Self::Boolean(b) => b.first_char(),
            Self::Null(_) => 'n',
        }
    }

    /// Materializes the current value of this subtree.
    pub(crate) fn value(&self) -> Value {
        match self {
            Self::Object(n) => n.value(),
            Self::Array(n) => n.value(),
            Self::String(n) => n.value(),
            Self::Number(n) => n.value(),
            Self::Boolean(n) => n.value(),
            Self::Null(_) => Value::Null,
        }
    }

    /// Parses the rest of this value; the first character was already
    /// consumed by [`dispatch`](Self::dispatch).
    pub(crate) fn parse<'s, 'h, S>(
        &'s mut self,
        reader: &'s mut StreamReader<S>,
        scope: &'s Scope<'s, 'h>,
    ) -> LocalBoxFuture<'s, Result<(), ParseError>>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        async move {
            match self {
                Self::Object(n) => n.parse(reader, scope).await,
                Self::Array(n) => n.parse(reader, scope).await,
                Self::String(n) => n.parse(reader, scope).await,
                Self::Number(n) => n.parse(reader, scope).await,
                Self::Boolean(n) => n.parse(reader, scope).await,
                Self::Null(n) => n.parse(reader, scope).await,
            }
        }
        .boxed_local()
    }
}
