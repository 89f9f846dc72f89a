//! The parse driver.
//!
//! [`StreamParser`] is used in two phases. While it is owned it accepts
//! watchers; [`StreamParser::run`] then consumes it and drives a single
//! document to completion. Because `run` takes the parser by value, a watcher
//! can never be registered once reading has started.

use core::fmt;

use futures_core::Stream;
use tracing::debug;

use crate::{
    Deferred, ParseError, ParserOptions, Value,
    node::Node,
    path::{Segment, split_path},
    reader::StreamReader,
    watch::{Registry, Scope},
};

/// Incremental JSON parser over an asynchronous source of text fragments.
///
/// # Examples
///
/// ```
/// use std::{cell::RefCell, rc::Rc};
///
/// use futures::{executor::block_on, stream};
/// use jsonwatch::StreamParser;
///
/// let fragments = [r#"{"address": {"str"#, r#"eet": "Main"#, r#" St"}}"#];
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let mut parser = StreamParser::new(stream::iter(fragments));
/// let sink = Rc::clone(&seen);
/// parser.watch("address.street", move |value, _| {
///     sink.borrow_mut().push(value.as_str().unwrap_or_default().to_string());
/// });
/// let done = parser.wrap();
///
/// let value = block_on(parser.run()).unwrap();
/// assert_eq!(value.to_string(), r#"{"address":{"street":"Main St"}}"#);
/// assert_eq!(seen.borrow().last().map(String::as_str), Some("Main St"));
/// assert_eq!(done.outcome(), Some(Ok(value)));
/// ```
pub struct StreamParser<'h, S> {
    reader: StreamReader<S>,
    registry: Registry<'h>,
    deferred: Deferred<Value, ParseError>,
}

impl<'h, S> StreamParser<'h, S>
where
    S: Stream + Unpin,
    S::Item: AsRef<[u8]>,
{
    /// Creates a parser; nothing is read until [`run`](Self::run).
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Self {
            reader: StreamReader::with_options(source, options),
            registry: Registry::default(),
            deferred: Deferred::new(),
        }
    }

    /// Watches the node at a dot-joined path such as `"hobbies.1.type"`.
    ///
    /// The empty path watches the root. `handler` receives the node's current
    /// value and the text fragment that triggered the update.
    pub fn watch(&mut self, path: &str, handler: impl FnMut(&Value, &str) + 'h) -> &mut Self {
        self.registry.subscribe(split_path(path), handler);
        self
    }

    /// Like [`watch`](Self::watch), with the path given as segments.
    ///
    /// Use this for keys that contain `.`.
    pub fn watch_path<P: AsRef<str>>(
        &mut self,
        segments: &[P],
        handler: impl FnMut(&Value, &str) + 'h,
    ) -> &mut Self {
        let path = segments
            .iter()
            .map(|s| Segment::from(s.as_ref()))
            .collect();
        self.registry.subscribe(path, handler);
        self
    }

    /// Watches the whole document as it grows.
    ///
    /// On every update anywhere in the tree, `handler` receives the partial
    /// root: every completed member plus the one being read.
    pub fn watch_document(&mut self, handler: impl FnMut(&Value, &str) + 'h) -> &mut Self {
        self.registry.subscribe_document(handler);
        self
    }

    /// Returns a handle settled with the outcome of [`run`](Self::run).
    #[must_use]
    pub fn wrap(&self) -> Deferred<Value, ParseError> {
        self.deferred.clone()
    }

    /// Parses one JSON value from the source.
    ///
    /// Input after the value is left unread. The outcome is also delivered
    /// to every handle returned by [`wrap`](Self::wrap).
    ///
    /// # Errors
    ///
    /// Returns the first syntax error, invalid UTF-8 byte, or premature end of
    /// the source. Updates already delivered to watchers are not retracted.
    pub async fn run(self) -> Result<Value, ParseError> {
        let Self {
            mut reader,
            registry,
            deferred,
        } = self;
        debug!(watchers = registry.len(), "parse started");

        let outcome = parse_document(&mut reader, &registry).await;
        match &outcome {
            Ok(value) => {
                debug!(position = ?reader.position(), "parse finished");
                deferred.resolve(value.clone());
            }
            Err(err) => {
                debug!(error = %err, "parse failed");
                deferred.reject(err.clone());
            }
        }
        outcome
    }
}

impl<S> fmt::Debug for StreamParser<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamParser")
            .field("registry", &self.registry)
            .field("deferred", &self.deferred)
            .finish_non_exhaustive()
    }
}

async fn parse_document<S>(
    reader: &mut StreamReader<S>,
    registry: &Registry<'_>,
) -> Result<Value, ParseError>
where
    S: Stream + Unpin,
    S::Item: AsRef<[u8]>,
{
    let scope = Scope::root(registry, reader.options());
    let first = reader
        .read_next_char_skip_blank()
        .await
        .map_err(|err| err.expecting("a JSON value"))?;
    let mut root = Node::dispatch(first, reader)?;
    root.parse(reader, &scope).await?;
    Ok(root.value())
}

/// Parses one JSON value from `source` without watchers.
///
/// ```
/// use futures::{executor::block_on, stream};
///
/// let value = block_on(jsonwatch::parse(stream::iter(["[1, ", "true]"]))).unwrap();
/// assert_eq!(value.to_string(), "[1,true]");
/// ```
///
/// # Errors
///
/// See [`StreamParser::run`].
pub async fn parse<S>(source: S) -> Result<Value, ParseError>
where
    S: Stream + Unpin,
    S::Item: AsRef<[u8]>,
{
    StreamParser::new(source).run().await
}
