//! Incremental JSON parsing over asynchronous, chunked sources.
//!
//! A [`StreamParser`] reads one JSON document character by character from a
//! [`Stream`](futures_core::Stream) of text fragments. Fragments may be split
//! anywhere, even inside a multi-byte character. While the document is still
//! arriving, watchers registered on paths such as `"address.street"` receive
//! the current value of their node every time it grows; once the document is
//! complete the final value is returned by [`StreamParser::run`] and delivered
//! to every [`Deferred`] handle obtained from [`StreamParser::wrap`].

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod escape_buffer;
mod node;
mod value;
mod watch;

mod deferred;
mod driver;
mod error;
mod options;
mod path;
mod reader;

#[doc(hidden)]
pub mod chunk_utils;

#[cfg(test)]
mod tests;

pub use deferred::Deferred;
pub use driver::{StreamParser, parse};
pub use error::{ErrorKind, ParseError};
pub use options::ParserOptions;
#[doc(hidden)]
pub use path::SegmentFrom;
pub use path::{Segment, split_path};
pub use reader::{Checkpoint, StreamReader};
pub use value::{Array, Map, Value};

#[doc(hidden)]
pub use alloc::vec;
#[doc(hidden)]
pub use alloc::vec::Vec as __Vec;

/// Builds a watch path from a heterogeneous list of keys and indices.
///
/// Keys are taken verbatim, so unlike a dot-joined path they may contain `.`.
///
/// ```rust
/// use jsonwatch::path;
///
/// assert_eq!(path!["hobbies", 1, "type"], ["hobbies", "1", "type"]);
/// assert_eq!(path!["a.b"], ["a.b"]);
/// assert!(path![].is_empty());
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        let path: $crate::__Vec<$crate::Segment> =
            $crate::vec![$(<$crate::Segment as $crate::SegmentFrom<_>>::from_segment($elem)),*];
        path
    }};
}
