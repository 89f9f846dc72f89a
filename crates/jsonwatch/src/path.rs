//! Watch paths.
//!
//! A path addresses a node inside the document as a sequence of segments.
//! Each segment is either an object key or an array index written in
//! decimal, so `"hobbies.1.type"` and `path!["hobbies", 1, "type"]` name the
//! same node.
use alloc::{
    string::{String, ToString},
    vec::Vec,
};

/// One component of a watch path: an object key, or an array index as text.
pub type Segment = String;

/// Splits a dot-joined path into segments.
///
/// The empty string addresses the document root.
///
/// ```
/// use jsonwatch::split_path;
///
/// assert_eq!(split_path("address.street"), ["address", "street"]);
/// assert!(split_path("").is_empty());
/// ```
#[must_use]
pub fn split_path(path: &str) -> Vec<Segment> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.').map(ToString::to_string).collect()
}

/// Text of the segment addressing array element `index`.
pub(crate) fn index_segment(index: usize) -> Segment {
    index.to_string()
}

#[doc(hidden)]
pub trait SegmentFrom<T> {
    fn from_segment(value: T) -> Segment;
}

macro_rules! impl_integer_as_segment {
    ($($t:ty),+) => {
        $(
            impl SegmentFrom<$t> for Segment {
                fn from_segment(value: $t) -> Self {
                    value.to_string()
                }
            }
        )+
    };
}
impl_integer_as_segment!(u8, u16, u32, u64, usize, i32);

impl SegmentFrom<&str> for Segment {
    fn from_segment(value: &str) -> Self {
        value.to_string()
    }
}

impl SegmentFrom<String> for Segment {
    fn from_segment(value: String) -> Self {
        value
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;
    use crate::path;

    #[test]
    fn split_nested_path() {
        assert_eq!(split_path("hobbies.1.type"), vec!["hobbies", "1", "type"]);
    }

    #[test]
    fn split_keeps_empty_segments() {
        assert_eq!(split_path("a..b"), vec!["a", "", "b"]);
        assert_eq!(split_path("."), vec!["", ""]);
    }

    #[test]
    fn macro_mixes_keys_and_indices() {
        assert_eq!(path!["a.b", 0, "c"], vec!["a.b", "0", "c"]);
        assert!(path![].is_empty());
    }
}
