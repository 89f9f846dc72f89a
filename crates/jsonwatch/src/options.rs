/// Configuration options for the streaming parser.
///
/// These options control which characters count as blanks between tokens
/// and how often container watchers are notified.
///
/// # Examples
///
/// ```rust
/// use jsonwatch::{ParserOptions, StreamParser};
/// use futures::stream;
///
/// let options = ParserOptions {
///     emit_partial_containers: true,
///     ..Default::default()
/// };
/// let parser = StreamParser::with_options(stream::iter(["[1, 2]"]), options);
/// ```
///
/// # Default
///
/// The flags default to `false` and `max_depth` to 128.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to skip any Unicode whitespace between tokens.
    ///
    /// By default, the parser only skips the four whitespace characters
    /// defined by the JSON specification: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Whether objects and arrays notify their watchers after every completed
    /// member, in addition to the single notification on completion.
    ///
    /// When `false`, a watcher on a container observes exactly one value:
    /// the complete container. Enabling this lets a watcher on the root
    /// observe the document growing one member at a time.
    ///
    /// # Default
    ///
    /// `false`
    pub emit_partial_containers: bool,

    /// The deepest nesting of objects and arrays the parser will enter.
    ///
    /// Containers are parsed recursively, so this bounds stack usage. A
    /// document nested deeper fails with
    /// [`ErrorKind::DepthLimitExceeded`](crate::ErrorKind::DepthLimitExceeded).
    ///
    /// # Default
    ///
    /// `128`
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_unicode_whitespace: false,
            emit_partial_containers: false,
            max_depth: 128,
        }
    }
}

impl ParserOptions {
    pub(crate) fn is_blank(self, c: char) -> bool {
        if self.allow_unicode_whitespace {
            c.is_whitespace()
        } else {
            matches!(c, ' ' | '\n' | '\r' | '\t')
        }
    }
}
