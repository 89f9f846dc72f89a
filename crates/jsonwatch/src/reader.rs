//! Buffered character reader over an asynchronous fragment source.
//!
//! The reader pulls fragments from a [`Stream`] only when its buffer is
//! exhausted, decodes UTF-8 one scalar at a time, and tracks line/column for
//! diagnostics. Fragment boundaries carry no meaning and may split anywhere,
//! including inside a multi-byte sequence.
//!
//! One character of lookahead is provided by [`StreamReader::peek_next_char`],
//! which hands back a [`Checkpoint`]. Passing that checkpoint to
//! [`StreamReader::restore`] rewinds the cursor and position counters exactly;
//! the checkpoint is consumed so a peek can be undone at most once.

use alloc::{string::String, vec::Vec};

use futures_core::Stream;
use futures_util::StreamExt;
use tracing::trace;

use crate::{
    ParserOptions,
    error::{ErrorKind, ParseError},
};

/// Saved reader position, produced by a peek.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a peeked character is consumed unless the checkpoint is restored"]
pub struct Checkpoint {
    offset: usize,
    line: usize,
    column: usize,
}

#[derive(Debug)]
pub struct StreamReader<S> {
    source: S,
    buffer: Vec<u8>,
    cursor: usize,
    // Bytes discarded from the front of `buffer`; checkpoints store absolute
    // offsets so they survive compaction.
    dropped: usize,
    exhausted: bool,
    line: usize,
    column: usize,
    options: ParserOptions,
}

impl<S> StreamReader<S>
where
    S: Stream + Unpin,
    S::Item: AsRef<[u8]>,
{
    pub fn new(source: S) -> Self {
        Self::with_options(source, ParserOptions::default())
    }

    pub fn with_options(source: S, options: ParserOptions) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            cursor: 0,
            dropped: 0,
            exhausted: false,
            line: 1,
            column: 0,
            options,
        }
    }

    /// Current `(line, column)`, both 1-based; the column is that of the last
    /// character read on the current line.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    pub(crate) fn options(&self) -> ParserOptions {
        self.options
    }

    pub(crate) fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(kind, self.position())
    }

    pub(crate) fn unexpected(&self, found: impl Into<String>, expected: Option<&'static str>) -> ParseError {
        self.error(ErrorKind::UnexpectedCharacter {
            found: found.into(),
            expected,
        })
    }

    /// Pulls the next non-empty fragment into the buffer.
    ///
    /// Returns `false` once the source is exhausted.
    async fn fill(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        while let Some(fragment) = self.source.next().await {
            let bytes = fragment.as_ref();
            if bytes.is_empty() {
                continue;
            }
            self.buffer.drain(..self.cursor);
            self.dropped += self.cursor;
            self.cursor = 0;
            self.buffer.extend_from_slice(bytes);
            trace!(len = bytes.len(), "pulled fragment");
            return true;
        }
        trace!("source exhausted");
        self.exhausted = true;
        false
    }

    /// Decodes the next scalar without consuming it.
    ///
    /// Returns `Ok(None)` when the source is exhausted and nothing remains.
    async fn decode_next(&mut self) -> Result<Option<(char, usize)>, ParseError> {
        loop {
            let rest = &self.buffer[self.cursor..];
            if !rest.is_empty() {
                let (ch, len) = bstr::decode_utf8(rest);
                // An incomplete sequence may still be finished by the next
                // fragment.
                let incomplete = ch.is_none() && len == rest.len() && rest.len() < 4;
                if let Some(ch) = ch {
                    return Ok(Some((ch, len)));
                }
                if !incomplete || self.exhausted {
                    return Err(self.error(ErrorKind::InvalidUtf8(rest[0])));
                }
            }
            if !self.fill().await {
                if self.cursor < self.buffer.len() {
                    return Err(self.error(ErrorKind::InvalidUtf8(self.buffer[self.cursor])));
                }
                return Ok(None);
            }
        }
    }

    fn advance(&mut self, ch: char, len: usize) {
        self.cursor += len;
        if ch == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }

    /// Reads the next character, failing with a premature-end error once the
    /// source is exhausted.
    pub async fn read_next_char(&mut self) -> Result<char, ParseError> {
        match self.decode_next().await? {
            Some((ch, len)) => {
                self.advance(ch, len);
                Ok(ch)
            }
            None => Err(self.error(ErrorKind::PrematureEnd { expected: None })),
        }
    }

    /// Reads characters until one that is not blank.
    pub async fn read_next_char_skip_blank(&mut self) -> Result<char, ParseError> {
        loop {
            let ch = self.read_next_char().await?;
            if !self.options.is_blank(ch) {
                return Ok(ch);
            }
        }
    }

    /// Reads exactly `n` characters.
    pub async fn read_next_n_chars(&mut self, n: usize) -> Result<String, ParseError> {
        let mut out = String::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_next_char().await?);
        }
        Ok(out)
    }

    /// Reads up to and including `delimiter`, returning the text before it.
    pub async fn read_until(&mut self, delimiter: char) -> Result<String, ParseError> {
        let mut out = String::new();
        loop {
            let ch = self
                .read_next_char()
                .await
                .map_err(|err| err.expecting("delimiter"))?;
            if ch == delimiter {
                return Ok(out);
            }
            out.push(ch);
        }
    }

    /// Reads the next character speculatively.
    ///
    /// Returns `None` instead of failing when the source is exhausted. The
    /// character stays consumed unless the returned checkpoint is passed to
    /// [`restore`](Self::restore).
    pub async fn peek_next_char(&mut self) -> Result<(Option<char>, Checkpoint), ParseError> {
        let checkpoint = Checkpoint {
            offset: self.dropped + self.cursor,
            line: self.line,
            column: self.column,
        };
        match self.decode_next().await? {
            Some((ch, len)) => {
                self.advance(ch, len);
                Ok((Some(ch), checkpoint))
            }
            None => Ok((None, checkpoint)),
        }
    }

    /// Rewinds to a checkpoint taken by [`peek_next_char`](Self::peek_next_char).
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        debug_assert!(checkpoint.offset >= self.dropped);
        self.cursor = checkpoint.offset - self.dropped;
        self.line = checkpoint.line;
        self.column = checkpoint.column;
    }
}
