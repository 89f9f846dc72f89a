//! Decoding of `\uXXXX` escape sequences.
//!
//! [`UnicodeEscapeBuffer`] accumulates exactly four ASCII hexadecimal digits
//! into a code unit. A high surrogate is held until the matching low
//! surrogate arrives in the next escape, and the pair is combined into a
//! single `char`.

use crate::error::ErrorKind;

/// Result of feeding one complete four-digit escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Decoded {
    /// A complete scalar value.
    Char(char),
    /// A high surrogate; the next escape must supply the low half.
    AwaitLowSurrogate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeError {
    NotHex(char),
    /// Lone surrogate or a code point that is not a scalar value.
    Invalid(u32),
}

impl From<EscapeError> for ErrorKind {
    fn from(err: EscapeError) -> Self {
        match err {
            EscapeError::NotHex(c) => ErrorKind::UnexpectedCharacter {
                found: c.into(),
                expected: Some("a hex digit"),
            },
            EscapeError::Invalid(code) => ErrorKind::InvalidUnicodeEscape(code),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct UnicodeEscapeBuffer {
    acc: u32,
    len: u8,
    high: Option<u32>,
}

impl UnicodeEscapeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn hex_val(c: char) -> Option<u32> {
        c.to_digit(16)
    }

    /// Returns `true` while a high surrogate is waiting for its low half.
    #[cfg(test)]
    pub fn is_pending_surrogate(&self) -> bool {
        self.high.is_some()
    }

    /// Feeds one hex digit.
    ///
    /// Returns `Ok(None)` until the fourth digit has been supplied.
    pub fn feed(&mut self, c: char) -> Result<Option<Decoded>, EscapeError> {
        let d = Self::hex_val(c).ok_or(EscapeError::NotHex(c))?;
        debug_assert!(self.len < 4);
        self.acc = (self.acc << 4) | d;
        self.len += 1;
        if self.len < 4 {
            return Ok(None);
        }

        let unit = self.acc;
        self.acc = 0;
        self.len = 0;

        match (self.high.take(), unit) {
            (None, 0xD800..=0xDBFF) => {
                self.high = Some(unit);
                Ok(Some(Decoded::AwaitLowSurrogate))
            }
            (Some(high), 0xDC00..=0xDFFF) => {
                let code = 0x10000 + ((high - 0xD800) << 10) + (unit - 0xDC00);
                char::from_u32(code)
                    .map(|ch| Some(Decoded::Char(ch)))
                    .ok_or(EscapeError::Invalid(code))
            }
            (Some(high), _) => Err(EscapeError::Invalid(high)),
            (None, _) => char::from_u32(unit)
                .map(|ch| Some(Decoded::Char(ch)))
                .ok_or(EscapeError::Invalid(unit)),
        }
    }

    /// Fails if a high surrogate is still waiting for its low half.
    pub fn finish(&mut self) -> Result<(), EscapeError> {
        match self.high.take() {
            Some(high) => Err(EscapeError::Invalid(high)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(buf: &mut UnicodeEscapeBuffer, hex: &str) -> Result<Option<Decoded>, EscapeError> {
        let mut last = Ok(None);
        for ch in hex.chars() {
            last = buf.feed(ch);
            if last.is_err() {
                break;
            }
        }
        last
    }

    #[test]
    fn basic_decoding() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('0').unwrap(), None);
        assert_eq!(buf.feed('0').unwrap(), None);
        assert_eq!(buf.feed('4').unwrap(), None);
        assert_eq!(buf.feed('1').unwrap(), Some(Decoded::Char('A')));
    }

    #[test]
    fn mixed_case_hex() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(
            feed_all(&mut buf, "AbCd").unwrap(),
            Some(Decoded::Char(char::from_u32(0xABCD).unwrap()))
        );
    }

    #[test]
    fn invalid_hex_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(buf.feed('G'), Err(EscapeError::NotHex('G')));
    }

    #[test]
    fn surrogate_pair_combines() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(
            feed_all(&mut buf, "D83D").unwrap(),
            Some(Decoded::AwaitLowSurrogate)
        );
        assert!(buf.is_pending_surrogate());
        assert_eq!(feed_all(&mut buf, "DE00").unwrap(), Some(Decoded::Char('😀')));
        assert!(buf.finish().is_ok());
    }

    #[test]
    fn lone_surrogates_error() {
        let mut buf = UnicodeEscapeBuffer::new();
        assert_eq!(
            feed_all(&mut buf, "DC00"),
            Err(EscapeError::Invalid(0xDC00))
        );

        let mut buf = UnicodeEscapeBuffer::new();
        feed_all(&mut buf, "D800").unwrap();
        assert_eq!(
            feed_all(&mut buf, "0041"),
            Err(EscapeError::Invalid(0xD800))
        );

        let mut buf = UnicodeEscapeBuffer::new();
        feed_all(&mut buf, "DBFF").unwrap();
        assert_eq!(buf.finish(), Err(EscapeError::Invalid(0xDBFF)));
    }
}
