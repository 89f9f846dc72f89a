use alloc::string::String;

use futures_core::Stream;

use crate::{ErrorKind, ParseError, Value, reader::StreamReader, watch::Scope};

/// A number literal, accumulated token by token.
///
/// The grammar is looser than RFC 8259: a leading `+`, a leading or trailing
/// `.`, and leading zeros are accepted, as long as the finished literal
/// parses as an `f64`.
#[derive(Debug)]
pub(crate) struct NumberNode {
    first: char,
    literal: String,
    number: f64,
    have_dot: bool,
    have_exponent: bool,
}

impl NumberNode {
    pub(crate) fn starts_with(c: char) -> bool {
        c.is_ascii_digit() || matches!(c, '+' | '-' | '.')
    }

    pub(crate) fn new(first: char) -> Self {
        Self {
            first,
            literal: String::from(first),
            number: 0.0,
            have_dot: first == '.',
            have_exponent: false,
        }
    }

    pub(crate) fn first_char(&self) -> char {
        self.first
    }

    pub(crate) fn literal(&self) -> &str {
        &self.literal
    }

    pub(crate) fn value(&self) -> Value {
        Value::Number(self.number)
    }

    pub(crate) async fn parse<S>(
        &mut self,
        reader: &mut StreamReader<S>,
        scope: &Scope<'_, '_>,
    ) -> Result<(), ParseError>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        let mut token = String::from(self.first);
        if self.first.is_ascii_digit() {
            token.push_str(&self.read_digits(reader).await?);
        }
        self.report(scope, &token);

        loop {
            let (ch, checkpoint) = reader.peek_next_char().await?;
            let Some(ch) = ch else {
                break;
            };
            let token = match ch {
                '+' | '-' => {
                    // A sign is only valid as the first character or right
                    // after the exponent marker.
                    return Err(reader.unexpected(ch, Some("a digit")));
                }
                '.' if self.have_dot || self.have_exponent => {
                    return Err(reader.unexpected(ch, Some("a digit")));
                }
                '.' => {
                    self.have_dot = true;
                    self.literal.push('.');
                    String::from('.')
                }
                '0'..='9' => {
                    self.literal.push(ch);
                    let mut token = String::from(ch);
                    token.push_str(&self.read_digits(reader).await?);
                    token
                }
                'e' | 'E' => {
                    if self.have_exponent || !self.literal.ends_with(|c: char| c.is_ascii_digit()) {
                        return Err(reader.unexpected(ch, Some("a digit")));
                    }
                    self.have_exponent = true;
                    self.literal.push(ch);
                    let mut token = String::from(ch);
                    token.push_str(&self.read_exponent(reader).await?);
                    token
                }
                _ => {
                    reader.restore(checkpoint);
                    break;
                }
            };
            self.report(scope, &token);
        }

        self.number = self
            .literal
            .parse()
            .map_err(|_| reader.unexpected(self.literal.as_str(), Some("a number")))?;
        scope.notify(self.literal(), || self.value());
        Ok(())
    }

    /// Notifies watchers if the literal so far is already a number.
    fn report(&mut self, scope: &Scope<'_, '_>, token: &str) {
        if let Ok(number) = self.literal.parse() {
            self.number = number;
            scope.notify(token, || self.value());
        }
    }

    /// Consumes a run of digits, appending them to the literal.
    async fn read_digits<S>(&mut self, reader: &mut StreamReader<S>) -> Result<String, ParseError>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        let mut run = String::new();
        loop {
            let (ch, checkpoint) = reader.peek_next_char().await?;
            match ch {
                Some(d) if d.is_ascii_digit() => {
                    self.literal.push(d);
                    run.push(d);
                }
                _ => {
                    reader.restore(checkpoint);
                    return Ok(run);
                }
            }
        }
    }

    /// Consumes an optional sign and the mandatory digits after `e`.
    async fn read_exponent<S>(&mut self, reader: &mut StreamReader<S>) -> Result<String, ParseError>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        let mut out = String::new();
        let (ch, checkpoint) = reader.peek_next_char().await?;
        match ch {
            Some(sign @ ('+' | '-')) => {
                self.literal.push(sign);
                out.push(sign);
            }
            _ => reader.restore(checkpoint),
        }

        let digits = self.read_digits(reader).await?;
        if digits.is_empty() {
            let (ch, _checkpoint) = reader.peek_next_char().await?;
            return Err(match ch {
                Some(ch) => reader.unexpected(ch, Some("exponent digits")),
                None => reader.error(ErrorKind::PrematureEnd {
                    expected: Some("exponent digits"),
                }),
            });
        }
        out.push_str(&digits);
        Ok(out)
    }
}
