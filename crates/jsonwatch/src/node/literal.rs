use alloc::string::String;

use futures_core::Stream;

use crate::{ParseError, Value, reader::StreamReader, watch::Scope};

/// Reads the rest of `literal` after its first character was consumed.
async fn expect_literal<S>(
    reader: &mut StreamReader<S>,
    literal: &'static str,
) -> Result<(), ParseError>
where
    S: Stream + Unpin,
    S::Item: AsRef<[u8]>,
{
    let mut chars = literal.chars();
    let first = chars.next().unwrap_or_default();
    let rest = reader
        .read_next_n_chars(chars.count())
        .await
        .map_err(|err| err.expecting(literal))?;
    if literal[first.len_utf8()..] != rest {
        let mut found = String::from(first);
        found.push_str(&rest);
        return Err(reader.unexpected(found, Some(literal)));
    }
    Ok(())
}

#[derive(Debug)]
pub(crate) struct BooleanNode {
    value: bool,
}

impl BooleanNode {
    pub(crate) fn starts_with(c: char) -> bool {
        matches!(c, 't' | 'f')
    }

    pub(crate) fn new(first: char) -> Self {
        Self { value: first == 't' }
    }

    pub(crate) fn first_char(&self) -> char {
        if self.value { 't' } else { 'f' }
    }

    pub(crate) fn value(&self) -> Value {
        Value::Boolean(self.value)
    }

    fn literal(&self) -> &'static str {
        if self.value { "true" } else { "false" }
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
        expect_literal(reader, self.literal()).await?;
        scope.notify(self.literal(), || self.value());
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct NullNode;

impl NullNode {
    pub(crate) async fn parse<S>(
        &mut self,
        reader: &mut StreamReader<S>,
        scope: &Scope<'_, '_>,
    ) -> Result<(), ParseError>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        expect_literal(reader, "null").await?;
        scope.notify("null", || Value::Null);
        Ok(())
    }
}
