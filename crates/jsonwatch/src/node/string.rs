use alloc::string::String;

use futures_core::Stream;

use crate::{
    ParseError, Value,
    escape_buffer::{Decoded, UnicodeEscapeBuffer},
    reader::StreamReader,
    watch::Scope,
};

#[derive(Debug, Default)]
pub(crate) struct StringNode {
    text: String,
}

impl StringNode {
    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn value(&self) -> Value {
        Value::String(self.text.clone())
    }

    /// Reads up to and including the closing quote.
    ///
    /// Watchers see the text after every decoded character, then once more
    /// with an empty fragment when the string closes.
    pub(crate) async fn parse<S>(
        &mut self,
        reader: &mut StreamReader<S>,
        scope: &Scope<'_, '_>,
    ) -> Result<(), ParseError>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        let mut escape = UnicodeEscapeBuffer::new();
        loop {
            let ch = reader
                .read_next_char()
                .await
                .map_err(|err| err.expecting(r#"'"'"#))?;

            let decoded = if ch == '\\' {
                let esc = reader
                    .read_next_char()
                    .await
                    .map_err(|err| err.expecting("an escape character"))?;
                if esc == 'u' {
                    let hex = reader
                        .read_next_n_chars(4)
                        .await
                        .map_err(|err| err.expecting("4 hex digits"))?;
                    let mut decoded = None;
                    for digit in hex.chars() {
                        decoded = escape
                            .feed(digit)
                            .map_err(|err| reader.error(err.into()))?;
                    }
                    match decoded {
                        Some(Decoded::Char(c)) => c,
                        Some(Decoded::AwaitLowSurrogate) | None => continue,
                    }
                } else {
                    escape.finish().map_err(|err| reader.error(err.into()))?;
                    match esc {
                        'n' => '\n',
                        'r' => '\r',
                        't' => '\t',
                        'b' => '\u{8}',
                        'f' => '\u{c}',
                        other => other,
                    }
                }
            } else {
                escape.finish().map_err(|err| reader.error(err.into()))?;
                if ch == '"' {
                    break;
                }
                ch
            };

            self.text.push(decoded);
            let mut utf8 = [0; 4];
            scope.notify(decoded.encode_utf8(&mut utf8), || self.value());
        }
        scope.notify("", || self.value());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::{rc::Rc, vec, vec::Vec};
    use core::cell::RefCell;

    use futures::{executor::block_on, stream};
    use rstest::rstest;

    use super::*;
    use crate::{ErrorKind, ParserOptions, watch::Registry};

    fn parse_string(chunks: Vec<&str>) -> Result<String, ParseError> {
        let registry = Registry::default();
        let scope = Scope::root(&registry, ParserOptions::default());
        let mut reader = StreamReader::new(stream::iter(chunks));
        let mut node = StringNode::default();
        block_on(async {
            assert_eq!(reader.read_next_char().await?, '"');
            node.parse(&mut reader, &scope).await
        })?;
        Ok(node.text)
    }

    #[rstest]
    #[case(vec![r#""""#], "")]
    #[case(vec![r#""hello""#], "hello")]
    #[case(vec![r#""a\nb\tc\rd""#], "a\nb\tc\rd")]
    #[case(vec![r#""\b\f""#], "\u{8}\u{c}")]
    #[case(vec![r#""\"\\\/""#], "\"\\/")]
    #[case(vec![r#""Aé""#], "Aé")]
    #[case(vec![r#""😀""#], "😀")]
    #[case(vec!["\"\\", "u00", "41", "\""], "A")]
    #[case(vec!["\"日本", "語\""], "日本語")]
    fn decodes(#[case] chunks: Vec<&str>, #[case] expected: &str) {
        assert_eq!(parse_string(chunks).unwrap(), expected);
    }

    #[rstest]
    #[case(r#""\uD83Dx""#, 0xD83D)]
    #[case(r#""\uD83D\n""#, 0xD83D)]
    #[case(r#""\uDE00""#, 0xDE00)]
    #[case(r#""\uD83D""#, 0xD83D)]
    fn lone_surrogates_are_rejected(#[case] src: &str, #[case] code: u32) {
        let err = parse_string(vec![src]).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidUnicodeEscape(code));
    }

    #[test]
    fn bad_hex_digit() {
        let err = parse_string(vec![r#""\u00G1""#]).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnexpectedCharacter {
                found: "G".into(),
                expected: Some("a hex digit"),
            }
        );
    }

    #[test]
    fn unterminated_string_is_premature_end() {
        let err = parse_string(vec!["\"abc"]).unwrap_err();
        assert!(err.is_premature_end());
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 4);
    }

    #[test]
    fn notifies_per_character_then_on_close() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = Registry::default();
        let sink = Rc::clone(&log);
        registry.subscribe(Vec::new(), move |v: &Value, fragment: &str| {
            sink.borrow_mut()
                .push((String::from(v.as_str().unwrap_or_default()), String::from(fragment)));
        });
        let scope = Scope::root(&registry, ParserOptions::default());
        let mut reader = StreamReader::new(stream::iter(vec!["\"h", "i\\n\""]));
        let mut node = StringNode::default();
        block_on(async {
            reader.read_next_char().await.unwrap();
            node.parse(&mut reader, &scope).await.unwrap();
        });
        let log: Vec<(String, String)> = log.borrow().clone();
        assert_eq!(
            log,
            vec![
                ("h".into(), "h".into()),
                ("hi".into(), "i".into()),
                ("hi\n".into(), "\n".into()),
                ("hi\n".into(), "".into()),
            ]
        );
    }
}
