use alloc::{string::String, vec::Vec};

use futures_core::Stream;

use super::{Node, StringNode};
use crate::{ErrorKind, Map, ParseError, Value, reader::StreamReader, watch::Scope};

const COMMA_OR_END: &str = r#""}" or ",""#;

/// Merges single-entry mappings in encounter order; later keys win.
pub(crate) fn merge_pairs(pairs: &[PairNode]) -> Map {
    pairs
        .iter()
        .map(|pair| (String::from(pair.key()), pair.value.value()))
        .collect()
}

#[derive(Debug, Default)]
pub(crate) struct ObjectNode {
    children: Vec<PairNode>,
}

impl ObjectNode {
    pub(crate) fn value(&self) -> Value {
        Value::Object(merge_pairs(&self.children))
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
        let max_depth = scope.options().max_depth;
        if scope.depth() >= max_depth {
            return Err(reader.error(ErrorKind::DepthLimitExceeded(max_depth)));
        }
        loop {
            // A `}` here closes an empty object or follows a trailing comma.
            let ch = reader
                .read_next_char_skip_blank()
                .await
                .map_err(|err| err.expecting(r#""}""#))?;
            if ch == '}' {
                break;
            }
            if ch != '"' {
                return Err(reader.unexpected(ch, Some(r#""\"" or "}""#)));
            }

            let pair = PairNode::parse(reader, scope, &self.children).await?;
            self.children.push(pair);
            if scope.options().emit_partial_containers {
                scope.notify("", || self.value());
            }

            match reader
                .read_next_char_skip_blank()
                .await
                .map_err(|err| err.expecting(COMMA_OR_END))?
            {
                ',' => {}
                '}' => break,
                ch => return Err(reader.unexpected(ch, Some(COMMA_OR_END))),
            }
        }
        scope.notify("}", || self.value());
        Ok(())
    }
}

/// One `"key": value` member of an object.
#[derive(Debug)]
pub(crate) struct PairNode {
    key: StringNode,
    value: Node,
}

impl PairNode {
    pub(crate) fn key(&self) -> &str {
        self.key.text()
    }

    /// The single-entry mapping `{key: value}`.
    #[cfg(test)]
    pub(crate) fn entry(&self) -> Map {
        core::iter::once((String::from(self.key()), self.value.value())).collect()
    }

    /// Parses a member whose opening quote was already consumed.
    ///
    /// `siblings` are the members completed before this one.
    pub(crate) async fn parse<S>(
        reader: &mut StreamReader<S>,
        scope: &Scope<'_, '_>,
        siblings: &[PairNode],
    ) -> Result<Self, ParseError>
    where
        S: Stream + Unpin,
        S::Item: AsRef<[u8]>,
    {
        let mut key = StringNode::default();
        key.parse(reader, &scope.silent()).await?;

        let ch = reader
            .read_next_char_skip_blank()
            .await
            .map_err(|err| err.expecting(r#"":""#))?;
        if ch != ':' {
            return Err(reader.unexpected(ch, Some(r#"":""#)));
        }

        let first = reader
            .read_next_char_skip_blank()
            .await
            .map_err(|err| err.expecting("a JSON value"))?;
        let mut value = Node::dispatch(first, reader)?;
        value
            .parse(reader, &scope.member(siblings, key.text()))
            .await?;

        Ok(Self { key, value })
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use futures::{executor::block_on, stream};

    use super::*;
    use crate::{ParserOptions, watch::Registry};

    fn parse_object(src: &str) -> Result<ObjectNode, ParseError> {
        let registry = Registry::default();
        let scope = Scope::root(&registry, ParserOptions::default());
        let mut reader = StreamReader::new(stream::iter([src]));
        let mut node = ObjectNode::default();
        block_on(async {
            assert_eq!(reader.read_next_char().await?, '{');
            node.parse(&mut reader, &scope).await
        })?;
        Ok(node)
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let node = parse_object(r#"{"a": 1, "b": 2, "a": 3}"#).unwrap();
        assert_eq!(node.children.len(), 3);
        assert_eq!(node.value().to_string(), r#"{"a":3,"b":2}"#);
        assert_eq!(node.children[0].entry(), {
            let mut m = Map::new();
            m.insert("a".into(), Value::Number(1.0));
            m
        });
    }

    #[test]
    fn empty_and_trailing_comma() {
        assert!(parse_object("{ }").unwrap().children.is_empty());
        assert_eq!(parse_object(r#"{"a":null,}"#).unwrap().children.len(), 1);
    }

    #[test]
    fn missing_colon_is_reported() {
        let err = parse_object(r#"{"a" 1}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"unexpected character "1", expected ":" at 1:6"#);
    }

    #[test]
    fn bad_separator_cites_comma_or_end() {
        let err = parse_object(r#"{"a":1;"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"unexpected character ";", expected "}" or "," at 1:7"#
        );
    }

    #[test]
    fn unquoted_key_is_rejected() {
        let err = parse_object("{a:1}").unwrap_err();
        assert!(err.is_unexpected_character());
    }

    #[test]
    fn truncated_object_is_premature_end() {
        let err = parse_object(r#"{"a":1"#).unwrap_err();
        assert!(err.is_premature_end());
    }
}
