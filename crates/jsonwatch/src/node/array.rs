use alloc::vec::Vec;

use futures_core::Stream;

use super::Node;
use crate::{ErrorKind, ParseError, Value, reader::StreamReader, watch::Scope};

const COMMA_OR_END: &str = r#""]" or ",""#;

#[derive(Debug, Default)]
pub(crate) struct ArrayNode {
    children: Vec<Node>,
}

impl ArrayNode {
    pub(crate) fn value(&self) -> Value {
        Value::Array(self.children.iter().map(Node::value).collect())
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
            let first = reader
                .read_next_char_skip_blank()
                .await
                .map_err(|err| err.expecting(r#"a JSON value or "]""#))?;
            if first == ']' {
                break;
            }

            let mut child = Node::dispatch(first, reader)?;
            child.parse(reader, &scope.element(&self.children)).await?;
            self.children.push(child);
            if scope.options().emit_partial_containers {
                scope.notify("", || self.value());
            }

            match reader
                .read_next_char_skip_blank()
                .await
                .map_err(|err| err.expecting(COMMA_OR_END))?
            {
                ',' => {}
                ']' => break,
                ch => return Err(reader.unexpected(ch, Some(COMMA_OR_END))),
            }
        }
        scope.notify("]", || self.value());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use futures::{executor::block_on, stream};
    use rstest::rstest;

    use super::*;
    use crate::{ParserOptions, watch::Registry};

    fn parse_array(chunks: &[&str]) -> Result<ArrayNode, ParseError> {
        let registry = Registry::default();
        let scope = Scope::root(&registry, ParserOptions::default());
        let mut reader = StreamReader::new(stream::iter(chunks.to_vec()));
        let mut node = ArrayNode::default();
        block_on(async {
            assert_eq!(reader.read_next_char().await?, '[');
            node.parse(&mut reader, &scope).await
        })?;
        Ok(node)
    }

    #[rstest]
    #[case(&["[]"], "[]")]
    #[case(&["[ \n ]"], "[]")]
    #[case(&["[1,", " [true]", ", {}]"], "[1,[true],{}]")]
    #[case(&["[\"a\"", ",null,]"], r#"["a",null]"#)]
    fn parses_elements(#[case] chunks: &[&str], #[case] expected: &str) {
        assert_eq!(parse_array(chunks).unwrap().value().to_string(), expected);
    }

    #[test]
    fn bad_separator_cites_comma_or_end() {
        let err = parse_array(&["[1!]"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"unexpected character "!", expected "]" or "," at 1:3"#
        );
    }

    #[test]
    fn object_end_does_not_close_array() {
        let err = parse_array(&["[1}"]).unwrap_err();
        assert!(err.is_unexpected_character());
    }

    #[test]
    fn truncated_array_is_premature_end() {
        let err = parse_array(&["[1, 2"]).unwrap_err();
        assert!(err.is_premature_end());
        let err = parse_array(&["[1, "]).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"unexpected end of input, expected a JSON value or "]" at 1:4"#
        );
    }
}
