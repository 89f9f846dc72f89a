//! Exercises the crate through its public interface only.

use std::{cell::RefCell, rc::Rc};

use futures::{executor::block_on, stream};
use jsonwatch::{Deferred, ParseError, StreamParser, StreamReader, Value, path, split_path};

#[test]
fn reader_operations() {
    let mut reader = StreamReader::new(stream::iter([" \n{  \"a\": b ", "}"]));
    block_on(async {
        let (ch, checkpoint) = reader.peek_next_char().await.unwrap();
        assert_eq!(ch, Some(' '));
        reader.restore(checkpoint);
        assert_eq!(reader.read_until('}').await.unwrap(), " \n{  \"a\": b ");
        assert_eq!(reader.position(), (2, 11));
        assert!(reader.read_until(']').await.unwrap_err().is_premature_end());
    });
}

#[test]
fn watch_and_wrap() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    let fragments = ["{\"items\": [{\"na", "me\": \"pen\"}, {\"name\"", ": \"ink\"}]}"];
    let mut parser = StreamParser::new(stream::iter(fragments));
    parser.watch_path(&path!["items", 1, "name"], move |value: &Value, fragment: &str| {
        sink.borrow_mut().push(format!("{fragment:?}={value}"));
    });
    let done: Deferred<Value, ParseError> = parser.wrap();

    let settled = Rc::new(RefCell::new(None));
    let slot = Rc::clone(&settled);
    done.on_settled(move |outcome| *slot.borrow_mut() = Some(outcome.is_ok()));

    block_on(parser.run()).unwrap();
    assert_eq!(
        *events.borrow(),
        [r#""i"="i""#, r#""n"="in""#, r#""k"="ink""#, r#"""="ink""#]
    );
    assert_eq!(*settled.borrow(), Some(true));
    assert_eq!(
        block_on(done).unwrap().pointer(&split_path("items.0.name")),
        Some(&Value::from("pen"))
    );
}

#[test]
fn error_is_displayable() {
    let err = block_on(jsonwatch::parse(stream::iter(["[1!]"]))).unwrap_err();
    assert_eq!(err.to_string(), r#"unexpected character "!", expected "]" or "," at 1:3"#);
    assert_eq!((err.line, err.column), (1, 3));
}
