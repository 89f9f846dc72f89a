//! Sources that deliver fragments over time.

use alloc::{rc::Rc, string::String, vec::Vec};
use core::{cell::Cell, time::Duration};

use futures::channel::mpsc;
use tokio::{task, time::sleep};

use super::{EventLog, json, recorder};
use crate::{StreamParser, chunk_utils::produce_chunks};

const DOC: &str = r#"{"address": {"street": "123 Main St"}, "tags": [1, 2]}"#;

/// Spawns a task sending `DOC` in `parts` fragments with a pause before each.
fn spawn_producer(parts: usize, done: Rc<Cell<bool>>) -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded();
    let chunks: Vec<String> = produce_chunks(DOC, parts)
        .into_iter()
        .map(String::from)
        .collect();
    task::spawn_local(async move {
        for chunk in chunks {
            sleep(Duration::from_millis(1)).await;
            if tx.unbounded_send(chunk).is_err() {
                return;
            }
        }
        done.set(true);
    });
    rx
}

#[tokio::test]
async fn watchers_fire_before_the_source_finishes() {
    let local = task::LocalSet::new();
    local
        .run_until(async {
            let producer_done = Rc::new(Cell::new(false));
            let source = spawn_producer(12, Rc::clone(&producer_done));

            let street = EventLog::default();
            let early = Rc::new(Cell::new(None));
            let mut parser = StreamParser::new(source);
            parser.watch("address.street", recorder(&street));
            let (flag, seen) = (Rc::clone(&producer_done), Rc::clone(&early));
            parser.watch("address", move |_, _| seen.set(Some(flag.get())));
            let done = parser.wrap();

            let value = parser.run().await.unwrap();
            assert_eq!(value, json(DOC));
            assert_eq!(early.get(), Some(false));
            assert_eq!(street.borrow().len(), "123 Main St".len() + 1);
            assert_eq!(done.await, Ok(value));
        })
        .await;
}

#[tokio::test]
async fn closed_source_rejects() {
    let local = task::LocalSet::new();
    local
        .run_until(async {
            let (tx, rx) = mpsc::unbounded::<String>();
            let parser = StreamParser::new(rx);
            let done = parser.wrap();
            task::spawn_local(async move {
                sleep(Duration::from_millis(1)).await;
                let _ = tx.unbounded_send(String::from("[1, 2"));
                sleep(Duration::from_millis(1)).await;
                drop(tx);
            });

            let err = parser.run().await.unwrap_err();
            assert!(err.is_premature_end());
            assert_eq!(done.await, Err(err));
        })
        .await;
}
