mod slow_source;

use alloc::{rc::Rc, string::String, vec::Vec};
use core::cell::RefCell;

use crate::Value;

/// Shared log of `(fragment, value)` pairs recorded by a watcher.
pub(crate) type EventLog = Rc<RefCell<Vec<(String, Value)>>>;

pub(crate) fn recorder(log: &EventLog) -> impl FnMut(&Value, &str) + 'static {
    let log = Rc::clone(log);
    move |value, fragment| log.borrow_mut().push((fragment.into(), value.clone()))
}

pub(crate) fn json(src: &str) -> Value {
    serde_json::from_str(src).unwrap()
}
