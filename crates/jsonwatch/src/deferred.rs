//! A single-assignment result shared between a producer and its observers.
//!
//! A [`Deferred`] starts pending and settles at most once, either resolved
//! with a value or rejected with an error. Observers may subscribe with
//! [`Deferred::on_settled`] or simply `.await` a clone; both work before and
//! after settlement.

use alloc::{boxed::Box, rc::Rc, vec::Vec};
use core::{
    cell::RefCell,
    fmt,
    future::Future,
    pin::Pin,
    task::{Context, Poll, Waker},
};

use tracing::debug;

type Callback<T, E> = Box<dyn FnOnce(Result<&T, &E>)>;

enum State<T, E> {
    Pending,
    Resolved(T),
    Rejected(E),
}

impl<T, E> State<T, E> {
    fn outcome(&self) -> Option<Result<&T, &E>> {
        match self {
            State::Pending => None,
            State::Resolved(value) => Some(Ok(value)),
            State::Rejected(error) => Some(Err(error)),
        }
    }
}

struct Inner<T, E> {
    state: State<T, E>,
    callbacks: Vec<Callback<T, E>>,
    wakers: Vec<Waker>,
}

/// A value that will be settled exactly once.
///
/// Clones share the same state. Later calls to [`resolve`](Self::resolve) or
/// [`reject`](Self::reject) are ignored.
///
/// ```
/// use jsonwatch::Deferred;
///
/// let deferred: Deferred<u32, &str> = Deferred::new();
/// let observer = deferred.clone();
/// assert!(deferred.resolve(7));
/// assert!(!deferred.reject("too late"));
/// assert_eq!(futures::executor::block_on(observer), Ok(7));
/// ```
pub struct Deferred<T, E> {
    inner: Rc<RefCell<Inner<T, E>>>,
}

impl<T, E> Deferred<T, E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                state: State::Pending,
                callbacks: Vec::new(),
                wakers: Vec::new(),
            })),
        }
    }

    /// Resolves with `value`. Returns `false` if already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(State::Resolved(value))
    }

    /// Rejects with `error`. Returns `false` if already settled.
    pub fn reject(&self, error: E) -> bool {
        self.settle(State::Rejected(error))
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        // Only `settle` borrows mutably, and it never runs user code while
        // doing so; a failed borrow means callbacks of a settled value are
        // running.
        self.inner
            .try_borrow()
            .map_or(true, |inner| !matches!(inner.state, State::Pending))
    }

    /// Runs `callback` once the outcome is known.
    ///
    /// If already settled, `callback` runs immediately on this call.
    pub fn on_settled(&self, callback: impl FnOnce(Result<&T, &E>) + 'static) {
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            if matches!(inner.state, State::Pending) {
                inner.callbacks.push(Box::new(callback));
                return;
            }
        }
        let inner = self.inner.borrow();
        if let Some(outcome) = inner.state.outcome() {
            callback(outcome);
        }
    }

    fn settle(&self, state: State<T, E>) -> bool {
        let (callbacks, wakers) = {
            let Ok(mut inner) = self.inner.try_borrow_mut() else {
                debug!("deferred already settled, ignoring");
                return false;
            };
            if !matches!(inner.state, State::Pending) {
                debug!("deferred already settled, ignoring");
                return false;
            }
            inner.state = state;
            (
                core::mem::take(&mut inner.callbacks),
                core::mem::take(&mut inner.wakers),
            )
        };
        debug!(
            resolved = matches!(self.inner.borrow().state, State::Resolved(_)),
            callbacks = callbacks.len(),
            "deferred settled"
        );

        let inner = self.inner.borrow();
        if let Some(outcome) = inner.state.outcome() {
            for callback in callbacks {
                callback(outcome);
            }
        }
        for waker in wakers {
            waker.wake();
        }
        true
    }
}

impl<T: Clone, E: Clone> Deferred<T, E> {
    /// A copy of the outcome, or `None` while pending.
    #[must_use]
    pub fn outcome(&self) -> Option<Result<T, E>> {
        let inner = self.inner.borrow();
        inner
            .state
            .outcome()
            .map(|outcome| outcome.map(T::clone).map_err(E::clone))
    }
}

impl<T, E> Default for Deferred<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> Clone for Deferred<T, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T, E> fmt::Debug for Deferred<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.inner.try_borrow().as_deref().map(|inner| &inner.state) {
            Ok(State::Pending) => "pending",
            Ok(State::Resolved(_)) => "resolved",
            Ok(State::Rejected(_)) => "rejected",
            Err(_) => "settling",
        };
        f.debug_struct("Deferred").field("state", &state).finish()
    }
}

impl<T: Clone, E: Clone> Future for Deferred<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = self.outcome() {
            return Poll::Ready(outcome);
        }
        let mut inner = self.inner.borrow_mut();
        if !inner.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            inner.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}
