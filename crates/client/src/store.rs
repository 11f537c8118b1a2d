use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tokio::sync::watch;

use crate::{
    action::Action,
    reducer::{Reducer, RootReducer},
    resource::{RequestId, ResponseOrdering},
    state::RootState,
};

/// Single source of truth for client state.
///
/// Cloning is cheap and every clone points at the same state. Mutation only
/// happens through [`Store::dispatch`]; readers either take a
/// [`Store::snapshot`] or [`Store::subscribe`] to be woken on every change.
#[derive(Clone, Debug)]
pub struct Store {
    state: Arc<watch::Sender<RootState>>,
    next_request: Arc<AtomicU64>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(ResponseOrdering::default())
    }
}

impl Store {
    pub fn new(ordering: ResponseOrdering) -> Self {
        let (state, _) = watch::channel(RootState::with_ordering(ordering));
        Self {
            state: Arc::new(state),
            next_request: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn dispatch(&self, action: impl Into<Action>) {
        let action = action.into();
        tracing::debug!(action = %action.type_name(), "dispatch");

        self.state.send_modify(|state| {
            let current = std::mem::take(state);
            *state = RootReducer::reduce(current, action);
        });
    }

    pub fn snapshot(&self) -> RootState {
        self.state.borrow().clone()
    }

    /// Run `f` against the current state without cloning it.
    pub fn select<R>(&self, f: impl FnOnce(&RootState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<RootState> {
        self.state.subscribe()
    }

    pub(crate) fn next_request_id(&self) -> RequestId {
        self.next_request.fetch_add(1, Ordering::Relaxed) + 1
    }
}
