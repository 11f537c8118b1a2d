//! Generic three-state container for data owned by the remote API.
//!
//! Every feature slice (income, expenses) is an [`AsyncResource`] over the
//! collection type the server returns. The only way to change one is
//! [`AsyncResource::apply`], fed with the lifecycle [`Signal`]s of the
//! operations that target the slice.

use serde::{Deserialize, Serialize};

/// Monotonic tag assigned to every dispatched operation.
pub type RequestId = u64;

/// Where a slice stands with respect to its latest operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Failed,
}

/// How a slice treats responses of operations that overlap in time.
///
/// `Arrival` applies every response as it lands, so the last one to arrive
/// wins even when it answers an older request. `LatestIssued` drops responses
/// whose request was superseded by a newer pending operation on the same
/// slice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    #[default]
    Arrival,
    LatestIssued,
}

/// Phase of one asynchronous operation.
#[derive(Clone, Debug, PartialEq)]
pub enum Lifecycle<T> {
    Pending,
    Fulfilled(T),
    Rejected(String),
}

impl<T> Lifecycle<T> {
    pub fn phase(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Fulfilled(_) => "fulfilled",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// A lifecycle phase tagged with the request it belongs to.
#[derive(Clone, Debug, PartialEq)]
pub struct Signal<T> {
    pub request_id: RequestId,
    pub lifecycle: Lifecycle<T>,
}

impl<T> Signal<T> {
    pub fn pending(request_id: RequestId) -> Self {
        Self {
            request_id,
            lifecycle: Lifecycle::Pending,
        }
    }

    pub fn fulfilled(request_id: RequestId, payload: T) -> Self {
        Self {
            request_id,
            lifecycle: Lifecycle::Fulfilled(payload),
        }
    }

    pub fn rejected(request_id: RequestId, message: impl Into<String>) -> Self {
        Self {
            request_id,
            lifecycle: Lifecycle::Rejected(message.into()),
        }
    }
}

/// Server-confirmed data plus the status of the operation in flight.
///
/// Invariants:
/// - `data` is only replaced by a fulfilled signal, wholesale, and never goes
///   back to `None` once set.
/// - pending and fulfilled signals clear `error`, so `Success` never carries
///   one.
/// - a rejected signal leaves `data` untouched.
#[derive(Clone, Debug, Serialize)]
pub struct AsyncResource<T> {
    data: Option<T>,
    status: ResourceStatus,
    error: Option<String>,
    #[serde(skip)]
    ordering: ResponseOrdering,
    #[serde(skip)]
    latest_issued: RequestId,
}

impl<T> Default for AsyncResource<T> {
    fn default() -> Self {
        Self::new(ResponseOrdering::default())
    }
}

// Request bookkeeping is not part of the observable state.
impl<T: PartialEq> PartialEq for AsyncResource<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data && self.status == other.status && self.error == other.error
    }
}

impl<T> AsyncResource<T> {
    pub fn new(ordering: ResponseOrdering) -> Self {
        Self {
            data: None,
            status: ResourceStatus::Idle,
            error: None,
            ordering,
            latest_issued: 0,
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn status(&self) -> ResourceStatus {
        self.status
    }

    pub fn loading(&self) -> bool {
        self.status == ResourceStatus::Pending
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn ordering(&self) -> ResponseOrdering {
        self.ordering
    }

    /// Transition function shared by every slice.
    ///
    /// Returns `false` when the signal was discarded as stale, which only
    /// happens under [`ResponseOrdering::LatestIssued`].
    pub fn apply(&mut self, signal: Signal<T>) -> bool {
        let Signal {
            request_id,
            lifecycle,
        } = signal;

        match lifecycle {
            Lifecycle::Pending => {
                self.latest_issued = self.latest_issued.max(request_id);
                self.status = ResourceStatus::Pending;
                self.error = None;
            }
            Lifecycle::Fulfilled(payload) => {
                if self.is_stale(request_id) {
                    return false;
                }
                self.status = ResourceStatus::Success;
                self.data = Some(payload);
                self.error = None;
            }
            Lifecycle::Rejected(message) => {
                if self.is_stale(request_id) {
                    return false;
                }
                self.status = ResourceStatus::Failed;
                self.error = Some(message);
            }
        }
        true
    }

    fn is_stale(&self, request_id: RequestId) -> bool {
        self.ordering == ResponseOrdering::LatestIssued && request_id < self.latest_issued
    }
}
