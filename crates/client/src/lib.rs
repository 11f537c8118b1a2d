//! Finance tracker client.
//!
//! The client keeps a local mirror of the user's income and expenses. State
//! lives in a single [`Store`] and only changes when an [`Action`] goes
//! through the reducers. The [`Dispatcher`] turns every call to the remote
//! API into pending/fulfilled/rejected actions, and the [`AuthBridge`] keeps
//! the signed-in user in sync with the authentication provider.

pub use action::{Action, AuthAction, ExpensesAction, IncomeAction, Operation};
pub use auth::{
    AuthBridge, AuthListener, AuthProvider, AuthUser, LocalAuthProvider, Subscription,
};
pub use dispatcher::Dispatcher;
pub use error::{GatewayError, Rejection};
pub use gateway::{Gateway, HttpGateway};
pub use reducer::{Reducer, RootReducer};
pub use resource::{
    AsyncResource, Lifecycle, RequestId, ResourceStatus, ResponseOrdering, Signal,
};
pub use state::{AuthState, RootState};
pub use store::Store;

mod action;
mod auth;
mod dispatcher;
mod error;
mod gateway;
mod reducer;
mod resource;
pub mod selectors;
mod state;
mod store;
