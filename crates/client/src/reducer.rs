//! Pure state transitions, one reducer per slice plus the root that routes
//! actions to them.

use api_types::{expense::ExpenseCollection, income::IncomeCollection};

use crate::{
    action::{Action, AuthAction, ExpensesAction, IncomeAction},
    resource::AsyncResource,
    state::{AuthState, RootState},
};

/// Transforms a state given an action.
///
/// Reducers are the only place where state changes; they must not perform
/// side effects.
pub trait Reducer {
    type State: Clone + Default;
    type Action;

    fn reduce(state: Self::State, action: Self::Action) -> Self::State;
}

pub struct IncomeReducer;

impl Reducer for IncomeReducer {
    type State = AsyncResource<IncomeCollection>;
    type Action = IncomeAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        let signal = match action {
            IncomeAction::FetchIncomeCollection(signal) | IncomeAction::AddIncomeEntry(signal) => {
                signal
            }
        };
        let request_id = signal.request_id;
        if !state.apply(signal) {
            tracing::debug!(request_id, "dropped stale income response");
        }
        state
    }
}

pub struct ExpensesReducer;

impl Reducer for ExpensesReducer {
    type State = AsyncResource<ExpenseCollection>;
    type Action = ExpensesAction;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        let signal = match action {
            ExpensesAction::FetchExpenses(signal) | ExpensesAction::AddExpenseEntries(signal) => {
                signal
            }
        };
        let request_id = signal.request_id;
        if !state.apply(signal) {
            tracing::debug!(request_id, "dropped stale expenses response");
        }
        state
    }
}

pub struct AuthReducer;

impl Reducer for AuthReducer {
    type State = AuthState;
    type Action = AuthAction;

    fn reduce(_state: Self::State, action: Self::Action) -> Self::State {
        match action {
            AuthAction::SetUser(user) => AuthState { user },
        }
    }
}

pub struct RootReducer;

impl Reducer for RootReducer {
    type State = RootState;
    type Action = Action;

    fn reduce(mut state: Self::State, action: Self::Action) -> Self::State {
        match action {
            Action::Income(action) => {
                state.income = IncomeReducer::reduce(state.income, action);
            }
            Action::Expenses(action) => {
                state.expenses = ExpensesReducer::reduce(state.expenses, action);
            }
            Action::Auth(action) => {
                state.auth = AuthReducer::reduce(state.auth, action);
            }
        }
        state
    }
}
