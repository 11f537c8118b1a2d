//! Actions accepted by the store.
//!
//! Each asynchronous [`Operation`] produces three actions over its lifetime
//! (`<slice>/<operation>/pending|fulfilled|rejected`); the auth slice only
//! knows the synchronous `auth/setUser`.

use std::fmt;

use api_types::{expense::ExpenseCollection, income::IncomeCollection};

use crate::{auth::AuthUser, resource::Signal};

/// Remote operations the dispatcher knows how to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    FetchIncomeCollection,
    AddIncomeEntry,
    FetchExpenses,
    AddExpenseEntries,
}

impl Operation {
    /// Action type prefix, `<slice>/<operation>`.
    pub fn type_prefix(self) -> &'static str {
        match self {
            Self::FetchIncomeCollection => "income/fetchIncomeCollection",
            Self::AddIncomeEntry => "income/addIncomeEntry",
            Self::FetchExpenses => "expenses/fetchExpenses",
            Self::AddExpenseEntries => "expenses/addExpenseEntries",
        }
    }

    /// Message surfaced when the server gives no usable reason for a failure.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::FetchIncomeCollection => "Failed to fetch income collection",
            Self::AddIncomeEntry => "Failed to add income entry",
            Self::FetchExpenses => "Failed to fetch expenses",
            Self::AddExpenseEntries => "Failed to add expense entries",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_prefix())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum IncomeAction {
    FetchIncomeCollection(Signal<IncomeCollection>),
    AddIncomeEntry(Signal<IncomeCollection>),
}

impl IncomeAction {
    fn describe(&self) -> (Operation, &'static str) {
        match self {
            Self::FetchIncomeCollection(signal) => {
                (Operation::FetchIncomeCollection, signal.lifecycle.phase())
            }
            Self::AddIncomeEntry(signal) => (Operation::AddIncomeEntry, signal.lifecycle.phase()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExpensesAction {
    FetchExpenses(Signal<ExpenseCollection>),
    AddExpenseEntries(Signal<ExpenseCollection>),
}

impl ExpensesAction {
    fn describe(&self) -> (Operation, &'static str) {
        match self {
            Self::FetchExpenses(signal) => (Operation::FetchExpenses, signal.lifecycle.phase()),
            Self::AddExpenseEntries(signal) => {
                (Operation::AddExpenseEntries, signal.lifecycle.phase())
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
    /// `None` when the provider reports that nobody is signed in.
    SetUser(Option<AuthUser>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Income(IncomeAction),
    Expenses(ExpensesAction),
    Auth(AuthAction),
}

impl Action {
    /// Full action type, e.g. `income/addIncomeEntry/rejected`.
    pub fn type_name(&self) -> String {
        let (operation, phase) = match self {
            Self::Income(action) => action.describe(),
            Self::Expenses(action) => action.describe(),
            Self::Auth(AuthAction::SetUser(_)) => return "auth/setUser".to_string(),
        };
        format!("{}/{phase}", operation.type_prefix())
    }
}

impl From<IncomeAction> for Action {
    fn from(value: IncomeAction) -> Self {
        Self::Income(value)
    }
}

impl From<ExpensesAction> for Action {
    fn from(value: ExpensesAction) -> Self {
        Self::Expenses(value)
    }
}

impl From<AuthAction> for Action {
    fn from(value: AuthAction) -> Self {
        Self::Auth(value)
    }
}
