//! Derived values read from the root state.

use std::collections::BTreeMap;

use crate::{auth::AuthUser, state::RootState};

pub fn current_user(state: &RootState) -> Option<&AuthUser> {
    state.auth.user.as_ref()
}

/// `true` while any slice has an operation in flight.
pub fn is_busy(state: &RootState) -> bool {
    state.income.loading() || state.expenses.loading()
}

pub fn total_income(state: &RootState) -> f64 {
    state
        .income
        .data()
        .map(|collection| collection.total())
        .unwrap_or_default()
}

pub fn total_expenses(state: &RootState) -> f64 {
    state
        .expenses
        .data()
        .map(|collection| collection.total())
        .unwrap_or_default()
}

pub fn net_balance(state: &RootState) -> f64 {
    total_income(state) - total_expenses(state)
}

/// Income summed per source label, sorted by label.
pub fn income_by_source(state: &RootState) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    if let Some(collection) = state.income.data() {
        for entry in &collection.income_entries {
            *totals.entry(entry.source.clone()).or_insert(0.0) += entry.amount;
        }
    }
    totals
}
