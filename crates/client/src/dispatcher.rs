//! Asynchronous operations against the finance API.
//!
//! Each operation dispatches a pending signal, makes exactly one gateway call
//! and then dispatches either the fulfilled payload or the rejection message.
//! Nothing is retried, deduplicated or cancelled: two overlapping operations
//! on one slice both run to completion, and the slice's
//! [`ResponseOrdering`](crate::resource::ResponseOrdering) decides which
//! response sticks.

use std::future::Future;

use api_types::{
    expense::{AddExpenseEntries, ExpenseCollection},
    income::{AddIncomeEntry, IncomeCollection},
};

use crate::{
    action::{Action, ExpensesAction, IncomeAction, Operation},
    error::{GatewayError, Rejection},
    gateway::Gateway,
    resource::Signal,
    store::Store,
};

pub struct Dispatcher<G> {
    store: Store,
    gateway: G,
}

impl<G: Gateway> Dispatcher<G> {
    pub fn new(store: Store, gateway: G) -> Self {
        Self { store, gateway }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn fetch_income_collection(
        &self,
        user_id: &str,
    ) -> Result<IncomeCollection, Rejection> {
        let operation = Operation::FetchIncomeCollection;
        if user_id.trim().is_empty() {
            return self.reject_locally(
                operation,
                IncomeAction::FetchIncomeCollection,
                Rejection::new(operation.fallback_message()),
            );
        }

        let gateway = &self.gateway;
        self.run(
            operation,
            IncomeAction::FetchIncomeCollection,
            |token| async move { gateway.fetch_income_collection(token.as_deref(), user_id).await },
        )
        .await
    }

    /// Resolves to the server's full collection after the insert, never a
    /// locally merged list.
    pub async fn add_income_entry(
        &self,
        payload: AddIncomeEntry,
    ) -> Result<IncomeCollection, Rejection> {
        let operation = Operation::AddIncomeEntry;
        if payload.user_id.trim().is_empty() {
            return self.reject_locally(
                operation,
                IncomeAction::AddIncomeEntry,
                Rejection::new(operation.fallback_message()),
            );
        }

        let gateway = &self.gateway;
        let payload = &payload;
        self.run(operation, IncomeAction::AddIncomeEntry, |token| async move {
            gateway.add_income_entry(token.as_deref(), payload).await
        })
        .await
    }

    pub async fn fetch_expenses(&self, user_id: &str) -> Result<ExpenseCollection, Rejection> {
        let operation = Operation::FetchExpenses;
        if user_id.trim().is_empty() {
            return self.reject_locally(
                operation,
                ExpensesAction::FetchExpenses,
                Rejection::new(operation.fallback_message()),
            );
        }

        let gateway = &self.gateway;
        self.run(operation, ExpensesAction::FetchExpenses, |token| async move {
            gateway.fetch_expenses(token.as_deref(), user_id).await
        })
        .await
    }

    /// Sends every line item in one request. Items breaking the total rule
    /// are refused before anything goes over the wire.
    pub async fn add_expense_entries(
        &self,
        payload: AddExpenseEntries,
    ) -> Result<ExpenseCollection, Rejection> {
        let operation = Operation::AddExpenseEntries;
        if payload.user_id.trim().is_empty() {
            return self.reject_locally(
                operation,
                ExpensesAction::AddExpenseEntries,
                Rejection::new(operation.fallback_message()),
            );
        }
        if let Some(violation) = payload
            .expense_entries
            .iter()
            .find_map(|entry| entry.validate().err())
        {
            return self.reject_locally(
                operation,
                ExpensesAction::AddExpenseEntries,
                Rejection::new(violation.to_string()),
            );
        }

        let gateway = &self.gateway;
        let payload = &payload;
        self.run(
            operation,
            ExpensesAction::AddExpenseEntries,
            |token| async move { gateway.add_expense_entries(token.as_deref(), payload).await },
        )
        .await
    }

    async fn run<T, A, F, Fut>(
        &self,
        operation: Operation,
        wrap: fn(Signal<T>) -> A,
        call: F,
    ) -> Result<T, Rejection>
    where
        T: Clone,
        A: Into<Action>,
        F: FnOnce(Option<String>) -> Fut,
        Fut: Future<Output = Result<T, GatewayError>>,
    {
        let request_id = self.store.next_request_id();
        self.store.dispatch(wrap(Signal::pending(request_id)));

        let token = self
            .store
            .select(|state| state.auth.id_token().map(str::to_owned));
        if token.is_none() {
            tracing::debug!(%operation, "no signed-in user, calling without credentials");
        }

        match call(token).await {
            Ok(payload) => {
                self.store
                    .dispatch(wrap(Signal::fulfilled(request_id, payload.clone())));
                Ok(payload)
            }
            Err(err) => {
                tracing::warn!(%operation, request_id, "request failed: {err}");
                let rejection = Rejection::from_gateway(&err, operation);
                self.store.dispatch(wrap(Signal::rejected(
                    request_id,
                    rejection.message.clone(),
                )));
                Err(rejection)
            }
        }
    }

    fn reject_locally<T, A>(
        &self,
        operation: Operation,
        wrap: fn(Signal<T>) -> A,
        rejection: Rejection,
    ) -> Result<T, Rejection>
    where
        A: Into<Action>,
    {
        let request_id = self.store.next_request_id();
        tracing::warn!(%operation, request_id, "refused before sending: {rejection}");
        self.store.dispatch(wrap(Signal::pending(request_id)));
        self.store.dispatch(wrap(Signal::rejected(
            request_id,
            rejection.message.clone(),
        )));
        Err(rejection)
    }
}
