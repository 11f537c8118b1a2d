use api_types::{expense::ExpenseCollection, income::IncomeCollection};
use serde::Serialize;

use crate::{
    auth::AuthUser,
    resource::{AsyncResource, ResponseOrdering},
};

/// Who the authentication provider last reported as signed in.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AuthState {
    pub user: Option<AuthUser>,
}

impl AuthState {
    pub fn id_token(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.id_token.as_deref())
    }
}

/// Everything the store holds, one field per slice.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RootState {
    pub auth: AuthState,
    pub income: AsyncResource<IncomeCollection>,
    pub expenses: AsyncResource<ExpenseCollection>,
}

impl RootState {
    pub fn with_ordering(ordering: ResponseOrdering) -> Self {
        Self {
            auth: AuthState::default(),
            income: AsyncResource::new(ordering),
            expenses: AsyncResource::new(ordering),
        }
    }
}
