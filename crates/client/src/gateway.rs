//! Remote data gateway.
//!
//! [`Gateway`] is the seam between the dispatcher and the finance API;
//! [`HttpGateway`] is the real implementation on top of `reqwest`.

use std::future::Future;

use api_types::{
    ErrorBody,
    expense::{AddExpenseEntries, ExpenseCollection},
    income::{AddIncomeEntry, IncomeCollection},
};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::error::GatewayError;

/// Authenticated calls against the finance API.
///
/// `token` is the signed-in user's id token, sent as a bearer credential when
/// present.
pub trait Gateway: Send + Sync {
    fn fetch_income_collection(
        &self,
        token: Option<&str>,
        user_id: &str,
    ) -> impl Future<Output = Result<IncomeCollection, GatewayError>> + Send;

    fn add_income_entry(
        &self,
        token: Option<&str>,
        payload: &AddIncomeEntry,
    ) -> impl Future<Output = Result<IncomeCollection, GatewayError>> + Send;

    fn fetch_expenses(
        &self,
        token: Option<&str>,
        user_id: &str,
    ) -> impl Future<Output = Result<ExpenseCollection, GatewayError>> + Send;

    fn add_expense_entries(
        &self,
        token: Option<&str>,
        payload: &AddExpenseEntries,
    ) -> impl Future<Output = Result<ExpenseCollection, GatewayError>> + Send;
}

#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Result<Self, GatewayError> {
        let base_url =
            Url::parse(base_url).map_err(|err| GatewayError::InvalidUrl(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(format!(
                "{base_url} cannot carry a path"
            )));
        }
        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended, each percent-encoded as a single
    /// path segment.
    fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        if let Some(segment) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(GatewayError::InvalidUrl(format!(
                "`{segment}` is not a valid path segment"
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<TResp: DeserializeOwned>(
        &self,
        token: Option<&str>,
        segments: &[&str],
    ) -> Result<TResp, GatewayError> {
        send(self.client.get(self.url(segments)?), token).await
    }

    async fn post_json<TReq: Serialize + ?Sized, TResp: DeserializeOwned>(
        &self,
        token: Option<&str>,
        segments: &[&str],
        body: &TReq,
    ) -> Result<TResp, GatewayError> {
        send(self.client.post(self.url(segments)?).json(body), token).await
    }
}

async fn send<TResp: DeserializeOwned>(
    mut req: RequestBuilder,
    token: Option<&str>,
) -> Result<TResp, GatewayError> {
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }

    let resp = req.send().await?;
    let status = resp.status();
    if status.is_success() {
        let body = resp.bytes().await?;
        return Ok(serde_json::from_slice(&body)?);
    }

    // Error bodies are optional, and may not even be JSON.
    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    Err(GatewayError::Server { status, message })
}

impl Gateway for HttpGateway {
    async fn fetch_income_collection(
        &self,
        token: Option<&str>,
        user_id: &str,
    ) -> Result<IncomeCollection, GatewayError> {
        self.get_json(token, &["income", user_id]).await
    }

    async fn add_income_entry(
        &self,
        token: Option<&str>,
        payload: &AddIncomeEntry,
    ) -> Result<IncomeCollection, GatewayError> {
        self.post_json(token, &["income", "add-income-entry"], payload)
            .await
    }

    async fn fetch_expenses(
        &self,
        token: Option<&str>,
        user_id: &str,
    ) -> Result<ExpenseCollection, GatewayError> {
        self.get_json(token, &["expenses", user_id]).await
    }

    async fn add_expense_entries(
        &self,
        token: Option<&str>,
        payload: &AddExpenseEntries,
    ) -> Result<ExpenseCollection, GatewayError> {
        self.post_json(token, &["expenses", "add-expense-entries"], payload)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_base_url() {
        let err = HttpGateway::new("not a url").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUrl(_)));
    }

    #[test]
    fn joins_paths_without_double_slashes() {
        let gateway = HttpGateway::new("http://127.0.0.1:3000/api/").unwrap();
        assert_eq!(
            gateway.url(&["income", "u1"]).unwrap().as_str(),
            "http://127.0.0.1:3000/api/income/u1"
        );

        let bare = HttpGateway::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            bare.url(&["expenses", "u1"]).unwrap().as_str(),
            "http://127.0.0.1:3000/expenses/u1"
        );
    }

    #[test]
    fn user_id_stays_one_segment() {
        let gateway = HttpGateway::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(
            gateway.url(&["income", "a/b?c#d"]).unwrap().as_str(),
            "http://127.0.0.1:3000/income/a%2Fb%3Fc%23d"
        );
        assert!(matches!(
            gateway.url(&["income", ".."]),
            Err(GatewayError::InvalidUrl(_))
        ));
    }
}
