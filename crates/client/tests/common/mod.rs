#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use api_types::{
    EntryDate,
    expense::{AddExpenseEntries, ExpenseCollection, ExpenseEntry},
    income::{AddIncomeEntry, IncomeCollection, IncomeEntry},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use client::{Gateway, GatewayError};
use parking_lot::Mutex;

pub const USER_ID: &str = "u1";
pub const USER_EMAIL: &str = "a@x.com";

pub fn day(y: i32, m: u32, d: u32) -> EntryDate {
    EntryDate::from(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

pub fn income_entry(id: &str, amount: f64, source: &str) -> IncomeEntry {
    IncomeEntry {
        income_id: id.to_string(),
        amount,
        source: source.to_string(),
        date: day(2024, 1, 1),
    }
}

pub fn income_collection(entries: Vec<IncomeEntry>) -> IncomeCollection {
    IncomeCollection {
        user_id: USER_ID.to_string(),
        user_email: USER_EMAIL.to_string(),
        income_entries: entries,
    }
}

pub fn expense_collection(entries: Vec<ExpenseEntry>) -> ExpenseCollection {
    ExpenseCollection {
        user_id: USER_ID.to_string(),
        user_email: USER_EMAIL.to_string(),
        expense_entries: entries,
    }
}

pub fn add_income(entry: IncomeEntry) -> AddIncomeEntry {
    AddIncomeEntry {
        user_id: USER_ID.to_string(),
        user_email: USER_EMAIL.to_string(),
        entry,
    }
}

pub fn add_expenses(entries: Vec<ExpenseEntry>) -> AddExpenseEntries {
    AddExpenseEntries {
        user_id: USER_ID.to_string(),
        user_email: USER_EMAIL.to_string(),
        expense_entries: entries,
    }
}

/// What a scripted call answers with.
#[derive(Clone, Debug)]
pub enum Reply<T> {
    Ok(T),
    Server(StatusCode, Option<String>),
    Malformed,
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, GatewayError> {
        match self {
            Reply::Ok(payload) => Ok(payload),
            Reply::Server(status, message) => Err(GatewayError::Server { status, message }),
            Reply::Malformed => Err(serde_json::from_str::<u32>("{").unwrap_err().into()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Step<T> {
    pub delay: Duration,
    pub reply: Reply<T>,
}

impl<T> Step<T> {
    pub fn now(reply: Reply<T>) -> Self {
        Self {
            delay: Duration::ZERO,
            reply,
        }
    }

    pub fn after(delay: Duration, reply: Reply<T>) -> Self {
        Self { delay, reply }
    }
}

/// In-memory gateway answering from scripts.
///
/// Fetches pop their queue in call order; income additions are keyed by the
/// id of the entry being added so concurrent calls get deterministic replies.
#[derive(Default)]
pub struct ScriptedGateway {
    income_fetches: Mutex<VecDeque<Step<IncomeCollection>>>,
    income_adds: Mutex<HashMap<String, Step<IncomeCollection>>>,
    expense_fetches: Mutex<VecDeque<Step<ExpenseCollection>>>,
    expense_adds: Mutex<VecDeque<Step<ExpenseCollection>>>,
    calls: AtomicUsize,
    tokens: Mutex<Vec<Option<String>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_fetch_income(self, step: Step<IncomeCollection>) -> Self {
        self.income_fetches.lock().push_back(step);
        self
    }

    pub fn on_add_income(self, income_id: &str, step: Step<IncomeCollection>) -> Self {
        self.income_adds.lock().insert(income_id.to_string(), step);
        self
    }

    pub fn on_fetch_expenses(self, step: Step<ExpenseCollection>) -> Self {
        self.expense_fetches.lock().push_back(step);
        self
    }

    pub fn on_add_expenses(self, step: Step<ExpenseCollection>) -> Self {
        self.expense_adds.lock().push_back(step);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().clone()
    }

    fn record(&self, token: Option<&str>) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.tokens.lock().push(token.map(str::to_owned));
    }
}

async fn play<T>(step: Option<Step<T>>) -> Result<T, GatewayError> {
    let step = step.unwrap_or_else(|| Step::now(Reply::Server(StatusCode::NOT_FOUND, None)));
    if !step.delay.is_zero() {
        tokio::time::sleep(step.delay).await;
    }
    step.reply.into_result()
}

impl Gateway for ScriptedGateway {
    async fn fetch_income_collection(
        &self,
        token: Option<&str>,
        _user_id: &str,
    ) -> Result<IncomeCollection, GatewayError> {
        self.record(token);
        let step = self.income_fetches.lock().pop_front();
        play(step).await
    }

    async fn add_income_entry(
        &self,
        token: Option<&str>,
        payload: &AddIncomeEntry,
    ) -> Result<IncomeCollection, GatewayError> {
        self.record(token);
        let step = self.income_adds.lock().remove(&payload.entry.income_id);
        play(step).await
    }

    async fn fetch_expenses(
        &self,
        token: Option<&str>,
        _user_id: &str,
    ) -> Result<ExpenseCollection, GatewayError> {
        self.record(token);
        let step = self.expense_fetches.lock().pop_front();
        play(step).await
    }

    async fn add_expense_entries(
        &self,
        token: Option<&str>,
        _payload: &AddExpenseEntries,
    ) -> Result<ExpenseCollection, GatewayError> {
        self.record(token);
        let step = self.expense_adds.lock().pop_front();
        play(step).await
    }
}

/// State behind the mock finance API.
#[derive(Clone)]
pub struct MockApi {
    income: Arc<Mutex<IncomeCollection>>,
    expenses: Arc<Mutex<ExpenseCollection>>,
    authorization: Arc<Mutex<Vec<Option<String>>>>,
    user_ids: Arc<Mutex<Vec<String>>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            income: Arc::new(Mutex::new(income_collection(Vec::new()))),
            expenses: Arc::new(Mutex::new(expense_collection(Vec::new()))),
            authorization: Arc::default(),
            user_ids: Arc::default(),
        }
    }

    /// `Authorization` header of every request seen so far.
    pub fn authorization(&self) -> Vec<Option<String>> {
        self.authorization.lock().clone()
    }

    /// User ids decoded from the path of every fetch.
    pub fn user_ids(&self) -> Vec<String> {
        self.user_ids.lock().clone()
    }

    fn record(&self, headers: &HeaderMap) {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        self.authorization.lock().push(value);
    }
}

/// Special user ids steer the mock into its failure modes.
fn failure_for(user_id: &str) -> Option<Response> {
    match user_id {
        "locked" => Some(
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "Unauthorized" })),
            )
                .into_response(),
        ),
        "broken" => Some(StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        "garbled" => Some((StatusCode::OK, "definitely not json").into_response()),
        _ => None,
    }
}

async fn get_income(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Response {
    api.record(&headers);
    api.user_ids.lock().push(user_id.clone());
    if let Some(failure) = failure_for(&user_id) {
        return failure;
    }
    Json(api.income.lock().clone()).into_response()
}

async fn add_income_entry(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(payload): Json<AddIncomeEntry>,
) -> Response {
    api.record(&headers);
    if let Some(failure) = failure_for(&payload.user_id) {
        return failure;
    }
    let mut income = api.income.lock();
    income.income_entries.push(payload.entry);
    Json(income.clone()).into_response()
}

async fn get_expenses(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(user_id): Path<String>,
) -> Response {
    api.record(&headers);
    api.user_ids.lock().push(user_id.clone());
    if let Some(failure) = failure_for(&user_id) {
        return failure;
    }
    Json(api.expenses.lock().clone()).into_response()
}

async fn add_expense_entries(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(payload): Json<AddExpenseEntries>,
) -> Response {
    api.record(&headers);
    if let Some(failure) = failure_for(&payload.user_id) {
        return failure;
    }
    let mut expenses = api.expenses.lock();
    expenses.expense_entries.extend(payload.expense_entries);
    Json(expenses.clone()).into_response()
}

/// Serve the mock API on an ephemeral port and return its base URL.
pub async fn spawn_mock_api(api: MockApi) -> String {
    let router = Router::new()
        .route("/income/{user_id}", get(get_income))
        .route("/income/add-income-entry", post(add_income_entry))
        .route("/expenses/{user_id}", get(get_expenses))
        .route("/expenses/add-expense-entries", post(add_expense_entries))
        .with_state(api);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{addr}")
}
