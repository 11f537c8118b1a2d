use api_types::{
    EntryDate,
    expense::{AddExpenseEntries, ExpenseEntry},
    income::{AddIncomeEntry, IncomeEntry},
};
use chrono::Local;
use client::{
    AuthBridge, AuthUser, Dispatcher, HttpGateway, LocalAuthProvider, Store, selectors,
};
use serde::Serialize;

use crate::{
    config::{AppConfig, Command, ExpensesCommand, IncomeCommand},
    error::{AppError, Result},
};

#[derive(Debug, Serialize)]
struct Summary {
    total_income: f64,
    total_expenses: f64,
    net_balance: f64,
    income_by_source: std::collections::BTreeMap<String, f64>,
}

/// Which part of the state a command prints once it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Income,
    Expenses,
    Summary,
}

impl View {
    fn of(command: &Command) -> Self {
        match command {
            Command::Income(_) => Self::Income,
            Command::Expenses(_) => Self::Expenses,
            Command::Summary => Self::Summary,
        }
    }
}

fn user_from_config(config: &AppConfig) -> Result<AuthUser> {
    if config.user_id.trim().is_empty() {
        return Err(AppError::MissingSetting("user_id"));
    }
    let email = (!config.user_email.trim().is_empty()).then(|| config.user_email.clone());
    Ok(AuthUser {
        uid: config.user_id.clone(),
        email,
        display_name: None,
        id_token: config.token.clone(),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn run(config: AppConfig, command: Command) -> Result<()> {
    let store = Store::new(config.ordering);
    let provider = LocalAuthProvider::new();
    let bridge = AuthBridge::mount(&provider, store.clone());
    provider.sign_in(user_from_config(&config)?);

    let gateway = HttpGateway::new(&config.base_url)?;
    let dispatcher = Dispatcher::new(store, gateway);

    let user = dispatcher
        .store()
        .select(|state| selectors::current_user(state).cloned())
        .ok_or(AppError::MissingSetting("user_id"))?;
    let user_email = user.email.clone().unwrap_or_default();
    let view = View::of(&command);

    let outcome = match command {
        Command::Income(IncomeCommand::List) => dispatcher
            .fetch_income_collection(&user.uid)
            .await
            .map(drop),
        Command::Income(IncomeCommand::Add {
            amount,
            source,
            date,
        }) => {
            let date = EntryDate::from(date.unwrap_or_else(|| Local::now().date_naive()));
            let payload = AddIncomeEntry {
                user_id: user.uid.clone(),
                user_email,
                entry: IncomeEntry::new(amount, source, date),
            };
            dispatcher.add_income_entry(payload).await.map(drop)
        }
        Command::Expenses(ExpensesCommand::List) => {
            dispatcher.fetch_expenses(&user.uid).await.map(drop)
        }
        Command::Expenses(ExpensesCommand::Add {
            item,
            quantity,
            unit_price,
        }) => {
            let payload = AddExpenseEntries {
                user_id: user.uid.clone(),
                user_email,
                expense_entries: vec![ExpenseEntry::new(item, quantity, unit_price)],
            };
            dispatcher.add_expense_entries(payload).await.map(drop)
        }
        Command::Summary => {
            let (income, expenses) = tokio::join!(
                dispatcher.fetch_income_collection(&user.uid),
                dispatcher.fetch_expenses(&user.uid),
            );
            income.and(expenses).map(drop)
        }
    };

    let state = dispatcher.store().snapshot();
    match view {
        View::Income => print_json(&state.income)?,
        View::Expenses => print_json(&state.expenses)?,
        View::Summary => print_json(&Summary {
            total_income: selectors::total_income(&state),
            total_expenses: selectors::total_expenses(&state),
            net_balance: selectors::net_balance(&state),
            income_by_source: selectors::income_by_source(&state),
        })?,
    }

    bridge.unmount();
    outcome.map_err(AppError::from)
}
