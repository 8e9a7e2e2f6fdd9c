//! Defines the route handler for the expense page.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    app_state::{snapshot, update},
    currency::CurrencyCode,
    endpoints,
    expense::{ExpenseBackend, ExpenseId, view::expense_page_view},
    page_state::{PageState, Transition},
    rates::RateSource,
};

/// The state needed to display the expense page.
#[derive(Clone)]
pub struct ExpensePageState {
    /// Where expenses are stored.
    pub expense_backend: Arc<dyn ExpenseBackend>,
    /// Where exchange rates come from.
    pub rate_source: Arc<dyn RateSource>,
    /// The last fetched data, shown when a fetch fails.
    pub page_state: Arc<Mutex<PageState>>,
}

impl FromRef<AppState> for ExpensePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_backend: state.expense_backend.clone(),
            rate_source: state.rate_source.clone(),
            page_state: state.page_state.clone(),
        }
    }
}

/// The query parameters for the expense page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// The display currency, e.g. "EUR".
    pub currency: Option<String>,
    /// The expense to load into the form.
    pub edit: Option<ExpenseId>,
}

/// Display the expenses, the spending breakdown and the expense form.
///
/// Expenses and rates are fetched concurrently on every load. If either fetch
/// fails the last value that was fetched successfully is shown instead.
///
/// Responds with the 404 page if `edit` names an expense that does not exist.
pub async fn get_expense_page(
    State(state): State<ExpensePageState>,
    Query(query): Query<PageQuery>,
) -> Response {
    let page_state = refresh(&state).await;

    let page_state = match requested_currency(query.currency.as_deref()) {
        Some(currency) => page_state.apply(Transition::CurrencySelected(currency)),
        None => page_state,
    };

    let page_state = match query.edit {
        Some(expense_id) if page_state.expense(expense_id).is_none() => {
            tracing::warn!("Tried to edit expense {expense_id}, which does not exist");
            return Error::NotFound.into_response();
        }
        Some(expense_id) => page_state.apply(Transition::EditStarted(expense_id)),
        None => page_state.apply(Transition::EditFinished),
    };

    let today = OffsetDateTime::now_utc().date();

    Html(expense_page_view(&page_state, today).into_string()).into_response()
}

/// Fetch expenses and rates and store whatever arrived in the shared state.
async fn refresh(state: &ExpensePageState) -> PageState {
    let (expenses, rates) = tokio::join!(
        state.expense_backend.list(),
        state.rate_source.fetch_rates()
    );

    let mut transitions = Vec::with_capacity(2);

    match expenses {
        Ok(expenses) => transitions.push(Transition::ExpensesLoaded(expenses)),
        Err(error) => tracing::error!("Could not fetch expenses, showing last known list: {error}"),
    }

    match rates {
        Ok(rates) => transitions.push(Transition::RatesLoaded(rates)),
        Err(error) => tracing::error!("Could not fetch exchange rates, using last known rates: {error}"),
    }

    update(&state.page_state, transitions);

    snapshot(&state.page_state)
}

/// Parse the display currency from a query parameter.
///
/// Returns `None` if the parameter is missing or is not a currency code.
pub fn requested_currency(currency: Option<&str>) -> Option<CurrencyCode> {
    currency?
        .parse()
        .inspect_err(|error| tracing::warn!("Ignoring requested display currency: {error}"))
        .ok()
}

/// The URL of the expense page displayed in `currency`.
pub fn page_url(currency: &CurrencyCode) -> String {
    match serde_urlencoded::to_string([("currency", currency.as_str())]) {
        Ok(param) => format!("{}?{param}", endpoints::ROOT),
        Err(error) => {
            tracing::error!("Could not encode currency {currency}: {error}");
            endpoints::ROOT.to_owned()
        }
    }
}

/// The URL of the expense page with the expense `expense_id` loaded into the form.
pub fn edit_url(expense_id: ExpenseId) -> String {
    format!("{}?edit={expense_id}", endpoints::ROOT)
}
