//! Defines the endpoint for creating a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState,
    app_state::snapshot,
    currency::CurrencyCode,
    expense::{ExpenseBackend, ExpenseForm, page::page_url},
    page_state::PageState,
};

/// The state needed to create or update an expense.
#[derive(Clone)]
pub struct ExpenseFormState {
    /// Where expenses are stored.
    pub expense_backend: Arc<dyn ExpenseBackend>,
    /// The last fetched data, used for the exchange rates.
    pub page_state: Arc<Mutex<PageState>>,
}

impl FromRef<AppState> for ExpenseFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_backend: state.expense_backend.clone(),
            page_state: state.page_state.clone(),
        }
    }
}

/// A route handler for creating a new expense, redirects to the expense page
/// on success.
///
/// The page is reloaded rather than patched so that it shows exactly what the
/// expense API stored.
pub async fn create_expense_endpoint(
    State(state): State<ExpenseFormState>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let currency = form.currency.clone();
    let rates = snapshot(&state.page_state).rates;

    let draft = match form.into_draft(&rates) {
        Ok(draft) => draft,
        Err(error) => {
            tracing::warn!("Rejected new expense: {error}");
            return error.into_alert_response();
        }
    };

    match state.expense_backend.create(&draft).await {
        Ok(expense) => {
            tracing::info!("Created expense {}", expense.id);
            redirect_to_page(&currency)
        }
        Err(error) => {
            tracing::error!("Could not create expense {draft:?}: {error}");
            error.into_alert_response()
        }
    }
}

/// Tell htmx to reload the expense page in `currency`.
pub(crate) fn redirect_to_page(currency: &CurrencyCode) -> Response {
    (HxRedirect(page_url(currency)), StatusCode::SEE_OTHER).into_response()
}
