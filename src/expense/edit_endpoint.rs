//! Defines the endpoint for replacing an existing expense.

use axum::{
    Form,
    extract::{Path, State},
    response::Response,
};

use crate::{
    app_state::snapshot,
    expense::{
        ExpenseForm, ExpenseId,
        create_endpoint::{ExpenseFormState, redirect_to_page},
    },
};

/// A route handler for updating an expense, redirects to the expense page on
/// success.
///
/// Every field of the stored expense is replaced by the form.
pub async fn edit_expense_endpoint(
    State(state): State<ExpenseFormState>,
    Path(expense_id): Path<ExpenseId>,
    Form(form): Form<ExpenseForm>,
) -> Response {
    let currency = form.currency.clone();
    let rates = snapshot(&state.page_state).rates;

    let draft = match form.into_draft(&rates) {
        Ok(draft) => draft,
        Err(error) => {
            tracing::warn!("Rejected update for expense {expense_id}: {error}");
            return error.into_alert_response();
        }
    };

    match state.expense_backend.update(expense_id, &draft).await {
        Ok(_) => {
            tracing::info!("Updated expense {expense_id}");
            redirect_to_page(&currency)
        }
        Err(error) => {
            tracing::error!("Could not update expense {expense_id} with {draft:?}: {error}");
            error.into_alert_response()
        }
    }
}
