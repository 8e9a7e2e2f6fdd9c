//! Defines the endpoint for deleting an expense.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    response::Response,
};

use crate::{
    AppState,
    expense::{
        ExpenseBackend, ExpenseId,
        create_endpoint::redirect_to_page,
        page::{PageQuery, requested_currency},
    },
};

/// The state needed to delete an expense.
#[derive(Clone)]
pub struct DeleteExpenseState {
    /// Where expenses are stored.
    expense_backend: Arc<dyn ExpenseBackend>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            expense_backend: state.expense_backend.clone(),
        }
    }
}

/// A route handler for deleting an expense, redirects to the expense page in
/// the same display currency on success.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Query(query): Query<PageQuery>,
) -> Response {
    let currency = requested_currency(query.currency.as_deref()).unwrap_or_default();

    match state.expense_backend.delete(expense_id).await {
        Ok(()) => {
            tracing::info!("Deleted expense {expense_id}");
            redirect_to_page(&currency)
        }
        Err(error) => {
            tracing::error!("Could not delete expense {expense_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        extract::{Path, Query, State},
        http::StatusCode,
    };

    use crate::{
        expense::{Amount, Category, Expense, ExpenseBackend, page::PageQuery},
        test_utils::{FakeExpenseBackend, assert_hx_redirect},
    };

    use super::{DeleteExpenseState, delete_expense_endpoint};

    fn expense(id: i64) -> Expense {
        Expense {
            id,
            description: "Bus".to_owned(),
            amount: Amount::new(3.0),
            category: Category::Travel,
            date: "2026-10-19".to_owned(),
        }
    }

    fn query(currency: &str) -> Query<PageQuery> {
        Query(PageQuery {
            currency: Some(currency.to_owned()),
            edit: None,
        })
    }

    #[tokio::test]
    async fn deletes_expense_and_keeps_currency() {
        let backend = Arc::new(FakeExpenseBackend::with_expenses(vec![
            expense(1),
            expense(2),
        ]));
        let state = DeleteExpenseState {
            expense_backend: backend.clone(),
        };

        let response = delete_expense_endpoint(State(state), Path(1), query("eur")).await;

        assert_hx_redirect(&response, "/?currency=EUR");
        assert_eq!(backend.list().await.unwrap(), vec![expense(2)]);
    }

    #[tokio::test]
    async fn deleting_missing_expense_is_not_found() {
        let state = DeleteExpenseState {
            expense_backend: Arc::new(FakeExpenseBackend::default()),
        };

        let response = delete_expense_endpoint(State(state), Path(1), query("USD")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_currency_redirects_in_canonical_currency() {
        let state = DeleteExpenseState {
            expense_backend: Arc::new(FakeExpenseBackend::with_expenses(vec![expense(1)])),
        };

        let response = delete_expense_endpoint(State(state), Path(1), query("dollars")).await;

        assert_hx_redirect(&response, "/?currency=USD");
    }
}
