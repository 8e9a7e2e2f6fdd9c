//! ExpenseFlow is a web app for tracking expenses in several currencies.
//!
//! The server renders a single page with the expense list, a spending
//! breakdown by category and a form for adding or editing expenses. Expenses
//! are stored by an external REST API and amounts are converted for display
//! with live exchange rates. Stored amounts are always in the canonical
//! currency (USD).

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod charts;
mod config;
mod currency;
mod endpoints;
mod expense;
mod html;
mod internal_server_error;
mod not_found;
mod page_state;
mod rates;
mod routing;
mod view_model;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use config::{
    AppConfig, DEFAULT_EXPENSE_API_URL, DEFAULT_REQUEST_TIMEOUT, EXPENSE_API_URL_ENV,
};
pub use currency::{CANONICAL_CURRENCY, CurrencyCode};
pub use expense::{
    Amount, Category, Expense, ExpenseBackend, ExpenseDraft, ExpenseId, HttpExpenseBackend,
};
pub use page_state::{PageState, Transition};
pub use rates::{DEFAULT_RATES_URL, ExchangeRateApiClient, RateSource, RateTable};
pub use routing::build_router;
pub use view_model::{
    CategoryBreakdown, DisplayAmount, amount_in_canonical_from_user_input, category_breakdown,
    convert, effective_currency, total,
};

use crate::{
    alert::Alert, internal_server_error::internal_server_error_response,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not listen for the terminate signal: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::debug!("Received ctrl+c signal."),
        _ = terminate => tracing::debug!("Received terminate signal."),
    }

    handle.graceful_shutdown(Some(Duration::from_secs(1)));
}

/// The errors that may occur in the application.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum Error {
    /// The expense API could not be reached or did not answer in time.
    #[error("could not reach the expense API: {0}")]
    BackendRequest(String),

    /// The expense API answered with an error status code and body.
    #[error("the expense API responded with status {0}: {1}")]
    UnexpectedStatus(u16, String),

    /// The expense API answered with something that is not an expense.
    #[error("the expense API sent a malformed response: {0}")]
    MalformedResponse(String),

    /// The exchange rates could not be fetched or decoded.
    #[error("could not fetch exchange rates: {0}")]
    RateFetch(String),

    /// An amount was entered in a currency with no known exchange rate.
    ///
    /// The amount cannot be converted into the canonical currency, so it is
    /// rejected rather than stored with a guessed value.
    #[error("no exchange rate for {0}")]
    UnsupportedCurrency(CurrencyCode),

    /// A string that is not a three letter currency code.
    #[error("\"{0}\" is not a three letter currency code")]
    InvalidCurrencyCode(String),

    /// An expense was submitted without a description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// An expense was submitted with an amount that is not a finite number.
    #[error("{0} is not a valid amount")]
    InvalidAmount(String),

    /// An expense was submitted without a date.
    #[error("date cannot be empty")]
    MissingDate,

    /// The requested expense does not exist.
    #[error("the requested resource could not be found")]
    NotFound,

    /// A setting could not be used, e.g. a malformed URL.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                internal_server_error_response(
                    "Something went wrong",
                    "Try again later or check the server logs.",
                )
            }
        }
    }
}

impl Error {
    /// Render the error as an alert for htmx to show in the alert container.
    fn into_alert_response(self) -> Response {
        match self {
            Error::EmptyDescription => Alert::error(
                "Missing description",
                "Describe what the money was spent on.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::InvalidAmount(amount) => Alert::error(
                "Invalid amount",
                &format!("{amount} is not a number. Enter an amount such as 12.50."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::MissingDate => Alert::error("Missing date", "Pick the date of the expense.")
                .into_response(StatusCode::BAD_REQUEST),
            Error::UnsupportedCurrency(currency) => Alert::error(
                "Unsupported currency",
                &format!(
                    "There is no exchange rate for {currency}, so the amount could not be \
                    converted to {CANONICAL_CURRENCY}. Switch to {CANONICAL_CURRENCY} and try again."
                ),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::InvalidCurrencyCode(code) => Alert::error(
                "Invalid currency",
                &format!("\"{code}\" is not a three letter currency code."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::NotFound => Alert::error(
                "Could not find expense",
                "The expense could not be found. \
                Try refreshing the page to see if the expense has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::BackendRequest(_)
            | Error::UnexpectedStatus(..)
            | Error::MalformedResponse(_)
            | Error::RateFetch(_) => Alert::error(
                "Could not save changes",
                "The expense service is unavailable. Try again later.",
            )
            .into_response(StatusCode::BAD_GATEWAY),
            Error::InvalidConfig(_) => Alert::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
