//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    Error,
    config::AppConfig,
    expense::{ExpenseBackend, HttpExpenseBackend},
    page_state::{PageState, Transition},
    rates::{ExchangeRateApiClient, RateSource},
};

/// The state of the web server.
#[derive(Clone)]
pub struct AppState {
    /// Where expenses are stored.
    pub expense_backend: Arc<dyn ExpenseBackend>,

    /// Where exchange rates come from.
    pub rate_source: Arc<dyn RateSource>,

    /// The most recent data fetched from the collaborators.
    ///
    /// The lock must never be held across an await point.
    pub page_state: Arc<Mutex<PageState>>,
}

impl AppState {
    /// Create a new [AppState] that talks to the services in `config`.
    ///
    /// # Errors
    /// Returns an error if the HTTP clients cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, Error> {
        let expense_backend =
            HttpExpenseBackend::new(config.expense_api_url.clone(), config.request_timeout)?;
        let rate_source =
            ExchangeRateApiClient::new(config.rates_url.clone(), config.request_timeout)?;

        Ok(Self::with_sources(
            Arc::new(expense_backend),
            Arc::new(rate_source),
        ))
    }

    /// Create a new [AppState] from existing collaborators.
    pub fn with_sources(
        expense_backend: Arc<dyn ExpenseBackend>,
        rate_source: Arc<dyn RateSource>,
    ) -> Self {
        Self {
            expense_backend,
            rate_source,
            page_state: Arc::new(Mutex::new(PageState::default())),
        }
    }
}

/// Get a copy of the shared page state.
///
/// A poisoned lock still holds a complete snapshot since the state is only
/// ever replaced wholesale, so it is used as is.
pub fn snapshot(page_state: &Mutex<PageState>) -> PageState {
    page_state
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Replace the shared page state with the result of applying `transitions`.
pub fn update(page_state: &Mutex<PageState>, transitions: impl IntoIterator<Item = Transition>) {
    let mut guard = page_state.lock().unwrap_or_else(PoisonError::into_inner);
    let next = transitions
        .into_iter()
        .fold(guard.clone(), |state, transition| state.apply(transition));
    *guard = next;
}
