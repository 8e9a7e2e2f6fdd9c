//! The client for the REST API that stores expenses.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;

use crate::{
    Error,
    expense::{Expense, ExpenseDraft, ExpenseId, core::parse_expense, parse_expense_list},
};

/// Somewhere expenses are stored.
#[async_trait]
pub trait ExpenseBackend: Send + Sync {
    /// Get every stored expense.
    async fn list(&self) -> Result<Vec<Expense>, Error>;

    /// Store a new expense and return it with its assigned ID.
    async fn create(&self, draft: &ExpenseDraft) -> Result<Expense, Error>;

    /// Replace every field of the expense with `id`.
    async fn update(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<Expense, Error>;

    /// Remove the expense with `id`.
    async fn delete(&self, id: ExpenseId) -> Result<(), Error>;
}

/// Talks to a Django REST framework style expense collection, e.g.
/// `http://127.0.0.1:8000/api/expenses/`.
#[derive(Debug, Clone)]
pub struct HttpExpenseBackend {
    client: Client,
    base_url: Url,
}

impl HttpExpenseBackend {
    /// Create a client for the collection at `base_url`, which must end in '/'.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if the HTTP client cannot be built.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::InvalidConfig(format!("could not build HTTP client: {error}")))?;

        Ok(Self { client, base_url })
    }

    fn expense_url(&self, id: ExpenseId) -> Result<Url, Error> {
        self.base_url
            .join(&format!("{id}/"))
            .map_err(|error| Error::InvalidConfig(format!("could not build expense URL: {error}")))
    }
}

async fn send(request: RequestBuilder) -> Result<Response, Error> {
    let response = request
        .send()
        .await
        .map_err(|error| Error::BackendRequest(error.to_string()))?;

    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(Error::NotFound),
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(Error::UnexpectedStatus(status.as_u16(), body))
        }
    }
}

async fn read_expense(response: Response) -> Result<Expense, Error> {
    let body: Value = response
        .json()
        .await
        .map_err(|error| Error::MalformedResponse(error.to_string()))?;

    parse_expense(body)
}

#[async_trait]
impl ExpenseBackend for HttpExpenseBackend {
    async fn list(&self) -> Result<Vec<Expense>, Error> {
        let response = send(self.client.get(self.base_url.clone())).await?;

        match response.json::<Value>().await {
            Ok(body) => Ok(parse_expense_list(body)),
            Err(error) => {
                tracing::error!("Expense list response was not JSON: {error}");
                Ok(Vec::new())
            }
        }
    }

    async fn create(&self, draft: &ExpenseDraft) -> Result<Expense, Error> {
        let response = send(self.client.post(self.base_url.clone()).json(draft)).await?;

        read_expense(response).await
    }

    async fn update(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<Expense, Error> {
        let response = send(self.client.put(self.expense_url(id)?).json(draft)).await?;

        read_expense(response).await
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), Error> {
        send(self.client.delete(self.expense_url(id)?)).await?;

        Ok(())
    }
}
