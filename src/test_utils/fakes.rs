use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    Error,
    expense::{Amount, Expense, ExpenseBackend, ExpenseDraft, ExpenseId},
    rates::{RateSource, RateTable},
};

/// An in-memory expense API.
///
/// IDs are assigned in increasing order starting after the largest existing ID.
#[derive(Debug, Default)]
pub(crate) struct FakeExpenseBackend {
    expenses: Mutex<Vec<Expense>>,
    failing: bool,
}

impl FakeExpenseBackend {
    pub(crate) fn with_expenses(expenses: Vec<Expense>) -> Self {
        Self {
            expenses: Mutex::new(expenses),
            failing: false,
        }
    }

    /// A backend whose every request fails as if the API were down.
    pub(crate) fn failing() -> Self {
        Self {
            expenses: Mutex::default(),
            failing: true,
        }
    }

    fn check_available(&self) -> Result<(), Error> {
        if self.failing {
            Err(Error::BackendRequest("connection refused".to_owned()))
        } else {
            Ok(())
        }
    }
}

fn from_draft(id: ExpenseId, draft: &ExpenseDraft) -> Expense {
    Expense {
        id,
        description: draft.description.clone(),
        amount: Amount::new(draft.amount),
        category: draft.category,
        date: draft.date.clone(),
    }
}

#[async_trait]
impl ExpenseBackend for FakeExpenseBackend {
    async fn list(&self) -> Result<Vec<Expense>, Error> {
        self.check_available()?;

        Ok(self.expenses.lock().unwrap().clone())
    }

    async fn create(&self, draft: &ExpenseDraft) -> Result<Expense, Error> {
        self.check_available()?;

        let mut expenses = self.expenses.lock().unwrap();
        let id = expenses.iter().map(|expense| expense.id).max().unwrap_or(0) + 1;
        let expense = from_draft(id, draft);
        expenses.push(expense.clone());

        Ok(expense)
    }

    async fn update(&self, id: ExpenseId, draft: &ExpenseDraft) -> Result<Expense, Error> {
        self.check_available()?;

        let mut expenses = self.expenses.lock().unwrap();
        let stored = expenses
            .iter_mut()
            .find(|expense| expense.id == id)
            .ok_or(Error::NotFound)?;
        *stored = from_draft(id, draft);

        Ok(stored.clone())
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), Error> {
        self.check_available()?;

        let mut expenses = self.expenses.lock().unwrap();
        let count_before = expenses.len();
        expenses.retain(|expense| expense.id != id);

        if expenses.len() == count_before {
            Err(Error::NotFound)
        } else {
            Ok(())
        }
    }
}

/// A rate feed that always returns the same table, or always fails.
#[derive(Debug)]
pub(crate) struct FakeRateSource {
    rates: Option<RateTable>,
}

impl Default for FakeRateSource {
    fn default() -> Self {
        Self::new(RateTable::default())
    }
}

impl FakeRateSource {
    pub(crate) fn new(rates: RateTable) -> Self {
        Self { rates: Some(rates) }
    }

    pub(crate) fn failing() -> Self {
        Self { rates: None }
    }
}

#[async_trait]
impl RateSource for FakeRateSource {
    async fn fetch_rates(&self) -> Result<RateTable, Error> {
        self.rates
            .clone()
            .ok_or_else(|| Error::RateFetch("rate feed is down".to_owned()))
    }
}
