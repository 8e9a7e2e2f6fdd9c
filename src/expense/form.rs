//! The form used to create and edit expenses.

use serde::Deserialize;

use crate::{
    Error,
    currency::CurrencyCode,
    expense::core::{Category, ExpenseDraft},
    rates::RateTable,
    view_model::amount_in_canonical_from_user_input,
};

/// The form data for creating or editing an expense.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpenseForm {
    /// What the money was spent on.
    pub description: String,
    /// The amount in `currency`.
    pub amount: f64,
    /// The category of the expense.
    pub category: Category,
    /// The date of the expense, e.g. "2026-10-19".
    pub date: String,
    /// The currency the amount was entered in.
    #[serde(default)]
    pub currency: CurrencyCode,
}

impl ExpenseForm {
    /// Check the form and convert the amount into the canonical currency.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the description is blank, [Error::EmptyDescription],
    /// - the amount is not a finite number, [Error::InvalidAmount],
    /// - the date is blank, [Error::MissingDate],
    /// - `rates` has no rate for the entered currency, [Error::UnsupportedCurrency].
    pub fn into_draft(self, rates: &RateTable) -> Result<ExpenseDraft, Error> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        if !self.amount.is_finite() {
            return Err(Error::InvalidAmount(self.amount.to_string()));
        }

        let date = self.date.trim();
        if date.is_empty() {
            return Err(Error::MissingDate);
        }

        let amount = amount_in_canonical_from_user_input(self.amount, &self.currency, rates)?;

        Ok(ExpenseDraft {
            description: description.to_owned(),
            amount,
            category: self.category,
            date: date.to_owned(),
        })
    }
}
