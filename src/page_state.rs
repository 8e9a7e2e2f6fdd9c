//! The state the expense page is rendered from.
//!
//! [PageState] is never mutated in place. Each change produces a new snapshot
//! via [PageState::apply], and the shared copy in [crate::AppState] is swapped
//! out wholesale.

use crate::{
    currency::CurrencyCode,
    expense::{Expense, ExpenseId},
    rates::RateTable,
};

/// A snapshot of everything the expense page displays.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageState {
    /// The expenses as last fetched from the expense API.
    pub expenses: Vec<Expense>,
    /// The exchange rates as last fetched from the rate feed.
    pub rates: RateTable,
    /// The currency amounts are displayed in.
    pub display_currency: CurrencyCode,
    /// The expense loaded into the form, if any.
    pub editing: Option<ExpenseId>,
}

/// A change to the [PageState].
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// A fresh list of expenses arrived from the expense API.
    ExpensesLoaded(Vec<Expense>),
    /// A fresh rate table arrived from the rate feed.
    RatesLoaded(RateTable),
    /// The user picked a display currency.
    CurrencySelected(CurrencyCode),
    /// The user chose to edit an expense.
    EditStarted(ExpenseId),
    /// The edit was submitted or cancelled.
    EditFinished,
}

impl PageState {
    /// Produce the state that follows `transition`.
    ///
    /// Starting an edit switches the display to the canonical currency so that
    /// the amount in the form is the stored amount. Selecting a different
    /// currency abandons an edit in progress. Starting an edit for an expense
    /// that is not in the list leaves the state unchanged.
    pub fn apply(self, transition: Transition) -> Self {
        match transition {
            Transition::ExpensesLoaded(expenses) => {
                let editing = self
                    .editing
                    .filter(|id| expenses.iter().any(|expense| expense.id == *id));

                Self {
                    expenses,
                    editing,
                    ..self
                }
            }
            Transition::RatesLoaded(rates) => Self { rates, ..self },
            Transition::CurrencySelected(display_currency) => {
                let editing = if display_currency == self.display_currency {
                    self.editing
                } else {
                    None
                };

                Self {
                    display_currency,
                    editing,
                    ..self
                }
            }
            Transition::EditStarted(id) => {
                if self.expense(id).is_none() {
                    tracing::warn!("Tried to edit expense {id}, which is not in the list");
                    return self;
                }

                Self {
                    display_currency: CurrencyCode::canonical(),
                    editing: Some(id),
                    ..self
                }
            }
            Transition::EditFinished => Self {
                editing: None,
                ..self
            },
        }
    }

    /// The expense with `id`, if it is in the list.
    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// The expense loaded into the form, if any.
    pub fn editing_expense(&self) -> Option<&Expense> {
        self.editing.and_then(|id| self.expense(id))
    }
}
