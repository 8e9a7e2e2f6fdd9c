//! Expenses: the records, the client for the expense API, and the page and
//! endpoints for managing them.

mod backend;
mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod page;
mod view;

pub use backend::{ExpenseBackend, HttpExpenseBackend};
pub use core::{Amount, Category, Expense, ExpenseDraft, ExpenseId, parse_expense_list};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::edit_expense_endpoint;
pub use form::ExpenseForm;
pub use page::get_expense_page;
