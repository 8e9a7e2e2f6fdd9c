//! Derives the totals, category sums and converted amounts shown on the page.
//!
//! Every function here is pure and total: given any list of expenses and any
//! rate table they produce a value, never an error. The only exception is
//! [amount_in_canonical_from_user_input], which refuses to guess when the
//! user entered an amount in a currency the rate table does not know.

use std::fmt::Display;

use crate::{
    Error,
    currency::CurrencyCode,
    expense::{Category, Expense},
    html::format_amount,
    rates::RateTable,
};

/// An amount ready to be displayed.
///
/// `currency` is the currency the value is actually expressed in. This is the
/// requested display currency unless the rate table had no rate for it, in
/// which case the value is left in the canonical currency.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayAmount {
    /// The converted amount.
    pub value: f64,
    /// The currency `value` is expressed in.
    pub currency: CurrencyCode,
}

impl DisplayAmount {
    fn zero(currency: CurrencyCode) -> Self {
        Self {
            value: 0.0,
            currency,
        }
    }
}

impl Display for DisplayAmount {
    /// Formats the value with two decimals and thousands separators, e.g. "1,234.50".
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_amount(self.value))
    }
}

/// The currency amounts end up in when displayed in `display_currency`.
///
/// Falls back to the canonical currency, with a warning, if `rates` has no
/// rate for `display_currency`.
pub fn effective_currency(rates: &RateTable, display_currency: &CurrencyCode) -> CurrencyCode {
    if rates.contains(display_currency) {
        display_currency.clone()
    } else {
        tracing::warn!(
            "No exchange rate for {display_currency}, showing amounts in {}",
            CurrencyCode::canonical()
        );
        CurrencyCode::canonical()
    }
}

/// Convert an amount in the canonical currency into `display_currency`.
///
/// If the rate table has no rate for `display_currency`, the amount is
/// returned unconverted and labelled with the canonical currency.
pub fn convert(
    amount_in_canonical: f64,
    rates: &RateTable,
    display_currency: &CurrencyCode,
) -> DisplayAmount {
    match rates.get(display_currency) {
        Some(rate) => DisplayAmount {
            value: amount_in_canonical * rate,
            currency: display_currency.clone(),
        },
        None => DisplayAmount {
            value: amount_in_canonical,
            currency: CurrencyCode::canonical(),
        },
    }
}

/// The sum of all expenses converted into `display_currency`.
///
/// Malformed amounts count as zero.
pub fn total(
    expenses: &[Expense],
    rates: &RateTable,
    display_currency: &CurrencyCode,
) -> DisplayAmount {
    let currency = effective_currency(rates, display_currency);

    expenses
        .iter()
        .map(|expense| convert(expense.amount.value_or_zero(), rates, &currency))
        .fold(DisplayAmount::zero(currency.clone()), |mut sum, amount| {
            sum.value += amount.value;
            sum
        })
}

/// The converted sum of expenses for each category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    totals: [f64; 5],
    currency: CurrencyCode,
}

impl CategoryBreakdown {
    /// The converted sum for `category`, zero if it has no expenses.
    pub fn get(&self, category: Category) -> DisplayAmount {
        DisplayAmount {
            value: self.totals[category.index()],
            currency: self.currency.clone(),
        }
    }

    /// Each category with its converted sum, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, DisplayAmount)> + '_ {
        Category::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }

    /// The currency the sums are expressed in.
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// The sum across every category.
    pub fn sum(&self) -> f64 {
        self.totals.iter().sum()
    }

    /// Whether every category sums to zero.
    pub fn is_all_zero(&self) -> bool {
        self.totals.iter().all(|total| *total == 0.0)
    }
}

/// Sum the converted expenses for each of the five categories.
///
/// Every category is present in the result, even those with no expenses.
pub fn category_breakdown(
    expenses: &[Expense],
    rates: &RateTable,
    display_currency: &CurrencyCode,
) -> CategoryBreakdown {
    let currency = effective_currency(rates, display_currency);
    let mut totals = [0.0; 5];

    for expense in expenses {
        totals[expense.category.index()] +=
            convert(expense.amount.value_or_zero(), rates, &currency).value;
    }

    CategoryBreakdown { totals, currency }
}

/// Convert an amount the user entered in `entered_currency` into the canonical
/// currency for storage.
///
/// Amounts already in the canonical currency are returned as-is. Converted
/// amounts are rounded to two decimal places so that repeated edits do not
/// accumulate fractions of a cent.
///
/// # Errors
/// Returns [Error::UnsupportedCurrency] if `rates` has no rate for
/// `entered_currency`.
pub fn amount_in_canonical_from_user_input(
    entered_amount: f64,
    entered_currency: &CurrencyCode,
    rates: &RateTable,
) -> Result<f64, Error> {
    if entered_currency.is_canonical() {
        return Ok(entered_amount);
    }

    let rate = rates
        .get(entered_currency)
        .ok_or_else(|| Error::UnsupportedCurrency(entered_currency.clone()))?;

    Ok(round_to_cents(entered_amount / rate))
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
