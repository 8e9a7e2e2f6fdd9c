//! Defines the expense records exchanged with the expense API.

use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// The ID the expense API assigns to an expense.
pub type ExpenseId = i64;

/// What an expense was spent on.
///
/// This is a closed set: any category the API sends that is not one of these
/// is treated as [Category::Other].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Category {
    /// Groceries, eating out.
    Food,
    /// Flights, fuel, public transport.
    Travel,
    /// Power, water, internet.
    Utilities,
    /// Movies, concerts, subscriptions.
    Entertainment,
    /// Anything else.
    #[default]
    #[serde(other)]
    Other,
}

impl Category {
    /// Every category in display order.
    pub const ALL: [Category; 5] = [
        Category::Food,
        Category::Travel,
        Category::Utilities,
        Category::Entertainment,
        Category::Other,
    ];

    /// The name shown to the user and sent to the API.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Utilities => "Utilities",
            Category::Entertainment => "Entertainment",
            Category::Other => "Other",
        }
    }

    /// The colour used for this category in the breakdown chart.
    pub fn color(self) -> &'static str {
        match self {
            Category::Food => "#fb7185",
            Category::Travel => "#60a5fa",
            Category::Utilities => "#fbbf24",
            Category::Entertainment => "#a78bfa",
            Category::Other => "#94a3b8",
        }
    }

    /// Tailwind classes for the badge shown next to an expense.
    pub fn badge_style(self) -> &'static str {
        match self {
            Category::Food => "bg-rose-50 text-rose-500",
            Category::Travel => "bg-blue-50 text-blue-500",
            Category::Utilities => "bg-amber-50 text-amber-500",
            Category::Entertainment => "bg-violet-50 text-violet-500",
            Category::Other => "bg-slate-50 text-slate-500",
        }
    }

    /// The position of this category in [Category::ALL].
    pub fn index(self) -> usize {
        match self {
            Category::Food => 0,
            Category::Travel => 1,
            Category::Utilities => 2,
            Category::Entertainment => 3,
            Category::Other => 4,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// An amount in the canonical currency as received from the expense API.
///
/// The API may send a number or a numeric string. Anything else is kept as a
/// malformed amount, which counts as zero in every sum.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Amount(Option<f64>);

impl Amount {
    /// A well-formed amount.
    pub fn new(value: f64) -> Self {
        Self(Some(value).filter(|value| value.is_finite()))
    }

    /// An amount that could not be read.
    pub fn malformed() -> Self {
        Self(None)
    }

    /// The amount, if it could be read.
    pub fn value(self) -> Option<f64> {
        self.0
    }

    /// The amount, or zero if it could not be read.
    pub fn value_or_zero(self) -> f64 {
        self.0.unwrap_or(0.0)
    }

    fn from_json(value: &Value) -> Self {
        let parsed = match value {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };

        match parsed {
            Some(value) => Self::new(value),
            None => {
                tracing::warn!("Treating malformed expense amount {value} as zero");
                Self::malformed()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        Ok(Self::from_json(&value))
    }
}

/// An expense as stored by the expense API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expense {
    /// The ID assigned by the expense API.
    pub id: ExpenseId,
    /// What the money was spent on.
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    /// The amount in the canonical currency.
    #[serde(default)]
    pub amount: Amount,
    /// The category of the expense.
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Category,
    /// The calendar date of the expense, e.g. "2026-10-19".
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Null => Ok(String::new()),
        other => {
            tracing::warn!("Treating non-text expense field {other} as empty");
            Ok(String::new())
        }
    }
}

fn lenient_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;

    Ok(serde_json::from_value(value.clone()).unwrap_or_else(|_| {
        tracing::warn!("Treating expense category {value} as {}", Category::Other);
        Category::Other
    }))
}

/// The fields of an expense sent to the API when creating or replacing an
/// expense.
///
/// `amount` must already be in the canonical currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpenseDraft {
    /// What the money was spent on.
    pub description: String,
    /// The amount in the canonical currency.
    #[serde(serialize_with = "serialize_two_decimals")]
    pub amount: f64,
    /// The category of the expense.
    pub category: Category,
    /// The calendar date of the expense.
    pub date: String,
}

fn serialize_two_decimals<S>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{amount:.2}"))
}

impl From<&Expense> for ExpenseDraft {
    fn from(expense: &Expense) -> Self {
        Self {
            description: expense.description.clone(),
            amount: expense.amount.value_or_zero(),
            category: expense.category,
            date: expense.date.clone(),
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

/// Read a list of expenses from an untrusted expense API response.
///
/// A body that is not a JSON array is treated as an empty list, and list
/// elements that are not expenses are skipped. Both cases are logged.
pub fn parse_expense_list(body: Value) -> Vec<Expense> {
    let Value::Array(items) = body else {
        tracing::error!("Invalid expense list format, expected a JSON array: {body}");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| {
            serde_json::from_value::<Expense>(item)
                .inspect_err(|error| tracing::warn!("Skipping malformed expense: {error}"))
                .ok()
        })
        .collect()
}

/// Read a single expense returned by a create or update request.
///
/// # Errors
/// Returns [Error::MalformedResponse] if `body` is not an expense.
pub fn parse_expense(body: Value) -> Result<Expense, Error> {
    serde_json::from_value(body).map_err(|error| Error::MalformedResponse(error.to_string()))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::Error;

    use super::{Amount, Category, Expense, ExpenseDraft, parse_expense, parse_expense_list};

    #[test]
    fn parses_django_style_list() {
        let body = json!([
            {"id": 1, "description": "Groceries", "amount": "100.00", "category": "Food", "date": "2026-10-01"},
            {"id": 2, "description": "Train", "amount": 50, "category": "Travel", "date": "2026-10-02"},
        ]);

        let expenses = parse_expense_list(body);

        assert_eq!(
            expenses,
            vec![
                Expense {
                    id: 1,
                    description: "Groceries".to_owned(),
                    amount: Amount::new(100.0),
                    category: Category::Food,
                    date: "2026-10-01".to_owned(),
                },
                Expense {
                    id: 2,
                    description: "Train".to_owned(),
                    amount: Amount::new(50.0),
                    category: Category::Travel,
                    date: "2026-10-02".to_owned(),
                },
            ]
        );
    }

    #[test]
    fn non_array_body_is_empty_list() {
        for body in [
            json!({"detail": "Not found."}),
            json!("oops"),
            json!(null),
            json!(42),
        ] {
            assert!(parse_expense_list(body).is_empty());
        }
    }

    #[test]
    fn skips_elements_without_id() {
        let body = json!([
            {"description": "no id", "amount": "1.00", "category": "Food"},
            "not an object",
            {"id": 7, "amount": "2.00"},
        ]);

        let expenses = parse_expense_list(body);

        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].id, 7);
        assert_eq!(expenses[0].category, Category::Other);
        assert_eq!(expenses[0].description, "");
    }

    #[test]
    fn malformed_amounts_count_as_zero() {
        let body = json!([
            {"id": 1, "amount": "twelve"},
            {"id": 2, "amount": null},
            {"id": 3},
            {"id": 4, "amount": {"value": 3}},
            {"id": 5, "amount": " 4.5 "},
        ]);

        let amounts: Vec<_> = parse_expense_list(body)
            .into_iter()
            .map(|expense| expense.amount)
            .collect();

        assert_eq!(
            amounts,
            vec![
                Amount::malformed(),
                Amount::malformed(),
                Amount::malformed(),
                Amount::malformed(),
                Amount::new(4.5),
            ]
        );
        assert_eq!(amounts[0].value_or_zero(), 0.0);
    }

    #[test]
    fn unknown_category_is_other() {
        let expense: Expense =
            serde_json::from_value(json!({"id": 1, "category": "Rent"})).unwrap();

        assert_eq!(expense.category, Category::Other);
    }

    #[test]
    fn keeps_expenses_with_null_or_mistyped_fields() {
        let body = json!([
            {"id": 1, "description": "Lunch", "amount": "10.00", "category": null, "date": "2026-10-01"},
            {"id": 2, "description": null, "amount": "20.00", "category": "Food", "date": "2026-10-02"},
            {"id": 3, "description": "Taxi", "amount": "30.00", "category": 5, "date": "2026-10-03"},
            {"id": 4, "description": "Power", "amount": "40.00", "category": "Utilities", "date": null},
            {"id": 5, "description": ["a"], "amount": "50.00", "category": {}, "date": 20261005},
        ]);

        let expenses = parse_expense_list(body);

        let ids: Vec<_> = expenses.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(expenses[0].category, Category::Other);
        assert_eq!(expenses[1].description, "");
        assert_eq!(expenses[2].category, Category::Other);
        assert_eq!(expenses[3].date, "");
        assert_eq!(expenses[4].description, "");
        assert_eq!(expenses[4].category, Category::Other);
        assert_eq!(expenses[4].date, "");
        let total: f64 = expenses
            .iter()
            .map(|expense| expense.amount.value_or_zero())
            .sum();
        assert_eq!(total, 150.0);
    }

    #[test]
    fn non_finite_amount_is_malformed() {
        assert_eq!(Amount::new(f64::NAN), Amount::malformed());
        assert_eq!(Amount::new(f64::INFINITY).value(), None);
    }

    #[test]
    fn draft_sends_amount_with_two_decimals() {
        let draft = ExpenseDraft {
            description: "Coffee".to_owned(),
            amount: 12.3,
            category: Category::Food,
            date: "2026-10-19".to_owned(),
        };

        let json = serde_json::to_value(&draft).unwrap();

        assert_eq!(
            json,
            json!({
                "description": "Coffee",
                "amount": "12.30",
                "category": "Food",
                "date": "2026-10-19",
            })
        );
    }

    #[test]
    fn parse_expense_rejects_non_expense() {
        let result = parse_expense(json!({"detail": "Bad request"}));

        assert!(matches!(result, Err(Error::MalformedResponse(_))));
    }

    #[test]
    fn categories_are_in_display_order() {
        for (index, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), index);
        }
    }
}
