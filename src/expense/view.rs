//! Renders the expense page.

use maud::{Markup, html};
use time::Date;

use crate::{
    charts::{category_breakdown_chart, chart_container, chart_scripts},
    currency::{CurrencyCode, DISPLAY_CURRENCIES},
    endpoints::{self, format_endpoint},
    expense::{
        Category, Expense,
        page::{edit_url, page_url},
    },
    html::{
        BUTTON_ICON_STYLE, BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, HeadElement, LINK_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    page_state::PageState,
    rates::RateTable,
    view_model::{
        CategoryBreakdown, DisplayAmount, category_breakdown, convert, effective_currency, total,
    },
};

const SECTION_HEADING_STYLE: &str = "text-xl font-black text-slate-800 dark:text-white \
    underline decoration-indigo-200 underline-offset-8";

/// The whole expense page for `state`.
///
/// `today` is the default date for a new expense.
pub fn expense_page_view(state: &PageState, today: Date) -> Markup {
    let currency = effective_currency(&state.rates, &state.display_currency);
    let total = total(&state.expenses, &state.rates, &currency);
    let breakdown = category_breakdown(&state.expenses, &state.rates, &currency);
    let chart = category_breakdown_chart(&breakdown);
    let head_elements: Vec<HeadElement> = if breakdown.is_all_zero() {
        Vec::new()
    } else {
        chart_scripts(&chart).into()
    };

    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-6xl"
            {
                header class={ (CARD_STYLE) " p-12 mb-10" }
                {
                    div class="flex flex-wrap justify-between items-center gap-6 mb-10"
                    {
                        div
                        {
                            h1 class="text-3xl font-black tracking-tight" { "ExpenseFlow" }
                            p id="total-spent" class="text-sm font-bold text-slate-400 uppercase"
                            {
                                "Total Spent: "
                                span class="text-indigo-600 dark:text-indigo-400"
                                {
                                    (currency) " " (total)
                                }
                            }
                        }

                        (currency_selector(&state.display_currency))
                    }

                    (expense_form(state.editing_expense(), &currency, today))
                }

                div class="grid grid-cols-1 lg:grid-cols-2 gap-10 items-start"
                {
                    (analytics_card(&breakdown))
                    (history_card(state, &currency))
                }
            }
        }
    };

    base("Expenses", &head_elements, &content)
}

fn currency_selector(display_currency: &CurrencyCode) -> Markup {
    html! {
        form method="get" action=(endpoints::ROOT) class="flex items-center gap-3"
        {
            label for="currency" class=(FORM_LABEL_STYLE) { "Currency" }

            select
                id="currency"
                name="currency"
                onchange="this.form.submit()"
                class="p-3 rounded-2xl text-sm font-bold bg-slate-50 dark:bg-slate-700 cursor-pointer"
            {
                @for currency in DISPLAY_CURRENCIES {
                    option
                        value=(currency.code)
                        selected[display_currency.as_str() == currency.code]
                    {
                        (currency.symbol) " " (currency.code)
                    }
                }
            }

            noscript
            {
                button type="submit" class=(LINK_STYLE) { "Apply" }
            }
        }
    }
}

fn expense_form(editing: Option<&Expense>, currency: &CurrencyCode, today: Date) -> Markup {
    let create_url = editing.is_none().then_some(endpoints::EXPENSES_API);
    let update_url = editing.map(|expense| format_endpoint(endpoints::EXPENSE, expense.id));

    let description = editing.map(|expense| expense.description.as_str());
    let amount = editing.map(|expense| format!("{:.2}", expense.amount.value_or_zero()));
    let category = editing.map(|expense| expense.category).unwrap_or_default();
    let date = editing
        .map(|expense| expense.date.clone())
        .unwrap_or_else(|| today.to_string());

    html! {
        form
            id="expense-form"
            hx-post=[create_url]
            hx-put=[update_url]
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            class="flex flex-col gap-4"
        {
            div class="flex items-center gap-8"
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    id="description"
                    name="description"
                    type="text"
                    placeholder="What did you spend on?"
                    value=[description]
                    required
                    autofocus
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-8"
            {
                label for="amount" class=(FORM_LABEL_STYLE)
                {
                    "Amount (" (currency.symbol()) ")"
                }
                input
                    id="amount"
                    name="amount"
                    type="number"
                    step="0.01"
                    placeholder="0.00"
                    value=[amount]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-8"
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    id="date"
                    name="date"
                    type="date"
                    value=(date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div class="flex items-center gap-8"
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }
                select
                    id="category"
                    name="category"
                    class={ (FORM_TEXT_INPUT_STYLE) " cursor-pointer" }
                {
                    @for choice in Category::ALL {
                        option value=(choice.label()) selected[choice == category]
                        {
                            (choice.label())
                        }
                    }
                }
            }

            input type="hidden" name="currency" value=(currency);

            div class="flex items-center gap-6"
            {
                button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                {
                    span class="htmx-indicator" { (loading_spinner()) }
                    @if editing.is_some() { "Update Record" } @else { "Confirm Entry" }
                }

                @if editing.is_some() {
                    a href=(page_url(currency)) class=(LINK_STYLE) { "Cancel" }
                }
            }
        }
    }
}

fn analytics_card(breakdown: &CategoryBreakdown) -> Markup {
    html! {
        section class={ (CARD_STYLE) " p-12 flex flex-col items-center" }
        {
            h2 class={ (SECTION_HEADING_STYLE) " mb-12 self-start" } { "Analytics" }

            @if breakdown.is_all_zero() {
                p class="text-sm font-bold text-slate-400 mb-12"
                {
                    "Add an expense to see where your money goes."
                }
            } @else {
                (chart_container())
            }

            ul class="w-full flex flex-col gap-3"
            {
                @for (category, amount) in breakdown.iter() {
                    li
                        id={ "category-total-" (category.label()) }
                        class="flex justify-between items-center text-sm font-bold"
                    {
                        span class="flex items-center gap-3"
                        {
                            span
                                class="inline-block w-3 h-3 rounded-full"
                                style={ "background-color: " (category.color()) }
                            {}
                            (category.label())
                        }
                        span { (amount.currency) " " (amount) }
                    }
                }
            }
        }
    }
}

/// `currency` must be the effective display currency.
fn history_card(state: &PageState, currency: &CurrencyCode) -> Markup {
    html! {
        section class={ (CARD_STYLE) " p-12 flex flex-col" }
        {
            h2 class={ (SECTION_HEADING_STYLE) " mb-10" } { "Recent History" }

            @if state.expenses.is_empty() {
                p class="text-sm font-bold text-slate-400"
                {
                    "No expenses yet. Add one with the form above."
                }
            } @else {
                ul id="expense-list" class="flex-1 overflow-y-auto pr-4 space-y-4"
                {
                    @for expense in &state.expenses {
                        (expense_row(expense, &state.rates, currency))
                    }
                }
            }
        }
    }
}

fn expense_row(expense: &Expense, rates: &RateTable, currency: &CurrencyCode) -> Markup {
    let amount = expense
        .amount
        .value()
        .map(|amount| convert(amount, rates, currency));
    let delete_url = format!(
        "{}?currency={currency}",
        format_endpoint(endpoints::EXPENSE, expense.id)
    );

    html! {
        li
            data-expense-id=(expense.id)
            class="flex items-center justify-between p-6 rounded-[2rem] border \
                border-slate-50 dark:border-slate-700 hover:border-indigo-100 transition-all group"
        {
            div
            {
                p class="font-bold text-base leading-none mb-1" { (expense.description) }
                p class="text-[10px] text-slate-400 font-bold uppercase tracking-widest"
                {
                    span class={ "px-2 py-1 rounded " (expense.category.badge_style()) }
                    {
                        (expense.category)
                    }
                    " • " (expense.date)
                }
            }

            div class="flex items-center gap-4"
            {
                (row_amount(amount.as_ref()))

                div class="flex gap-1 opacity-0 group-hover:opacity-100 focus-within:opacity-100"
                {
                    a
                        href=(edit_url(expense.id))
                        aria-label="Edit"
                        class={ (BUTTON_ICON_STYLE) " hover:text-indigo-600" }
                    {
                        "Edit"
                    }

                    button
                        type="button"
                        hx-delete=(delete_url)
                        hx-confirm="Are you sure you want to delete this expense?"
                        hx-target-error="#alert-container"
                        aria-label="Delete"
                        class={ (BUTTON_ICON_STYLE) " hover:text-rose-600" }
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

fn row_amount(amount: Option<&DisplayAmount>) -> Markup {
    match amount {
        Some(amount) => html! {
            span class="font-black text-sm" { (amount.currency) " " (amount) }
        },
        None => html! {
            span class="font-black text-sm text-rose-500" title="The stored amount is not a number"
            {
                "Invalid amount"
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        currency::CurrencyCode,
        expense::{Amount, Category, Expense},
        page_state::{PageState, Transition},
        test_utils::{
            assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
            assert_hx_endpoint, assert_valid_html, must_get_form,
        },
    };

    use super::expense_page_view;

    fn expense(id: i64, amount: Amount, category: Category) -> Expense {
        Expense {
            id,
            description: format!("expense #{id}"),
            amount,
            category,
            date: "2026-10-01".to_owned(),
        }
    }

    fn render(state: &PageState) -> Html {
        let markup = expense_page_view(state, date!(2026 - 10 - 19)).into_string();
        Html::parse_document(&markup)
    }

    #[test]
    fn new_expense_form_posts_to_create_endpoint() {
        let document = render(&PageState::default());
        assert_valid_html(&document);

        let form = must_get_form(&document, "#expense-form");
        assert_hx_endpoint(&form, "/api/expenses", "hx-post");
        assert_form_input(&form, "description", "text");
        assert_form_input(&form, "amount", "number");
        assert_form_input_with_value(&form, "date", "date", "2026-10-19");
        assert_form_input_with_value(&form, "currency", "hidden", "USD");
        assert_form_submit_button_with_text(&form, "Confirm Entry");
    }

    #[test]
    fn edit_form_puts_to_expense_endpoint() {
        let state = PageState::default()
            .apply(Transition::ExpensesLoaded(vec![expense(
                3,
                Amount::new(20.0),
                Category::Utilities,
            )]))
            .apply(Transition::EditStarted(3));

        let document = render(&state);

        let form = must_get_form(&document, "#expense-form");
        assert_hx_endpoint(&form, "/api/expenses/3", "hx-put");
        assert_form_input_with_value(&form, "description", "text", "expense #3");
        assert_form_input_with_value(&form, "amount", "number", "20.00");
        assert_form_input_with_value(&form, "date", "date", "2026-10-01");
        assert_form_submit_button_with_text(&form, "Update Record");
        let selected = form
            .select(&Selector::parse("select[name=category] option[selected]").unwrap())
            .next()
            .expect("no selected category");
        assert_eq!(selected.value().attr("value"), Some("Utilities"));
    }

    #[test]
    fn empty_list_shows_empty_state_without_chart() {
        let document = render(&PageState::default());

        let text = document.root_element().text().collect::<String>();
        assert!(text.contains("No expenses yet"));
        assert!(
            document
                .select(&Selector::parse("#category-chart").unwrap())
                .next()
                .is_none()
        );
    }

    #[test]
    fn rows_show_converted_amounts_and_actions() {
        let eur: CurrencyCode = "EUR".parse().unwrap();
        let state = PageState::default()
            .apply(Transition::ExpensesLoaded(vec![
                expense(1, Amount::new(100.0), Category::Food),
                expense(2, Amount::malformed(), Category::Other),
            ]))
            .apply(Transition::CurrencySelected(eur));

        let document = render(&state);
        assert_valid_html(&document);

        let rows: Vec<_> = document
            .select(&Selector::parse("#expense-list li").unwrap())
            .collect();
        assert_eq!(rows.len(), 2);

        let first = rows[0].text().collect::<String>();
        assert!(first.contains("EUR 92.00"), "got {first:?}");
        let second = rows[1].text().collect::<String>();
        assert!(second.contains("Invalid amount"), "got {second:?}");

        let delete = rows[0]
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("no delete button");
        assert_eq!(
            delete.value().attr("hx-delete"),
            Some("/api/expenses/1?currency=EUR")
        );
        let edit = rows[0]
            .select(&Selector::parse("a[href]").unwrap())
            .next()
            .expect("no edit link");
        assert_eq!(edit.value().attr("href"), Some("/?edit=1"));

        assert!(
            document
                .select(&Selector::parse("#category-chart").unwrap())
                .next()
                .is_some()
        );
    }

    #[test]
    fn unknown_display_currency_uses_canonical_everywhere() {
        let state = PageState::default()
            .apply(Transition::ExpensesLoaded(vec![expense(
                1,
                Amount::new(40.0),
                Category::Food,
            )]))
            .apply(Transition::CurrencySelected("GBP".parse().unwrap()));

        let document = render(&state);

        let row = document
            .select(&Selector::parse("#expense-list li").unwrap())
            .next()
            .expect("no expense row");
        let text = row.text().collect::<String>();
        assert!(text.contains("USD 40.00"), "got {text:?}");

        let delete = row
            .select(&Selector::parse("button[hx-delete]").unwrap())
            .next()
            .expect("no delete button");
        assert_eq!(
            delete.value().attr("hx-delete"),
            Some("/api/expenses/1?currency=USD")
        );

        let form = must_get_form(&document, "#expense-form");
        assert_form_input_with_value(&form, "currency", "hidden", "USD");
    }

    #[test]
    fn currency_selector_marks_display_currency() {
        let state = PageState::default()
            .apply(Transition::CurrencySelected("INR".parse().unwrap()));

        let document = render(&state);

        let selected = document
            .select(&Selector::parse("select[name=currency] option[selected]").unwrap())
            .next()
            .expect("no selected currency");
        assert_eq!(selected.value().attr("value"), Some("INR"));
        let text = selected.text().collect::<String>();
        assert!(text.contains('₹'));
    }
}
