//! The category breakdown doughnut chart.
//!
//! The chart is an ECharts configuration built with charming and initialised
//! by a small script once the page has loaded.

use charming::{
    Chart,
    element::{Color, JsFunction, Label, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    currency::CurrencyCode, expense::Category, html::HeadElement, view_model::CategoryBreakdown,
};

/// The HTML element ID of the chart container.
pub const CATEGORY_CHART_ID: &str = "category-chart";

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// Build a doughnut chart with one slice per category.
///
/// Slices keep the category colours and order so that the chart matches the
/// legend next to it.
pub fn category_breakdown_chart(breakdown: &CategoryBreakdown) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|(category, amount)| (round_to_cents(amount.value), category.label()))
        .collect();

    Chart::new()
        .color(
            Category::ALL
                .into_iter()
                .map(|category| Color::from(category.color()))
                .collect(),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter(breakdown.currency())),
        )
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["70%", "85%"])
                .label(Label::new().show(false))
                .data(data),
        )
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

fn currency_formatter(currency: &CurrencyCode) -> JsFunction {
    JsFunction::new_with_args(
        "number",
        &format!(
            "const currencyFormatter = new Intl.NumberFormat('en-US', {{
                  style: 'currency',
                  currency: '{currency}'
                }});
                return currencyFormatter.format(number);"
        ),
    )
}

/// The container the chart is drawn into.
pub fn chart_container() -> Markup {
    html!(
        div
            id=(CATEGORY_CHART_ID)
            class="w-full max-w-[280px] h-[280px]"
        {}
    )
}

/// The scripts that load ECharts and draw `chart` into [chart_container].
pub fn chart_scripts(chart: &Chart) -> [HeadElement; 2] {
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{CATEGORY_CHART_ID}");
            const chart = echarts.init(chartDom);
            chart.setOption({chart});

            window.addEventListener('resize', chart.resize);
        }});"#
    );

    [
        HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
        HeadElement::ScriptSource(PreEscaped(script)),
    ]
}
