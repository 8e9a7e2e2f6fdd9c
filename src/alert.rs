//! Error alerts shown to the user after a failed form submission or delete.
//!
//! Alerts are rendered as HTML fragments that htmx swaps into the
//! `#alert-container` element of the page.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::{Markup, html};

const ALERT_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
    dark:bg-gray-800 dark:text-red-400";

/// A message shown at the bottom of the page when something went wrong.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    /// The headline of the alert.
    pub message: String,
    /// Extra information, may be empty.
    pub details: String,
}

impl Alert {
    /// Create an error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        html! {
            div
                class=(ALERT_STYLE)
                role="alert"
            {
                div class="flex justify-between items-start gap-4"
                {
                    div
                    {
                        span class="font-bold" { (self.message) }

                        @if !self.details.is_empty() {
                            " " (self.details)
                        }
                    }

                    button
                        type="button"
                        aria-label="Dismiss"
                        class="font-bold cursor-pointer"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "×"
                    }
                }
            }
        }
    }

    /// Render the alert as a response with `status_code`.
    ///
    /// htmx only swaps responses with an error status into the target given
    /// by `hx-target-error`, so `status_code` should be a 4xx or 5xx status.
    pub fn into_response(self, status_code: StatusCode) -> Response {
        (status_code, Html(self.into_html().into_string())).into_response()
    }
}
