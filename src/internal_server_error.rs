use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// The route handler for the page shown after an unexpected error.
pub async fn get_internal_server_error_page() -> Response {
    internal_server_error_response(
        "Something went wrong",
        "Try again later or check the server logs.",
    )
}

/// A full page describing an internal server error with a 500 status.
pub fn internal_server_error_response(description: &str, fix: &str) -> Response {
    let page = error_view("Internal Server Error", "500", description, fix);

    (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
}
