#![allow(missing_docs)]

pub(crate) mod fakes;
pub(crate) mod html;

pub(crate) use fakes::{FakeExpenseBackend, FakeRateSource};
pub(crate) use html::{
    assert_form_input, assert_form_input_with_value, assert_form_submit_button_with_text,
    assert_hx_endpoint, assert_hx_redirect, assert_valid_html, must_get_form, parse_html_document,
    parse_html_fragment,
};
