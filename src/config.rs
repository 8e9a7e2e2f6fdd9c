//! Settings for reaching the expense API and the exchange rate feed.

use std::time::Duration;

use reqwest::Url;

use crate::Error;

/// The environment variable that overrides the expense API base URL.
pub const EXPENSE_API_URL_ENV: &str = "EXPENSE_API_URL";

/// The expense API used when [EXPENSE_API_URL_ENV] is not set.
pub const DEFAULT_EXPENSE_API_URL: &str = "http://127.0.0.1:8000/api/expenses/";

/// How long to wait for the expense API or rate feed before giving up.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the app finds its collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// The base URL of the expense collection, always ending in '/'.
    pub expense_api_url: Url,
    /// The URL of the latest rates relative to the canonical currency.
    pub rates_url: Url,
    /// The timeout applied to every outgoing request.
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Validate the URLs for the expense API and the rate feed.
    ///
    /// A trailing slash is added to `expense_api_url` if it is missing so that
    /// expense IDs can be joined onto it.
    ///
    /// # Errors
    /// Returns [Error::InvalidConfig] if either URL cannot be parsed or is not
    /// an HTTP(S) URL.
    pub fn new(
        expense_api_url: &str,
        rates_url: &str,
        request_timeout: Duration,
    ) -> Result<Self, Error> {
        let expense_api_url = if expense_api_url.ends_with('/') {
            expense_api_url.to_owned()
        } else {
            format!("{expense_api_url}/")
        };

        Ok(Self {
            expense_api_url: parse_http_url(&expense_api_url)?,
            rates_url: parse_http_url(rates_url)?,
            request_timeout,
        })
    }
}

fn parse_http_url(url: &str) -> Result<Url, Error> {
    let parsed =
        Url::parse(url).map_err(|error| Error::InvalidConfig(format!("invalid URL {url:?}: {error}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(Error::InvalidConfig(format!(
            "unsupported scheme {scheme:?} in URL {url:?}"
        ))),
    }
}
