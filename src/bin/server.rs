use std::{
    fs::OpenOptions,
    net::SocketAddr,
    process::ExitCode,
    sync::Arc,
    time::Duration,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_flow::{
    AppConfig, AppState, DEFAULT_EXPENSE_API_URL, DEFAULT_RATES_URL, EXPENSE_API_URL_ENV,
    build_router, graceful_shutdown,
};

/// The web server for ExpenseFlow.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The port to serve the app from.
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// The base URL of the expense API, e.g. "http://127.0.0.1:8000/api/expenses/".
    #[arg(long, env = EXPENSE_API_URL_ENV, default_value = DEFAULT_EXPENSE_API_URL)]
    expense_api_url: String,

    /// The URL of the latest exchange rates relative to USD.
    #[arg(long, env = "EXCHANGE_RATES_URL", default_value = DEFAULT_RATES_URL)]
    rates_url: String,

    /// How many seconds to wait for the expense API or rate feed.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    request_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging() {
        eprintln!("Could not set up logging: {error}");
        return ExitCode::FAILURE;
    }

    let config = match AppConfig::new(
        &args.expense_api_url,
        &args.rates_url,
        Duration::from_secs(args.request_timeout_secs),
    ) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let state = match AppState::new(&config) {
        Ok(state) => state,
        Err(error) => {
            tracing::error!("Could not create app state: {error}");
            return ExitCode::FAILURE;
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!(
        "Using expense API at {} and exchange rates from {}",
        config.expense_api_url,
        config.rates_url
    );
    tracing::info!("HTTP server listening on {}", addr);

    match axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Server stopped with an error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn setup_logging() -> std::io::Result<()> {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("expense_flow.log")?;

    let debug_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but the handlers log
        // their own errors.
        .on_failure(());

    router.layer(tracing_layer)
}
