mod app_context;
mod cli;
mod health;
mod http;
mod logging;
mod map;
mod sessions;
mod storage;

use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();
    logging::init(&args);

    let catalog = match map::catalog::load(&args.locations) {
        Ok(catalog) if !catalog.is_empty() => catalog,
        Ok(_) => {
            tracing::error!(path = %args.locations.display(), "Location catalog is empty.");
            return ExitCode::FAILURE;
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to load the location catalog.");
            return ExitCode::FAILURE;
        }
    };
    let app_context = app_context::init(catalog);
    let router = crate::http::router::new(&args, app_context);

    let listener = match tokio::net::TcpListener::bind(args.listen_address).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!(address = %args.listen_address, error = %err, "Failed to bind.");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(address = %args.listen_address, "Listening.");
    if let Err(err) = axum::serve(listener, router).await {
        tracing::error!(error = %err, "Server stopped with an error.");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
