use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use train_search::config::{Backend, ServerConfig};
use train_search::irctc::IrctcScraper;
use train_search::railapi::RailApiClient;
use train_search::web::{AppState, create_router};

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "train_search=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "bad configuration");
            return ExitCode::FAILURE;
        }
    };

    let state = match config.backend {
        Backend::Scrape => match IrctcScraper::new(config.irctc.clone()) {
            Ok(scraper) => {
                info!(webdriver = %config.irctc.webdriver_url, "using browser backend");
                AppState::scrape(scraper)
            }
            Err(e) => {
                error!(error = %e, "failed to create WebDriver client");
                return ExitCode::FAILURE;
            }
        },
        Backend::Api => match RailApiClient::new(config.rail_api.clone()) {
            Ok(client) => {
                info!(base_url = %config.rail_api.base_url, "using rail API backend");
                AppState::api(client)
            }
            Err(e) => {
                error!(error = %e, "failed to create rail API client");
                return ExitCode::FAILURE;
            }
        },
    };

    let app = create_router(state);

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };
    info!("Train search listening on http://{addr}");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
