//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::irctc::search_trains;
use crate::railapi::{RailApiError, RailApiQuery};

use super::dto::*;
use super::state::{ApiState, AppState, ScrapeState};

/// Example shown when `/search-get` is missing parameters.
const SEARCH_GET_EXAMPLE: &str = "/search-get?from=DEOS&to=LJN&date=27/05/2025";

/// Create the application router for whichever backend `state` carries.
pub fn create_router(state: AppState) -> Router {
    let search: Router = match state {
        AppState::Scrape(scrape) => Router::new()
            .route("/", get(scrape_index))
            .route("/search", post(scrape_search))
            .route("/search-get", get(scrape_search_get))
            .with_state(scrape),
        AppState::Api(api) => Router::new()
            .route("/", get(api_index))
            .route("/search", get(proxy_search_get).post(proxy_search_post))
            .with_state(api),
    };

    search
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Local::now().to_rfc3339(),
    })
}

/// Endpoint documentation for the browser backend.
async fn scrape_index() -> Json<Value> {
    Json(json!({
        "message": "IRCTC Train Search API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/search": {
                "method": "POST",
                "description": "Search for trains between stations",
                "parameters": {
                    "from_code": "Source station code (e.g., 'GKP')",
                    "to_code": "Destination station code (e.g., 'DEE')",
                    "journey_date": "Journey date in dd/mm/yyyy or dd-mm-yyyy format"
                },
                "example": {
                    "from_code": "DEOS",
                    "to_code": "LJN",
                    "journey_date": "27/05/2025"
                }
            },
            "/search-get": {
                "method": "GET",
                "description": "Search for trains using query parameters",
                "parameters": {
                    "from": "Source station code",
                    "to": "Destination station code",
                    "date": "Journey date"
                },
                "example": SEARCH_GET_EXAMPLE
            },
            "/health": {
                "method": "GET",
                "description": "Health check"
            }
        }
    }))
}

/// Endpoint documentation for the API backend.
async fn api_index() -> Json<Value> {
    Json(json!({
        "message": "Train Search API proxy",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "/search": {
                "method": "GET or POST",
                "description": "Search for trains with seat availability",
                "parameters": {
                    "src": "Source station code (e.g., 'NDLS')",
                    "dst": "Destination station code (e.g., 'BCT')",
                    "date": "Journey date in dd/mm/yyyy or dd-mm-yyyy format",
                    "device_id": "Optional device id forwarded upstream"
                },
                "example": "/search?src=NDLS&dst=BCT&date=27-05-2025"
            },
            "/health": {
                "method": "GET",
                "description": "Health check"
            }
        }
    }))
}

/// Browser search from a JSON body.
async fn scrape_search(
    State(state): State<ScrapeState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: ScrapeSearchBody = parse_json_object(&body)?;

    let mut missing = Vec::new();
    let from = required("from_code", req.from_code.as_deref(), &mut missing).to_uppercase();
    let to = required("to_code", req.to_code.as_deref(), &mut missing).to_uppercase();
    let date = required("journey_date", req.journey_date.as_deref(), &mut missing);
    if !missing.is_empty() {
        return Err(AppError::missing(&missing, None));
    }

    Ok(run_scrape(&state, &from, &to, &date).await)
}

/// Browser search from query parameters.
async fn scrape_search_get(
    State(state): State<ScrapeState>,
    Query(req): Query<ScrapeSearchQuery>,
) -> Result<Response, AppError> {
    let mut missing = Vec::new();
    let from = required("from", req.from.as_deref(), &mut missing).to_uppercase();
    let to = required("to", req.to.as_deref(), &mut missing).to_uppercase();
    let date = required("date", req.date.as_deref(), &mut missing);
    if !missing.is_empty() {
        return Err(AppError::missing(&missing, Some(SEARCH_GET_EXAMPLE)));
    }

    Ok(run_scrape(&state, &from, &to, &date).await)
}

/// Run the pipeline; failures come back as the envelope with a 500.
async fn run_scrape(state: &ScrapeState, from: &str, to: &str, date: &str) -> Response {
    let result = search_trains(state.scraper.as_ref(), from, to, date).await;
    let response = SearchResponse::from(result);

    if response.is_failure() {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
    } else {
        Json(response).into_response()
    }
}

async fn proxy_search_get(
    State(state): State<ApiState>,
    Query(params): Query<ProxySearchParams>,
) -> Result<Json<ProxySearchResponse>, AppError> {
    proxy_search(&state, params).await
}

async fn proxy_search_post(
    State(state): State<ApiState>,
    body: Bytes,
) -> Result<Json<ProxySearchResponse>, AppError> {
    let params: ProxySearchParams = parse_json_object(&body)?;
    proxy_search(&state, params).await
}

async fn proxy_search(
    state: &ApiState,
    params: ProxySearchParams,
) -> Result<Json<ProxySearchResponse>, AppError> {
    let mut missing = Vec::new();
    let src = required("src", params.src.as_deref(), &mut missing).to_uppercase();
    let dst = required("dst", params.dst.as_deref(), &mut missing).to_uppercase();
    let date = required("date", params.date.as_deref(), &mut missing);
    if !missing.is_empty() {
        return Err(AppError::missing(&missing, None));
    }

    let device_id = params
        .device_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    info!(%src, %dst, %date, "proxy search");
    let trains = state
        .client
        .search(&RailApiQuery {
            src: &src,
            dst: &dst,
            date: &date,
            device_id,
        })
        .await?;

    Ok(Json(ProxySearchResponse::new(src, dst, date, trains)))
}

/// Trimmed value of a required parameter; blank or absent values are
/// recorded in `missing`.
fn required(name: &'static str, value: Option<&str>, missing: &mut Vec<&'static str>) -> String {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        missing.push(name);
    }
    value.to_string()
}

/// Parse a request body that must be a non-empty JSON object.
fn parse_json_object<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    let no_data = || AppError::BadRequest {
        message: "No JSON data provided".to_string(),
        example: None,
    };

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, body = %String::from_utf8_lossy(body), "unparseable JSON body");
        no_data()
    })?;

    match &value {
        Value::Object(map) if !map.is_empty() => {}
        _ => return Err(no_data()),
    }

    serde_json::from_value(value).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
        example: None,
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest {
        message: String,
        example: Option<&'static str>,
    },
    BadGateway {
        message: String,
    },
    ServiceUnavailable {
        message: String,
    },
    Internal {
        message: String,
    },
}

impl AppError {
    /// 400 naming the missing parameters.
    fn missing(names: &[&str], example: Option<&'static str>) -> Self {
        AppError::BadRequest {
            message: format!("Missing required parameters: {}", names.join(", ")),
            example,
        }
    }
}

impl From<RailApiError> for AppError {
    fn from(e: RailApiError) -> Self {
        let message = e.to_string();
        match e {
            RailApiError::Network(_) => AppError::ServiceUnavailable { message },
            RailApiError::UpstreamStatus { .. } => AppError::BadGateway { message },
            _ => AppError::Internal { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, example) = match self {
            AppError::BadRequest { message, example } => {
                (StatusCode::BAD_REQUEST, message, example)
            }
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message, None),
            AppError::ServiceUnavailable { message } => {
                (StatusCode::SERVICE_UNAVAILABLE, message, None)
            }
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message, None),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            example,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, header};
    use tokio::net::TcpListener;
    use tower::ServiceExt;

    use super::*;
    use crate::irctc::fake::FakeScraper;
    use crate::irctc::{ScrapeError, TrainScraper};
    use crate::railapi::{RailApiClient, RailApiConfig};

    const RESULTS_PAGE: &str = r#"<html><body><app-train-avl-enq>
        <div class="ng-star-inserted">
          <div class="train-heading"><strong>VAISHALI EXP (12553)</strong></div>
          <div class="white-back no-pad">
            <span class="time">22:10 |</span>
            <span class="hidden-xs">DEOS | Tue, 27 May</span>
            <span class="time">05:30</span>
            <div class="remove-padding col-xs-4">
              <span class="Y">Y</span><span class="Y">N</span><span class="Y">N</span>
              <span class="Y">N</span><span class="Y">N</span><span class="Y">N</span>
              <span class="Y">Y</span>
            </div>
          </div>
          <div class="pre-avl"><strong>SL</strong></div>
        </div>
        </app-train-avl-enq></body></html>"#;

    fn scrape_app(fake: Arc<FakeScraper>) -> Router {
        let scraper: Arc<dyn TrainScraper> = fake;
        create_router(AppState::Scrape(ScrapeState { scraper }))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let app = scrape_app(Arc::new(FakeScraper::returning("")));
        let (status, body) = send(app, get_request("/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn index_documents_mounted_backend() {
        let app = scrape_app(Arc::new(FakeScraper::returning("")));
        let (status, body) = send(app, get_request("/")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["endpoints"]["/search-get"].is_object());
    }

    #[tokio::test]
    async fn post_search_normalizes_codes() {
        let fake = Arc::new(FakeScraper::returning(RESULTS_PAGE));
        let app = scrape_app(fake.clone());

        let (status, body) = send(
            app,
            post_json(
                "/search",
                r#"{"from_code": " deos ", "to_code": "ljn", "journey_date": "27/05/2025"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Found 1 trains");
        let train = &body["trains"][0];
        assert_eq!(train["train_number"], "12553");
        assert_eq!(train["arrival_date"], "28 May");
        assert_eq!(train["from_station_code"], "DEOS");
        assert_eq!(train["operating_days"], json!(["Mon", "Sun"]));

        let calls = fake.calls.lock().unwrap();
        assert_eq!(calls[0].from_code, "DEOS");
        assert_eq!(calls[0].to_code, "LJN");
    }

    #[tokio::test]
    async fn post_search_missing_params() {
        let fake = Arc::new(FakeScraper::returning(RESULTS_PAGE));
        let app = scrape_app(fake.clone());

        let (status, body) = send(
            app,
            post_json("/search", r#"{"from_code": "DEOS", "to_code": "  "}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "Missing required parameters: to_code, journey_date"})
        );
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn post_search_without_json() {
        for body in ["", "{}", "[1, 2]", "not json"] {
            let app = scrape_app(Arc::new(FakeScraper::returning("")));
            let (status, value) = send(app, post_json("/search", body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{body:?}");
            assert_eq!(value["error"], "No JSON data provided", "{body:?}");
        }
    }

    #[tokio::test]
    async fn get_search_missing_params_include_example() {
        let app = scrape_app(Arc::new(FakeScraper::returning("")));
        let (status, body) = send(app, get_request("/search-get?from=DEOS")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required parameters: to, date");
        assert_eq!(body["example"], SEARCH_GET_EXAMPLE);
    }

    #[tokio::test]
    async fn get_search_reports_no_trains() {
        let page = "<html><body><div>No trains available</div></body></html>";
        let app = scrape_app(Arc::new(FakeScraper::returning(page)));

        let (status, body) = send(
            app,
            get_request("/search-get?from=deos&to=ljn&date=27-05-2025"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "No trains available", "trains": []}));
    }

    #[tokio::test]
    async fn invalid_date_is_pipeline_error() {
        let fake = Arc::new(FakeScraper::returning(RESULTS_PAGE));
        let app = scrape_app(fake.clone());

        let (status, body) = send(
            app,
            get_request("/search-get?from=DEOS&to=LJN&date=2025-05-27"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({
                "error": "Date '2025-05-27' not in dd/mm/YYYY or dd-mm-YYYY format",
                "trains": []
            })
        );
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn scrape_failure_is_500_envelope() {
        let fake = Arc::new(FakeScraper::failing(ScrapeError::Timeout {
            what: "train results".into(),
            timeout: std::time::Duration::from_secs(20),
        }));
        let app = scrape_app(fake);

        let (status, body) = send(
            app,
            get_request("/search-get?from=DEOS&to=LJN&date=27/05/2025"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "timed out after 20s waiting for train results");
        assert_eq!(body["trains"], json!([]));
    }

    #[tokio::test]
    async fn cors_is_permissive() {
        let app = scrape_app(Arc::new(FakeScraper::returning("")));
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    // API backend, against an in-process upstream.

    async fn start_upstream(status: StatusCode, body: Value) -> SocketAddr {
        let app = Router::new().route(
            "/api/v1/trains/search",
            get(move || {
                let body = body.to_string();
                async move { (status, body) }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn api_app(addr: SocketAddr) -> Router {
        let client = RailApiClient::new(
            RailApiConfig::default()
                .with_base_url(format!("http://{addr}"))
                .with_timeout(5),
        )
        .unwrap();
        create_router(AppState::api(client))
    }

    fn upstream_trains() -> Value {
        json!({"data": {"trainList": [{
            "trainNumber": "12951",
            "trainName": "MUMBAI RAJDHANI",
            "departureTime": "16:55",
            "arrivalTime": "08:35",
            "distance": 1386,
            "availabilityCache": {"3A": {"availability": "AVAILABLE-12"}}
        }]}})
    }

    #[tokio::test]
    async fn api_get_search() {
        let addr = start_upstream(StatusCode::OK, upstream_trains()).await;

        let (status, body) = send(
            api_app(addr),
            get_request("/search?src=ndls&dst=bct&date=27-05-2025"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["src"], "NDLS");
        assert_eq!(body["dst"], "BCT");
        assert_eq!(body["date"], "27-05-2025");
        assert_eq!(body["train_count"], 1);
        assert_eq!(body["message"], "Found 1 trains");
        assert_eq!(body["trains"][0]["availability"], json!({"3A": "AVAILABLE-12"}));
    }

    #[tokio::test]
    async fn api_post_search_empty_list() {
        let addr = start_upstream(StatusCode::OK, json!({"data": {"trainList": []}})).await;

        let (status, body) = send(
            api_app(addr),
            post_json(
                "/search",
                r#"{"src": "NDLS", "dst": "BCT", "date": "27/05/2025", "device_id": "abc"}"#,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["train_count"], 0);
        assert_eq!(body["message"], "No trains available");
        assert_eq!(body["trains"], json!([]));
    }

    #[tokio::test]
    async fn api_missing_params() {
        let addr = start_upstream(StatusCode::OK, upstream_trains()).await;
        let (status, body) = send(api_app(addr), get_request("/search?dst=BCT")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Missing required parameters: src, date"}));
    }

    #[tokio::test]
    async fn api_upstream_status_is_bad_gateway() {
        let addr = start_upstream(StatusCode::FORBIDDEN, json!({"message": "blocked"})).await;
        let (status, _) = send(
            api_app(addr),
            get_request("/search?src=NDLS&dst=BCT&date=27-05-2025"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn api_unreachable_is_service_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) = send(
            api_app(addr),
            get_request("/search?src=NDLS&dst=BCT&date=27-05-2025"),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn api_invalid_date_is_internal() {
        let addr = start_upstream(StatusCode::OK, upstream_trains()).await;
        let (status, _) = send(
            api_app(addr),
            get_request("/search?src=NDLS&dst=BCT&date=tomorrow"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn api_backend_has_no_search_get() {
        let addr = start_upstream(StatusCode::OK, upstream_trains()).await;
        let response = api_app(addr)
            .oneshot(get_request("/search-get?from=A&to=B&date=27/05/2025"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
