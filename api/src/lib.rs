//! The Matsight material recognition API

pub mod args;
pub mod conf;
pub mod detect;
pub mod models;
pub mod routes;
pub mod utils;

pub use conf::Conf;

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use axum::http::Method;
use tower_http::cors::CorsLayer;
use tracing::{Level, event};

use crate::utils::AppState;

/// Set a fallback that returns a 404
async fn disable_fallback() -> axum::http::StatusCode {
    axum::http::StatusCode::NOT_FOUND
}

/// Build the axum app
///
/// # Arguments
///
/// * `state` - The state to share across all routes
/// * `conf` - The Matsight config
pub fn build_app(state: AppState, conf: &Conf) -> Router {
    use axum::extract::DefaultBodyLimit;
    use axum::http::Request;
    use axum::http::header::{HeaderName, HeaderValue};
    use axum::response::Response;
    use routes::{basic, calculations, detection, storage};
    use std::time::Duration;
    use tower_http::set_header::SetResponseHeaderLayer;
    use tower_http::trace::{DefaultMakeSpan, TraceLayer};
    use tracing::Span;

    // build an axum router with the fallback disabled
    let mut app = Router::new().fallback(disable_fallback);
    // add all of our routes
    app = basic::mount(app);
    app = calculations::mount(app);
    app = detection::mount(app);
    app = storage::mount(app);
    // build cors middleware for our app
    let cors = if conf.matsight.cors.insecure {
        CorsLayer::permissive()
    } else {
        // start building our cors settings and allow all methods we use
        let cors = CorsLayer::new().allow_methods([Method::GET, Method::POST]);
        // cast the domains we want to add to the correct type
        let origins = conf
            .matsight
            .cors
            .domains
            .iter()
            .map(|domain| domain.parse())
            .collect::<Result<Vec<HeaderValue>, _>>()
            .expect("Failed to parse CORS domains");
        cors.allow_origin(origins)
    };
    // add middleware to our app
    let app = app
        .layer(DefaultBodyLimit::disable())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(|req: &Request<_>, span: &Span| {
                    // get our uri as a str
                    let url_and_query = match req.uri().path_and_query() {
                        Some(path_and_query) => path_and_query.as_str(),
                        None => req.uri().path(),
                    };
                    event!(
                        parent: span,
                        Level::INFO,
                        url = req.uri().path(),
                        uri = url_and_query,
                        msg = "Starting Request"
                    );
                })
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    // get our status code
                    let code = response.status();
                    event!(
                        parent: span,
                        Level::INFO,
                        code = code.as_u16(),
                        status = code.as_str(),
                        latency = latency.as_millis(),
                        msg = "Responding to Request"
                    );
                }),
        )
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("matsight-version"),
            HeaderValue::from_str(env!("CARGO_PKG_VERSION"))
                .expect("Matsight version is not a valid header value"),
        ));
    app.with_state(state)
}

/// Launches the Matsight API using axum
///
/// # Panics
///
/// Will panic if the configured interface cannot be parsed.
///
/// # Arguments
///
/// * `config` - The Matsight config
pub async fn axum(config: Conf) {
    // setup shared objects once; every handler borrows them through the state
    let shared = utils::Shared::new(config.clone()).await;
    let state = AppState::new(shared);
    // build our app
    let app = build_app(state, &config);
    // parse our interface addr
    let bind_addr: IpAddr = config
        .matsight
        .interface
        .parse()
        .expect("Failed to parse interface addr");
    // get the address and port to bind too
    let addr = SocketAddr::new(bind_addr, config.matsight.port);
    // track how many bind attempts we have tried
    let mut attempts = 0;
    // bind and start handling requests
    loop {
        match tokio::net::TcpListener::bind(&addr).await {
            Ok(listener) => {
                event!(Level::INFO, addr = %addr, msg = "Serving");
                // start handling requests
                if let Err(error) = axum::serve(listener, app.clone()).await {
                    event!(Level::ERROR, error = %error, msg = "Server exited");
                }
                break;
            }
            Err(error) => {
                event!(
                    Level::ERROR,
                    addr = %addr,
                    error = %error,
                    msg = "Failed to bind server"
                );
            }
        }
        // increment our attempt count
        attempts += 1;
        // check if we reached our attempt limit
        if attempts >= 10 {
            event!(Level::ERROR, msg = "Failed to bind server in 10 attempts");
            break;
        }
        // sleep for 3 seconds between attempts
        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
    }
}
