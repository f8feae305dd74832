use std::collections::HashMap;

use axum::{
    extract::{Form, OriginalUri, Path, State},
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use showcase_core::{FormData, Location};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod dispatcher;
pub mod error;
pub mod frontend;
pub mod frontends;
pub mod render;
pub mod state;

pub use dispatcher::{Dispatcher, Page};
pub use error::AppError;
pub use state::{AppState, Backends};

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/{frontend}", get(show).post(submit))
        .route("/{frontend}/{*location}", get(show).post(submit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Redirect {
    Redirect::to("/destinations/home")
}

async fn health() -> &'static str {
    "ok"
}

async fn show(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    OriginalUri(uri): OriginalUri,
) -> Result<Response, AppError> {
    navigate(state, Method::GET, params, uri, FormData::default()).await
}

async fn submit(
    State(state): State<AppState>,
    Path(params): Path<HashMap<String, String>>,
    OriginalUri(uri): OriginalUri,
    Form(fields): Form<HashMap<String, String>>,
) -> Result<Response, AppError> {
    navigate(state, Method::POST, params, uri, FormData::new(fields)).await
}

/// The location part of `/{frontend}/{location}?{query}`, still percent-encoded.
fn raw_location(uri: &Uri) -> String {
    let path = uri.path().trim_start_matches('/');
    let mut raw = path.split_once('/').map(|(_, rest)| rest).unwrap_or_default().to_string();
    if let Some(query) = uri.query() {
        raw.push('?');
        raw.push_str(query);
    }
    raw
}

async fn navigate(
    state: AppState,
    method: Method,
    params: HashMap<String, String>,
    uri: Uri,
    form: FormData,
) -> Result<Response, AppError> {
    let name = params.get("frontend").map(String::as_str).unwrap_or_default();
    let dispatcher = state
        .frontend(name)
        .ok_or_else(|| AppError::NotFoundError(format!("No front-end named {}", name)))?;

    // `Path` has already decoded `{*location}`; parse the raw form so it is decoded once
    let raw = raw_location(&uri);

    let response = match dispatcher.dispatch(method, Location::parse(&raw), form).await {
        Page::Show(view) => {
            let banner = dispatcher.banner();
            Html(state.renderer.render(dispatcher.name(), &view, banner.as_ref())?).into_response()
        }
        Page::Redirect(target) => Redirect::to(&format!("/{}/{}", dispatcher.name(), target.to_path())).into_response(),
        Page::Superseded => StatusCode::NO_CONTENT.into_response(),
    };
    Ok(response)
}
