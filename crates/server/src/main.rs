use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use dispatcher::{ControllerRegistry, Dispatcher, Renderer, Reply, RequestContext};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod identity;
mod notes;
mod views;

use config::{load_settings, Settings};
use identity::HeaderIdentity;
use notes::{NoteBook, NotesController};
use views::FileViews;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

struct AppState {
    dispatcher: Dispatcher,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    let dispatcher = build_dispatcher(&settings, NoteBook::default())?;
    info!(
        controllers = ?dispatcher.registry().names(),
        debug = settings.debug,
        views_dir = %settings.views_dir,
        "dispatcher ready"
    );

    let app = build_router(Arc::new(AppState { dispatcher }), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn build_dispatcher(settings: &Settings, book: NoteBook) -> anyhow::Result<Dispatcher> {
    let editors: Arc<[String]> = settings.editors.clone().into();
    let registry = ControllerRegistry::new().with(notes::CONTROLLER_NAME, move |base| {
        Box::new(NotesController::bind(base, book.clone(), Arc::clone(&editors)))
    })?;

    let renderer = Renderer::new(Arc::new(FileViews::new(&settings.views_dir)))
        .with_fallback(settings.template_fallback());

    Ok(Dispatcher::new(registry, renderer)
        .with_identity(Arc::new(HeaderIdentity::from_settings(settings)))
        .with_config(settings.dispatcher_config()))
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .fallback(dispatch_request)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn dispatch_request(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    let mut request = RequestContext::new(method.as_str(), target);
    for (name, value) in &headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    if is_form(&headers) {
        request = request.with_form_body(&body);
    }

    into_response(state.dispatcher.dispatch(request).await)
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
}

fn into_response(reply: Reply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, reply.body).into_response();
    let headers = response.headers_mut();
    headers.remove(header::CONTENT_TYPE);

    if let Some(content_type) = reply.content_type {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    if let Some(location) = reply.location {
        match HeaderValue::from_str(&location) {
            Ok(value) => {
                headers.insert(header::LOCATION, value);
            }
            Err(_) => warn!(%location, "dropping unencodable redirect location"),
        }
    }
    if let Some(allow) = reply.allow.and_then(|allow| HeaderValue::from_str(&allow).ok()) {
        headers.insert(header::ALLOW, allow);
    }
    response
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
