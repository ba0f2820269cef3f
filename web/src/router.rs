use crate::{controller::health_check_controller, socket::handler, AppState};
use axum::{response::Html, routing::get, Router};
use tower_http::services::ServeFile;

/// The built-in chat page, compiled into the binary so `GET /` works from any
/// working directory.
pub(crate) const CHAT_PAGE: &str = include_str!("../static/index.html");

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(socket_routes(app_state.clone()))
        .merge(static_routes(&app_state))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn socket_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/socket", get(handler::socket_handler))
        .with_state(app_state)
}

// The chat page is the only static asset; nothing else under "/" is served.
pub fn static_routes(app_state: &AppState) -> Router {
    match app_state.config.static_page() {
        Some(path) => Router::new().route_service("/", ServeFile::new(path)),
        None => Router::new().route("/", get(chat_page)),
    }
}

async fn chat_page() -> Html<&'static str> {
    Html(CHAT_PAGE)
}
