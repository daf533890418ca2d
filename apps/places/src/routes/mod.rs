mod groups;
mod places;

use axum::Router;
use crate::app::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(places::router())
        .merge(groups::router())
}
