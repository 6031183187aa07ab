//! HTTP API.
//!
//! The provider posts deliveries to `/`; the same path answers health checks.

mod receiver;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    receiver::router()
}
