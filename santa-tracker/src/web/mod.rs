//! HTTP adapter for the tracker.
//!
//! Exposes load / all / resolve / visited as JSON endpoints so a map
//! front-end can poll Santa's position.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
