pub mod admin;
pub mod manifest;
pub mod redirect;
pub mod segment;

pub use admin::{handle_health, handle_refresh_playlist};
pub use manifest::handle_manifest;
pub use redirect::{handle_bdix, handle_channel, handle_direct, handle_nvision};
pub use segment::handle_segment;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// `302 Found` to `location`.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}
