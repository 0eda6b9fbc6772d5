// Route exports
pub mod errors;
pub mod matches;

use actix_web::web;

pub use errors::{handle_json_payload_error, ApiError};
pub use matches::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .configure(matches::configure),
    );
}
