//! HTTP API handlers for boothwall-ui

pub mod health;
pub mod hook;
pub mod session;
pub mod slots;

pub use health::health_routes;
pub use hook::hook;
pub use session::{reset_session, session_asset, session_status, start_session};
pub use slots::{new_photo, slot_state};
