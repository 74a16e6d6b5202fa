//! HTTP routes.

pub mod api;
pub mod health;
pub mod oauth;
pub mod pages;

pub use api::{StatusResponse, TokenResponse, status_handler, token_handler};
pub use health::{HealthResponse, health};
pub use oauth::{CallbackQuery, callback_handler, error_redirect, install_handler};
pub use pages::{ErrorQuery, error_page_handler, home_handler};
