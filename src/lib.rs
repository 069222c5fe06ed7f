use config::Config;
use routes::notify::NotifyCoordinator;

pub mod cache;
pub mod common;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod router;
pub mod utils;

pub mod routes;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub coordinator: NotifyCoordinator,
}
