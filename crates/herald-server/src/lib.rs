pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;
pub mod state;

pub use config::AppConfig;
pub use server::{API_BASE, HeraldServer, ServerBuilder, build_app};
pub use state::AppState;
