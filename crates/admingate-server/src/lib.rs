pub mod cache;
pub mod config;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod server;

pub use config::AppConfig;
pub use server::{AdmingateServer, AppState, ServerBuilder, build_app};
