#[path = "config/mod.rs"]
pub mod config_mod;
pub use config_mod as config;
pub mod downloads;
pub mod http_client;
