//! Application configuration

mod app_config;

pub use app_config::{AppConfig, AssistantConfig, RetrievalConfig, SeedConfig, ServerConfig};
