mod settings;

pub use settings::{DatabaseConfig, RunMode, ServerConfig, Settings};
