// Infrastructure layer (shared components)
pub mod config;
pub mod db;
pub mod error;

// Application layer
pub mod api;
pub mod server;
