pub mod health;
pub mod routes;

pub use routes::api_routes;
