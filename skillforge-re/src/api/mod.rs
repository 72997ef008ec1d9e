//! HTTP API handlers

pub mod alerts;
pub mod courses;
pub mod health;
pub mod recommendations;
pub mod settings;

pub use alerts::alert_routes;
pub use courses::course_routes;
pub use health::health_routes;
pub use recommendations::recommendation_routes;
pub use settings::settings_routes;
