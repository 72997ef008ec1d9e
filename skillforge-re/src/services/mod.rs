//! Outbound service clients

pub mod advisor_client;

pub use advisor_client::{AdvisorClient, AdvisorError};
