// PrenatalWatch Domain
// This crate contains the triage engine and the services the dashboard consumes

// Runtime settings
pub mod config;

// Error taxonomy shared by every service
pub mod errors;

// Domain entities
pub mod entities;

// Services that implement business logic
pub mod services;

// Health checks and system status
pub mod health;

// Testing utilities - only available with mock feature
#[cfg(any(test, feature = "mock"))]
pub mod testing;

// Re-export the session type, every repository call takes one
pub use prenatal_watch_data::models::{SessionContext, SessionRole};

pub use config::TriageConfig;
pub use errors::TriageError;
