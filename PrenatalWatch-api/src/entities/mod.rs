// Public entities for the PrenatalWatch API
// This module contains the JSON shapes exchanged with the dashboard

// Error responses shared by every handler
pub mod common;

// Conversions from domain entities to public entities
pub mod conversions;

pub mod clinical;
pub mod medication;
pub mod report;
pub mod summary;

pub use common::ErrorResponse;
