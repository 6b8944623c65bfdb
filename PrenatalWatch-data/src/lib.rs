// PrenatalWatch Data
// This crate handles record storage and the repository collaborators the triage engine reads from

// Storage models
pub mod models;

// Repository implementations for data access
pub mod repository;

// Demo dataset for local runs
pub mod seed;
