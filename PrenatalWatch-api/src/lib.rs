// PrenatalWatch-api lib.rs
//
// HTTP surface of the PrenatalWatch dashboard: router, handlers, public
// entities and OpenAPI documentation.

pub mod api;
pub mod entities;
pub mod openapi;

pub use api::create_application;
