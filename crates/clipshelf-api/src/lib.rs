//! HTTP surface for clipshelf.
//!
//! Handlers are thin: auth and routing here, the actual ingestion stages in
//! [`services`], domain logic in the library crates. Everything reachable
//! from a request returns `Result<_, error::HttpAppError>` so failures render
//! as consistent JSON error bodies.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod services;
pub mod setup;
pub mod state;
