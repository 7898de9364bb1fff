/// OIDC Identity Cache
///
/// Stores the id tokens users submit after logging in and serves the
/// display names resolved from their claims, one subject at a time or in
/// batches.

pub mod api;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod identity;
pub mod server;

pub use context::AppContext;
