//! Folio Kernel Library
//!
//! Ordered page content for an authenticated audience: content and chart
//! repositories, the page aggregator that merges them, and the admin API.
//! The main entry point for running the server is the `folio` binary.

pub mod bootstrap;
pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod page;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

pub use config::Config;
pub use state::AppState;
