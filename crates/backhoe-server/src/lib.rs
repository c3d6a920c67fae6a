//! Backhoe HTTP server.
//!
//! Wires the core library and the mail transport into a running Axum
//! server. Serves the rendered pages at `/`, the coverage map at
//! `/map.svg`, and the rental request mail endpoint under `/api`.

pub mod config;
pub mod error;
pub mod geo;
pub mod routes;
pub mod state;
