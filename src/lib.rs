//! Folio application library
//!
//! The books module and the process-wide [`AppContext`] that wires it to the
//! HTTP server and the database.

pub mod app;
pub mod modules;

pub use app::AppContext;
pub use modules::*;
