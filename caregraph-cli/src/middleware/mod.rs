//! Node middleware for the turn graph.
//!
//! Re-exports [`LoggingMiddleware`].

mod logging;

pub use logging::LoggingMiddleware;
