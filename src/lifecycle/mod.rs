//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     trigger() → every subscribed server stops accepting → drains → exits
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → resolves the server's graceful-shutdown future
//! ```
//!
//! # Design Decisions
//! - Route tree is built before any listener is bound
//! - Programmatic shutdown (tests, embedding) and OS signals end up in the
//!   same graceful path

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
