//! HTTP surface for the freelance tracker.
//!
//! # Responsibility
//! - Map HTTP routes onto tracker use cases and background units.
//! - Wrap every entity response in the shared status envelope.
//!
//! # Invariants
//! - Store access runs on the blocking pool, one service call per lock.
//! - Handlers never wait on background work.

pub mod envelope;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use envelope::Envelope;
pub use error::ApiError;
pub use server::{router, serve};
pub use state::AppState;
