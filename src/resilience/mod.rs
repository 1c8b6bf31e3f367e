//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Node read (nonce, balance, estimate):
//!     → transport timeout (node client) surfaces as NodeUnreachable
//!     → retries.rs (orchestrator policy, only for NodeUnreachable)
//!     → backoff.rs (delay between attempts)
//! ```
//!
//! # Design Decisions
//! - Rejections are answers, not faults: never retried
//! - Broadcast is never retried (not idempotent)
//! - Receipt polling has its own bounded loop and does not use this module

pub mod backoff;
pub mod retries;
