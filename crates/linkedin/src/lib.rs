//! LinkedIn publisher adapter.
//!
//! Implements the `pilot_core::publish::Publisher` contract against the
//! UGC posts API. The scheduler only ever sees the trait; everything
//! platform-specific (payload shape, auth header, response parsing) stays
//! in this crate.

pub mod client;

pub use client::{LinkedInClient, LinkedInConfig};
