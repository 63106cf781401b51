//! Periodic scheduler for the publishing pipeline.
//!
//! One background task per process, two passes per tick:
//!
//! 1. assignment: approved posts with no slot get one from the
//!    [`cadence::CadenceStrategy`];
//! 2. publish: due scheduled posts are claimed and pushed through the
//!    `Publisher` adapter, with per-post failure isolation and a bounded
//!    retry budget.
//!
//! Multiple scheduler instances may run concurrently; every transition is
//! an atomic conditional update in `pilot-db`, so a lost race is a skipped
//! post, never a double publish.

pub mod cadence;
pub mod config;
pub mod tick;

pub use cadence::{CadenceStrategy, FixedLeadCadence};
pub use config::SchedulerConfig;
pub use tick::{Scheduler, TickSummary};
