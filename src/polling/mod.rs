//! Sequential polling helpers.
//!
//! # Data Flow
//! ```text
//! faucet handler
//!     → Poller::wait_until_some (receipt / signature confirmation)
//!     → Poller::wait_for_balance (funds landed?)
//!     → response with confirmed balance
//! ```
//!
//! # Design Decisions
//! - One check in flight at a time; the delay only separates attempts
//! - The only bound is the attempt counter, never wall-clock time
//! - Check failures stop the loop immediately, they are not retried

pub mod balance;

pub use balance::{InvalidPollSettings, PollError, PollSettings, Poller};
