//! Wallet-custody service integration.
//!
//! # Security Constraints
//! - Credentials ONLY from environment variables
//! - Never log credentials or request headers

pub mod client;

pub use client::{CustodyClient, CustodyError, CustodyResult};
