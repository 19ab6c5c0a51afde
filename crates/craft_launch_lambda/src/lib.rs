//! AWS-oriented adapters and handlers for the launch-notification hook.
//!
//! This crate owns runtime integration details (the Lambda handler, the
//! instance-description query, and the dynamic-DNS HTTP call) behind adapter
//! traits, so the handler itself stays pure and mockable. Contract and
//! provider rules live in `crates/craft_launch_core`.

pub mod adapters;
pub mod handlers;
