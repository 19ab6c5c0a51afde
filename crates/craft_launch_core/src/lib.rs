//! Shared launch-notification domain primitives.
//!
//! This crate owns the inbound notification contract, the dynamic-DNS
//! provider/update-URL rules, and the update outcome taxonomy. It
//! intentionally excludes AWS SDK and Lambda runtime concerns; those live in
//! `crates/craft_launch_lambda`.

pub mod contract;
pub mod ddns;
pub mod disposition;
