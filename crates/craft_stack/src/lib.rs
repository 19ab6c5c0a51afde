//! Deploy-time topology assembly for the spot-hosted game server.
//!
//! This crate owns the declarative resource graph: a network, a spot-priced
//! single-instance scaling group, a container cluster/service bound to it, a
//! persistent volume with its boot-time attach/mount sequence, and an optional
//! launch-notification DNS block. Everything here is data assembly evaluated
//! once at synth time; the rendered template is consumed by an external
//! provisioning engine and there is no runtime logic.

pub mod cluster;
pub mod compute;
pub mod dns;
pub mod network;
pub mod params;
pub mod storage;
pub mod synth;
pub mod template;
