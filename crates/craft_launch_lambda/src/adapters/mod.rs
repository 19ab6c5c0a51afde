pub mod dns_update;
pub mod instance_lookup;
