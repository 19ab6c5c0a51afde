pub trait InstanceAddressResolver {
    /// Resolves the instance's current public address, or `None` when the
    /// instance has no public address assigned yet.
    fn public_ip(&self, instance_id: &str) -> Result<Option<String>, String>;
}
