pub trait DnsUpdater {
    /// Issues a single GET to the prepared update URL.
    fn send_update(&self, url: &str) -> Result<(), String>;
}
