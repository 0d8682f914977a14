//! Bridge configuration.

use std::time::Duration;

/// Fixed subject line of every fallback notification.
pub const NOTIFICATION_SUBJECT: &str = "Anschaffungsvorschlag";

/// Configuration values for the submission bridge.
///
/// These are values issued out-of-band (credentials by the remote service
/// operator, addresses by the library); behavior is not configurable.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Caller id assigned by the remote service operator.
    pub caller_id: String,

    /// Shared secret assigned by the remote service operator.
    pub secret: String,

    /// Recipient of fallback notifications.
    pub fallback_address: String,

    /// Sender address on fallback notifications.
    pub from_address: String,

    /// ELi:SA account used by the forwarding endpoint when the caller
    /// names no target account.
    pub default_account: String,

    /// Timeout imposed on every remote call; the protocols themselves
    /// specify none.
    pub remote_timeout: Duration,
}

impl BridgeConfig {
    /// Create a config with the given credentials and addresses.
    pub fn new(
        caller_id: impl Into<String>,
        secret: impl Into<String>,
        fallback_address: impl Into<String>,
    ) -> Self {
        Self {
            caller_id: caller_id.into(),
            secret: secret.into(),
            fallback_address: fallback_address.into(),
            from_address: "eike.spielberg@uni-due.de".to_string(),
            default_account: String::new(),
            remote_timeout: Duration::from_secs(30),
        }
    }

    /// Set the sender address for notifications.
    pub fn with_from_address(mut self, from_address: impl Into<String>) -> Self {
        self.from_address = from_address.into();
        self
    }

    /// Set the default account for the forwarding endpoint.
    pub fn with_default_account(mut self, account: impl Into<String>) -> Self {
        self.default_account = account.into();
        self
    }

    /// Set the remote call timeout.
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }
}
