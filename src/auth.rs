//! Authentication credentials for the ELi:SA API.
//!
//! ELi:SA authenticates callers with a keyed content hash: the caller id,
//! a compact UTC timestamp and the shared secret are concatenated and
//! digested with MD5. MD5 is what the remote protocol prescribes; it is a
//! compatibility requirement, not a security choice of this crate.
//!
//! The protocol has a timestamp quirk: the instant is transmitted with
//! separators (`2024-05-01T12:00:00Z`) but hashed without them
//! (`20240501T120000Z`). Both forms must describe the same second.

use chrono::{DateTime, Utc};
use md5::{Digest, Md5};

/// Format of the timestamp transmitted alongside the hash.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format of the timestamp fed into the hash.
pub const COMPACT_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Signed credential for a single authentication call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCredential {
    /// Caller id assigned by the remote service operator.
    pub caller_id: String,
    /// UTC timestamp in transmitted form, second precision.
    pub timestamp: String,
    /// Hex-encoded MD5 over `caller_id + compact_timestamp + secret`.
    pub hash: String,
}

/// Sign a credential for the given instant.
///
/// Deterministic for a fixed instant; the remote service is the authority
/// on how long the credential stays valid.
pub fn sign(caller_id: &str, secret: &str, instant: DateTime<Utc>) -> AuthCredential {
    let timestamp = instant.format(TIMESTAMP_FORMAT).to_string();
    let compact = instant.format(COMPACT_TIMESTAMP_FORMAT).to_string();

    let mut hasher = Md5::new();
    hasher.update(caller_id.as_bytes());
    hasher.update(compact.as_bytes());
    hasher.update(secret.as_bytes());

    AuthCredential {
        caller_id: caller_id.to_string(),
        timestamp,
        hash: hex::encode(hasher.finalize()),
    }
}

/// Sign a credential for the current instant.
pub fn sign_now(caller_id: &str, secret: &str) -> AuthCredential {
    sign(caller_id, secret, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, TimeZone};

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sign_is_deterministic() {
        let a = sign("caller", "secret", fixed_instant());
        let b = sign("caller", "secret", fixed_instant());
        assert_eq!(a, b);
        // MD5 digest is 16 bytes = 32 hex chars
        assert_eq!(a.hash.len(), 32);
    }

    #[test]
    fn test_hash_covers_compact_timestamp() {
        let credential = sign("caller", "secret", fixed_instant());

        let mut hasher = Md5::new();
        hasher.update(b"caller");
        hasher.update(b"20240501T120000Z");
        hasher.update(b"secret");
        assert_eq!(credential.hash, hex::encode(hasher.finalize()));

        assert_eq!(credential.timestamp, "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_adjacent_seconds_differ() {
        let a = sign("caller", "secret", fixed_instant());
        let b = sign(
            "caller",
            "secret",
            fixed_instant() + chrono::Duration::seconds(1),
        );
        assert_ne!(a.hash, b.hash);
        assert_ne!(a.timestamp, b.timestamp);
    }

    #[test]
    fn test_both_formats_describe_the_same_instant() {
        let instant = fixed_instant();
        let transmitted = instant.format(TIMESTAMP_FORMAT).to_string();
        let compact = instant.format(COMPACT_TIMESTAMP_FORMAT).to_string();

        let from_transmitted =
            NaiveDateTime::parse_from_str(&transmitted, TIMESTAMP_FORMAT).unwrap();
        let from_compact =
            NaiveDateTime::parse_from_str(&compact, COMPACT_TIMESTAMP_FORMAT).unwrap();

        assert_eq!(from_transmitted, from_compact);
        assert_eq!(from_transmitted, instant.naive_utc());
    }
}
