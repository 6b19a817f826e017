//! Message identifiers and timestamps

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Length of the random suffix on generated message ids.
pub const MESSAGE_ID_SUFFIX_LEN: usize = 9;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a correlation id of the form `<prefix>_<epoch-ms>_<base36>`.
///
/// Uniqueness is best-effort; collisions are not detected.
pub fn generate_message_id(prefix: &str) -> String {
    generate_message_id_at(prefix, Utc::now().timestamp_millis(), &mut rand::rng())
}

/// Deterministic variant of [`generate_message_id`] for a given clock and RNG.
pub fn generate_message_id_at<R: Rng + ?Sized>(prefix: &str, epoch_ms: i64, rng: &mut R) -> String {
    let suffix: String = (0..MESSAGE_ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}", prefix, epoch_ms, suffix)
}

/// ISO-8601 rendering with millisecond precision and a `Z` suffix.
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time, formatted by [`format_timestamp`].
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_message_id_shape() {
        let id = generate_message_id("email");
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "email");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), MESSAGE_ID_SUFFIX_LEN);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_message_id_is_deterministic_for_seed() {
        let a = generate_message_id_at("sms", 1_700_000_000_000, &mut StdRng::seed_from_u64(7));
        let b = generate_message_id_at("sms", 1_700_000_000_000, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(a.starts_with("sms_1700000000000_"));
    }

    #[test]
    fn test_format_timestamp_matches_iso() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-02T03:04:05.000Z");
    }
}
