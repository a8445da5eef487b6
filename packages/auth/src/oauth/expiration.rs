// ABOUTME: Refresh-token expiration policy
// ABOUTME: One-day safety margin and seconds-to-timestamp conversion

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use modwatch_config::destiny::REFRESH_SAFETY_MARGIN_DAYS;
use tracing::warn;

use crate::error::{AuthError, AuthResult};

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Whether a refresh token stored with `stored_expiration` must be rotated at `now`.
///
/// The token is rotated once `now` passes one day before its expiration. An expiration
/// that cannot be parsed is treated as due.
pub fn needs_refresh(stored_expiration: &str, now: DateTime<Utc>) -> bool {
    match DateTime::parse_from_rfc3339(stored_expiration) {
        Ok(expiration) => {
            let effective = expiration.with_timezone(&Utc) - Duration::days(REFRESH_SAFETY_MARGIN_DAYS);
            now > effective
        }
        Err(e) => {
            warn!(
                "Unparsable refresh expiration '{}' ({}), refreshing",
                stored_expiration, e
            );
            true
        }
    }
}

/// Absolute expiration for a refresh token that lives `lifetime_secs` seconds from `now`.
///
/// Whole days only: the lifetime is divided by 86400 and truncated.
pub fn expiration_from_lifetime(lifetime_secs: &str, now: DateTime<Utc>) -> AuthResult<String> {
    let seconds: f64 = lifetime_secs
        .trim()
        .parse()
        .map_err(|_| AuthError::InvalidLifetime(lifetime_secs.to_string()))?;

    if !seconds.is_finite() {
        return Err(AuthError::InvalidLifetime(lifetime_secs.to_string()));
    }

    let days = (seconds / SECONDS_PER_DAY).trunc() as i64;
    let expiration = Duration::try_days(days)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| AuthError::InvalidLifetime(lifetime_secs.to_string()))?;

    Ok(format_expiration(expiration))
}

/// `YYYY-MM-DDTHH:MM:SSZ`, no fractional seconds.
pub fn format_expiration(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn frozen_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 14, 25, 36).unwrap()
            + Duration::milliseconds(789)
    }

    #[rstest]
    #[case("7776000", "2026-06-08T14:25:36Z")] // 90 days
    #[case("86400", "2026-03-11T14:25:36Z")]
    #[case("86399", "2026-03-10T14:25:36Z")] // under a day truncates to zero
    #[case("0", "2026-03-10T14:25:36Z")]
    #[case("172800.5", "2026-03-12T14:25:36Z")]
    fn test_expiration_from_lifetime(#[case] lifetime: &str, #[case] expected: &str) {
        assert_eq!(
            expiration_from_lifetime(lifetime, frozen_now()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_expiration_is_deterministic_for_frozen_clock() {
        let now = frozen_now();
        let first = expiration_from_lifetime("7776000", now).unwrap();
        let second = expiration_from_lifetime("7776000", now).unwrap();
        assert_eq!(first, second);
        assert!(!first.contains('.'));
        assert!(first.ends_with('Z'));
        assert_eq!(first.len(), "YYYY-MM-DDTHH:MM:SSZ".len());
    }

    #[rstest]
    #[case("")]
    #[case("ninety days")]
    #[case("NaN")]
    #[case("1e300")]
    fn test_invalid_lifetime_rejected(#[case] lifetime: &str) {
        assert!(matches!(
            expiration_from_lifetime(lifetime, frozen_now()),
            Err(AuthError::InvalidLifetime(_))
        ));
    }

    #[test]
    fn test_not_due_outside_margin() {
        let now = frozen_now();
        let expiration = format_expiration(now + Duration::days(2));
        assert!(!needs_refresh(&expiration, now));
    }

    #[test]
    fn test_due_inside_margin() {
        let now = frozen_now();
        let expiration = format_expiration(now + Duration::hours(23));
        assert!(needs_refresh(&expiration, now));
    }

    #[test]
    fn test_due_when_expired() {
        let now = frozen_now();
        let expiration = format_expiration(now - Duration::days(3));
        assert!(needs_refresh(&expiration, now));
    }

    #[test]
    fn test_margin_edge_is_not_due() {
        // now == expiration - 1 day is not strictly later
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        assert!(!needs_refresh("2026-03-11T00:00:00Z", now));
        assert!(needs_refresh("2026-03-11T00:00:00Z", now + Duration::seconds(1)));
    }

    #[test]
    fn test_unparsable_expiration_is_due() {
        assert!(needs_refresh("expiration", frozen_now()));
    }

    #[test]
    fn test_format_expiration_drops_fraction() {
        assert_eq!(format_expiration(frozen_now()), "2026-03-10T14:25:36Z");
    }
}
