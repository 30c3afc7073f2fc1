//! Per-call authentication digest.
//!
//! Every remote call is signed with an MD5 digest of the API secret, the
//! method name, the first method argument, and a 12-second time window.
//! The server recomputes the same digest to validate the call, so the exact
//! concatenation order with no separators is a wire-compatibility
//! requirement.

use std::time::{SystemTime, UNIX_EPOCH};

/// Width of the authentication time window in seconds.
pub const WINDOW_SECS: u64 = 12;

/// The current authentication window: `floor(unix_seconds / 12)`.
pub fn current_window() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    now / WINDOW_SECS
}

/// Compute the authentication token for one call.
///
/// `first_value` is the first method argument rendered as a plain string,
/// or the empty string when the call carries no arguments.
pub fn auth_token(api_secret: &str, method: &str, first_value: &str, window: u64) -> String {
    let input = format!("{}{}{}{}", api_secret, method, first_value, window);
    format!("{:x}", md5::compute(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "fedcba9876543210fedcba9876543210";

    #[test]
    fn test_token_is_lowercase_hex() {
        let token = auth_token(SECRET, "estimate_rate", "5", 142007473);
        assert_eq!(token.len(), 32);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_token_deterministic_within_window() {
        let a = auth_token(SECRET, "estimate_rate", "5", 142007473);
        let b = auth_token(SECRET, "estimate_rate", "5", 142007473);
        assert_eq!(a, b);
    }

    #[test]
    fn test_token_changes_across_windows() {
        let a = auth_token(SECRET, "estimate_rate", "5", 142007473);
        let b = auth_token(SECRET, "estimate_rate", "5", 142007474);
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_depends_on_method_and_first_value() {
        let base = auth_token(SECRET, "estimate_rate", "5", 142007473);
        assert_ne!(base, auth_token(SECRET, "get_soul_mates", "5", 142007473));
        assert_ne!(base, auth_token(SECRET, "estimate_rate", "6", 142007473));
        assert_ne!(base, auth_token(SECRET, "estimate_rate", "", 142007473));
    }

    #[test]
    fn test_window_granularity() {
        // Times 12 seconds apart always fall in adjacent (distinct) windows.
        let t = 1_704_067_200u64;
        assert_eq!(t / WINDOW_SECS + 1, (t + 12) / WINDOW_SECS);
        // Times in the same 12-second bucket share a window.
        assert_eq!(t / WINDOW_SECS, (t + 11) / WINDOW_SECS);
    }
}
