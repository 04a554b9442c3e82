//! Pure input validation
//!
//! These functions have no side effects; callers map the result to a
//! status code or a re-prompt.

/// Strict dotted-quad check: four groups of 1-3 ASCII digits, each at most 255.
///
/// Leading zeros are accepted (`010.0.0.1`), whitespace, signs and any other
/// character are not.
pub fn is_valid_ipv4(candidate: &str) -> bool {
    let octets: Vec<&str> = candidate.split('.').collect();
    if octets.len() != 4 {
        return false;
    }

    octets.iter().all(|octet| {
        (1..=3).contains(&octet.len())
            && octet.bytes().all(|b| b.is_ascii_digit())
            && octet.parse::<u16>().is_ok_and(|value| value <= 255)
    })
}
