//! NIP — Polish tax identifier, 10 digits with a weighted checksum.

use regex::Regex;
use std::sync::LazyLock;

static NIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());

/// Checksum weights for digits 0–8; digit 9 is the check digit.
const WEIGHTS: [u32; 9] = [6, 5, 7, 2, 3, 4, 5, 6, 7];

/// Normalize a NIP: strip spaces and hyphens, require exactly 10 digits.
///
/// Returns `None` for anything that does not normalize to a valid shape.
pub fn normalize(number: &str) -> Option<String> {
    let cleaned: String = number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_uppercase();

    NIP_PATTERN.is_match(&cleaned).then_some(cleaned)
}

/// Check a NIP's weighted checksum. Unnormalizable input is simply invalid.
pub fn is_valid(number: &str) -> bool {
    let Some(nip) = normalize(number) else {
        return false;
    };

    let digits: Vec<u32> = nip.chars().filter_map(|c| c.to_digit(10)).collect();
    let sum: u32 = WEIGHTS.iter().zip(&digits).map(|(w, d)| w * d).sum();

    sum % 11 == digits[9]
}
