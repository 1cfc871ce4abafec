//! EU VAT number validation — 2-letter country prefix plus a
//! country-specific body, checked against a fixed per-country table.

use regex::Regex;
use std::sync::LazyLock;

use crate::number::nip;

static EUVAT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}[A-Z0-9+*]{2,12}$").unwrap());

/// Per-country number patterns. Digit counts are part of the VIES
/// contract; `IE` and `NL` allow the `+`/`*` wildcard characters.
const COUNTRY_PATTERNS: &[(&str, &str)] = &[
    ("AT", r"^ATU\d{8}$"),
    ("BE", r"^BE[0-1]\d{9}$"),
    ("BG", r"^BG\d{9,10}$"),
    ("CY", r"^CY\d{8}[A-Z]$"),
    ("CZ", r"^CZ\d{8,10}$"),
    ("DE", r"^DE\d{9}$"),
    ("DK", r"^DK\d{8}$"),
    ("EE", r"^EE\d{9}$"),
    ("EL", r"^EL\d{9}$"),
    ("ES", r"^ES[A-Z0-9]\d{7}[A-Z0-9]$"),
    ("FI", r"^FI\d{8}$"),
    ("FR", r"^FR[A-Z0-9]{2}\d{9}$"),
    ("HR", r"^HR\d{11}$"),
    ("HU", r"^HU\d{8}$"),
    ("IE", r"^IE[A-Z0-9+*]{8,9}$"),
    ("IT", r"^IT\d{11}$"),
    ("LT", r"^LT\d{9,12}$"),
    ("LU", r"^LU\d{8}$"),
    ("LV", r"^LV\d{11}$"),
    ("MT", r"^MT\d{8}$"),
    ("NL", r"^NL[A-Z0-9+*]{12}$"),
    ("PL", r"^PL\d{10}$"),
    ("PT", r"^PT\d{9}$"),
    ("RO", r"^RO\d{2,10}$"),
    ("SE", r"^SE\d{12}$"),
    ("SI", r"^SI\d{8}$"),
    ("SK", r"^SK\d{10}$"),
    ("XI", r"^XI[A-Z0-9]{5,12}$"),
];

static COUNTRY_REGEX: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    COUNTRY_PATTERNS
        .iter()
        .map(|(cc, pat)| (*cc, Regex::new(pat).unwrap()))
        .collect()
});

/// Normalize an EU VAT number: strip spaces and hyphens, uppercase,
/// require a 2-letter prefix plus a 2–12 character alphanumeric body.
pub fn normalize(number: &str) -> Option<String> {
    let cleaned: String = number
        .chars()
        .filter(|c| *c != ' ' && *c != '-')
        .collect::<String>()
        .to_uppercase();

    EUVAT_PATTERN.is_match(&cleaned).then_some(cleaned)
}

/// Validate an EU VAT number against its country's pattern.
///
/// Unknown country prefixes are invalid. `PL` numbers additionally run
/// the NIP checksum over the 10-digit body.
pub fn is_valid(number: &str) -> bool {
    let Some(vat) = normalize(number) else {
        return false;
    };

    let cc = &vat[..2];
    let Some((_, re)) = COUNTRY_REGEX.iter().find(|(code, _)| *code == cc) else {
        return false;
    };

    if !re.is_match(&vat) {
        return false;
    }

    if cc == "PL" {
        return nip::is_valid(&vat[2..]);
    }

    true
}
