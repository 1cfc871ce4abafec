//! Tax identifier validation and normalization.
//!
//! Pure functions, no network access. Normalization strips spaces and
//! hyphens and uppercases; it is idempotent. Validation of Polish `PL`
//! EU VAT numbers delegates to the NIP checksum.

pub mod euvat;
pub mod nip;
