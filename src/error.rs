//! Error catalog and the per-call error type.
//!
//! The VIES API uses numeric error codes partitioned into bands:
//! user/business errors (1–63) and backend auth errors (101–108) are
//! produced by the service and passed through verbatim; client errors
//! (201–209) are raised locally before or after the network call and
//! resolve their message from the catalog in this module.

use thiserror::Error;

/// Numeric error codes of the VIES API, including the local client band.
///
/// Code values are only meaningful within one client version; the service
/// bands (1–63, 101–108) are authoritative on the wire, the `CLI_*` band
/// exists purely client-side.
pub mod code {
    pub const NIP_EMPTY: i32 = 1;
    pub const NIP_UNKNOWN: i32 = 2;
    pub const GUS_LOGIN: i32 = 3;
    pub const GUS_CAPTCHA: i32 = 4;
    pub const GUS_SYNC: i32 = 5;
    pub const NIP_UPDATE: i32 = 6;
    pub const NIP_BAD: i32 = 7;
    pub const CONTENT_SYNTAX: i32 = 8;
    pub const NIP_NOT_ACTIVE: i32 = 9;
    pub const INVALID_PATH: i32 = 10;
    pub const EXCEPTION: i32 = 11;
    pub const NO_PERMISSION: i32 = 12;
    pub const GEN_INVOICES: i32 = 13;
    pub const GEN_SPEC_INV: i32 = 14;
    pub const SEND_INVOICE: i32 = 15;
    pub const PREMIUM_FEATURE: i32 = 16;
    pub const SEND_ANNOUNCEMENT: i32 = 17;
    pub const INVOICE_PAYMENT: i32 = 18;
    pub const REGON_BAD: i32 = 19;
    pub const SEARCH_KEY_EMPTY: i32 = 20;
    pub const KRS_BAD: i32 = 21;
    pub const EUVAT_BAD: i32 = 22;
    pub const VIES_SYNC: i32 = 23;
    pub const CEIDG_SYNC: i32 = 24;
    pub const RANDOM_NUMBER: i32 = 25;
    pub const PLAN_FEATURE: i32 = 26;
    pub const SEARCH_TYPE: i32 = 27;
    pub const PPUMF_SYNC: i32 = 28;
    pub const PPUMF_DIRECT: i32 = 29;
    pub const NIP_FEATURE: i32 = 30;
    pub const REGON_FEATURE: i32 = 31;
    pub const KRS_FEATURE: i32 = 32;
    pub const TEST_MODE: i32 = 33;
    pub const ACTIVITY_CHECK: i32 = 34;
    pub const ACCESS_DENIED: i32 = 35;
    pub const MAINTENANCE: i32 = 36;
    pub const BILLING_PLANS: i32 = 37;
    pub const DOCUMENT_PDF: i32 = 38;
    pub const EXPORT_PDF: i32 = 39;
    pub const RANDOM_TYPE: i32 = 40;
    pub const LEGAL_FORM: i32 = 41;
    pub const GROUP_CHECKS: i32 = 42;
    pub const CLIENT_COUNTERS: i32 = 43;
    pub const URE_SYNC: i32 = 44;
    pub const URE_DATA: i32 = 45;
    pub const DKN_BAD: i32 = 46;
    pub const SEND_REMAINDER: i32 = 47;
    pub const EXPORT_JPK: i32 = 48;
    pub const GEN_ORDER_INV: i32 = 49;
    pub const SEND_EXPIRATION: i32 = 50;
    pub const IBAN_SYNC: i32 = 51;
    pub const ORDER_CANCEL: i32 = 52;
    pub const WHITELIST_CHECK: i32 = 53;
    pub const AUTH_TIMESTAMP: i32 = 54;
    pub const AUTH_MAC: i32 = 55;
    pub const IBAN_BAD: i32 = 56;
    pub const BATCH_SIZE: i32 = 57;
    /// Batch still queued or running; the only non-terminal poll outcome.
    pub const BATCH_PROCESSING: i32 = 58;
    pub const BATCH_REJECTED: i32 = 59;
    pub const BATCH_ID: i32 = 60;
    pub const BATCH_EMPTY: i32 = 61;
    pub const BATCH_LOST: i32 = 62;
    pub const BATCH_EXPIRED: i32 = 63;

    pub const DB_AUTH_IP: i32 = 101;
    pub const DB_AUTH_KEY_STATUS: i32 = 102;
    pub const DB_AUTH_KEY_VALUE: i32 = 103;
    pub const DB_AUTH_OVER_PLAN: i32 = 104;
    pub const DB_CLIENT_LOCKED: i32 = 105;
    pub const DB_CLIENT_TYPE: i32 = 106;
    pub const DB_CLIENT_NOT_PAID: i32 = 107;
    pub const DB_AUTH_KEYID_VALUE: i32 = 108;

    pub const CLI_CONNECT: i32 = 201;
    pub const CLI_RESPONSE: i32 = 202;
    pub const CLI_NUMBER: i32 = 203;
    pub const CLI_NIP: i32 = 204;
    pub const CLI_EUVAT: i32 = 205;
    pub const CLI_EXCEPTION: i32 = 206;
    pub const CLI_DATEFORMAT: i32 = 207;
    pub const CLI_INPUT: i32 = 208;
    pub const CLI_BATCH_SIZE: i32 = 209;
}

/// Catalog message for a local client error code.
///
/// Returns `None` for codes outside the `CLI_*` band — those messages
/// arrive with the service response and are not known to the client.
pub fn message(code: i32) -> Option<&'static str> {
    match code {
        code::CLI_CONNECT => Some("Failed to connect to the VIES API service"),
        code::CLI_RESPONSE => Some("VIES API service response has invalid format"),
        code::CLI_NUMBER => Some("Invalid number type"),
        code::CLI_NIP => Some("NIP is invalid"),
        code::CLI_EUVAT => Some("EU VAT ID is invalid"),
        code::CLI_EXCEPTION => Some("Function generated an exception"),
        code::CLI_DATEFORMAT => Some("Date has an invalid format"),
        code::CLI_INPUT => Some("Invalid input parameter"),
        code::CLI_BATCH_SIZE => Some("Batch size limit exceeded [2-99]"),
        _ => None,
    }
}

/// Failure of a single client operation.
///
/// Every public operation returns `Result<_, ClientError>`; there is no
/// shared last-error state, so a client instance can serve concurrent
/// calls without external locking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Raised locally: bad input, transport failure, malformed response.
    #[error("{message} (code {code})")]
    Local { code: i32, message: String },

    /// Reported by the VIES API service, passed through verbatim.
    #[error("{description} (code {code})")]
    Remote { code: i32, description: String },
}

impl ClientError {
    /// Local error with its catalog message.
    pub(crate) fn local(code: i32) -> Self {
        Self::Local {
            code,
            message: message(code).unwrap_or_default().to_string(),
        }
    }

    /// Local error with the underlying reason as message.
    pub(crate) fn local_with(code: i32, message: impl Into<String>) -> Self {
        Self::Local {
            code,
            message: message.into(),
        }
    }

    pub(crate) fn remote(code: i32, description: impl Into<String>) -> Self {
        Self::Remote {
            code,
            description: description.into(),
        }
    }

    /// Numeric error code, local or remote.
    pub fn code(&self) -> i32 {
        match self {
            Self::Local { code, .. } | Self::Remote { code, .. } => *code,
        }
    }

    /// Human-readable message (catalog text or service description).
    pub fn message(&self) -> &str {
        match self {
            Self::Local { message, .. } => message,
            Self::Remote { description, .. } => description,
        }
    }

    /// True for errors raised before or around the network call.
    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local { .. })
    }
}
