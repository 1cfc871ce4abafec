//! # vies-client
//!
//! Client for the [VIES API](https://viesapi.eu) — EU VAT number
//! verification with MAC-signed requests, single and batch checks, and
//! client-side NIP / EU VAT validation.
//!
//! Every request carries a per-request HMAC-SHA256 `Authorization`
//! header binding timestamp, nonce, method, path, host, and port.
//! Identifiers are validated and normalized locally before any network
//! call; responses are XML documents parsed into typed results.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vies_client::{BatchPoll, ViesApiClient};
//!
//! # fn main() -> Result<(), vies_client::ClientError> {
//! // Public test system; use ViesApiClient::new(id, key) for production.
//! let client = ViesApiClient::sandbox()?;
//!
//! let vies = client.get_vies_data("PL7171642051")?;
//! println!("{} valid: {}", vies.vat_number, vies.valid);
//!
//! // Batch flow: submit 2-99 numbers, then poll with the token.
//! let token = client.get_vies_data_async(&["PL7171642051", "DE123456789"])?;
//! loop {
//!     match client.get_vies_data_async_result(&token)? {
//!         BatchPoll::Pending => std::thread::sleep(std::time::Duration::from_secs(10)),
//!         BatchPoll::Ready(batch) => {
//!             println!("{} checked, {} failed", batch.numbers.len(), batch.errors.len());
//!             break;
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Offline validation
//!
//! ```rust
//! use vies_client::number::{euvat, nip};
//!
//! assert_eq!(euvat::normalize("pl 717-164-2051").as_deref(), Some("PL7171642051"));
//! assert!(euvat::is_valid("PL7171642051"));
//! assert!(nip::is_valid("7171642051"));
//! ```

mod auth;
mod client;
mod error;
mod model;
pub mod number;
mod transport;
mod xml;

pub use client::{BatchPoll, PRODUCTION_URL, TEST_URL, ViesApiClient};
pub use error::{ClientError, code, message};
pub use model::{
    AccountStatus, AddressComponents, BatchResult, LegalForm, NameComponents, ViesData, ViesError,
};
