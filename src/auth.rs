//! MAC authorization header — per-request HMAC-SHA256 signature.
//!
//! Every request is signed over a canonical string binding timestamp,
//! random nonce, HTTP method, path, host, and port, so captured headers
//! cannot be replayed against another request.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use hmac::{Hmac, Mac};
use rand::RngCore;
use sha2::Sha256;
use url::Url;

use crate::error::{ClientError, code};

type HmacSha256 = Hmac<Sha256>;

/// Signs requests with the caller's API key pair.
#[derive(Debug, Clone)]
pub(crate) struct MacSigner {
    id: String,
    key: String,
}

impl MacSigner {
    pub(crate) fn new(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            key: key.into(),
        }
    }

    /// `Authorization` header value for one request.
    ///
    /// Timestamp and nonce are fresh on every call; a signature is never
    /// reused.
    pub(crate) fn header(&self, method: &str, url: &Url) -> Result<String, ClientError> {
        let host = url
            .host_str()
            .ok_or_else(|| ClientError::local_with(code::CLI_INPUT, "service URL has no host"))?;
        let port = url.port_or_known_default().unwrap_or(443);

        let ts = Utc::now().timestamp();
        let mut nonce_bytes = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = hex::encode(nonce_bytes);

        let mac = sign(&self.key, ts, &nonce, method, url.path(), host, port);

        Ok(format!(
            r#"MAC id="{}", ts="{ts}", nonce="{nonce}", mac="{mac}""#,
            self.id
        ))
    }
}

/// HMAC-SHA256 over the canonical request string, base64-encoded.
///
/// The canonical form ends with a mandatory empty line:
/// `ts \n nonce \n method \n path \n host \n port \n \n`.
fn sign(key: &str, ts: i64, nonce: &str, method: &str, path: &str, host: &str, port: u16) -> String {
    let canonical = format!("{ts}\n{nonce}\n{method}\n{path}\n{host}\n{port}\n\n");

    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(canonical.as_bytes());

    BASE64.encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_matches_known_vector() {
        let mac = sign(
            "test_key",
            1_577_836_800,
            "11223344",
            "GET",
            "/api/get/vies/PL7171642051",
            "viesapi.eu",
            443,
        );
        assert_eq!(mac, "uiLidFAJz9xGKy6VThFTAk7ZgvzgwJgAUX6ov7fkQ6I=");
    }

    #[test]
    fn signature_is_deterministic() {
        let a = sign("k", 1000, "aabbccdd", "GET", "/api", "viesapi.eu", 443);
        let b = sign("k", 1000, "aabbccdd", "GET", "/api", "viesapi.eu", 443);
        assert_eq!(a, b);
    }

    #[test]
    fn different_nonce_changes_signature() {
        let a = sign("k", 1000, "aabbccdd", "GET", "/api", "viesapi.eu", 443);
        let b = sign("k", 1000, "aabbccde", "GET", "/api", "viesapi.eu", 443);
        assert_ne!(a, b);
    }

    #[test]
    fn header_shape_and_fresh_nonces() {
        let signer = MacSigner::new("test_id", "test_key");
        let url = Url::parse("https://viesapi.eu/api-test/check/account/status").unwrap();

        let a = signer.header("GET", &url).unwrap();
        let b = signer.header("GET", &url).unwrap();

        assert!(a.starts_with(r#"MAC id="test_id", ts=""#));
        assert!(a.contains(r#", nonce=""#));
        assert!(a.contains(r#", mac=""#));
        // 4 random bytes per request; a collision within one test run
        // would mean the nonce is not being regenerated.
        assert_ne!(a, b);
    }

    #[test]
    fn default_ports_per_scheme() {
        let https = Url::parse("https://viesapi.eu/api").unwrap();
        let http = Url::parse("http://localhost/api").unwrap();
        let custom = Url::parse("http://localhost:8080/api").unwrap();
        assert_eq!(https.port_or_known_default(), Some(443));
        assert_eq!(http.port_or_known_default(), Some(80));
        assert_eq!(custom.port_or_known_default(), Some(8080));
    }
}
