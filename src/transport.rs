//! Blocking HTTP transport with MAC-signed headers.
//!
//! The transport only surfaces network-level failures; response bodies
//! are returned untouched together with the status, because the service
//! emits structured XML error documents even on non-2xx responses.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header;
use tracing::debug;
use url::Url;

use crate::auth::MacSigner;
use crate::error::{ClientError, code};

const USER_AGENT: &str = concat!(
    "VIESAPIClient-Rust/",
    env!("CARGO_PKG_VERSION"),
    " reqwest/0.12"
);

pub(crate) struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

pub(crate) struct Transport {
    http: reqwest::blocking::Client,
    signer: MacSigner,
}

impl Transport {
    pub(crate) fn new(signer: MacSigner) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::local_with(code::CLI_EXCEPTION, e.to_string()))?;

        Ok(Self { http, signer })
    }

    pub(crate) fn get(&self, url: &Url) -> Result<HttpResponse, ClientError> {
        let auth = self.signer.header("GET", url)?;
        debug!(%url, "GET");

        let resp = self
            .http
            .get(url.clone())
            .header(header::ACCEPT, "text/xml")
            .header(header::AUTHORIZATION, auth)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .map_err(network_error)?;

        let status = resp.status();
        let body = resp.bytes().map_err(network_error)?.to_vec();
        debug!(%status, bytes = body.len(), "response");

        Ok(HttpResponse { status, body })
    }

    pub(crate) fn post(&self, url: &Url, body: String) -> Result<HttpResponse, ClientError> {
        let auth = self.signer.header("POST", url)?;
        debug!(%url, bytes = body.len(), "POST");

        let resp = self
            .http
            .post(url.clone())
            .header(header::ACCEPT, "text/xml")
            .header(header::AUTHORIZATION, auth)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .body(body)
            .send()
            .map_err(network_error)?;

        let status = resp.status();
        let body = resp.bytes().map_err(network_error)?.to_vec();
        debug!(%status, bytes = body.len(), "response");

        Ok(HttpResponse { status, body })
    }
}

/// DNS, connect, TLS, and timeout failures; distinct from HTTP-status
/// errors, which carry a parseable body and are classified by the caller.
fn network_error(e: reqwest::Error) -> ClientError {
    if e.is_connect() || e.is_timeout() {
        ClientError::local_with(code::CLI_CONNECT, e.to_string())
    } else {
        ClientError::local_with(code::CLI_EXCEPTION, e.to_string())
    }
}
