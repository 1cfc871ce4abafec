//! VIES API client facade — one operation per service endpoint.

use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::auth::MacSigner;
use crate::error::{ClientError, code};
use crate::model::{AccountStatus, BatchResult, ViesData};
use crate::number::euvat;
use crate::transport::{HttpResponse, Transport};
use crate::xml::{self, Document};

/// Production service URL.
pub const PRODUCTION_URL: &str = "https://viesapi.eu/api";

/// Public test system with fixed credentials — see [`ViesApiClient::sandbox`].
pub const TEST_URL: &str = "https://viesapi.eu/api-test";

const TEST_ID: &str = "test_id";
const TEST_KEY: &str = "test_key";

const BATCH_MIN: usize = 2;
const BATCH_MAX: usize = 99;

/// Outcome of one batch poll.
///
/// `Pending` is the only non-terminal state: the service reported the
/// distinguished "batch processing" code and the caller should poll
/// again after a delay. Every terminal failure is a [`ClientError`].
#[derive(Debug, Clone, PartialEq)]
pub enum BatchPoll {
    Pending,
    Ready(BatchResult),
}

/// Client for the VIES API.
///
/// Holds no per-call state; every operation returns its result or a
/// structured [`ClientError`], so one instance can serve concurrent
/// calls. Each operation is a single blocking round trip.
pub struct ViesApiClient {
    base_url: Url,
    transport: Transport,
}

impl ViesApiClient {
    /// Client for the production system with the caller's API key pair.
    pub fn new(id: impl Into<String>, key: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_url(PRODUCTION_URL, id, key)
    }

    /// Client for the public test system (fixed `test_id`/`test_key`
    /// credentials, limited test data set).
    pub fn sandbox() -> Result<Self, ClientError> {
        Self::with_url(TEST_URL, TEST_ID, TEST_KEY)
    }

    fn with_url(
        url: &str,
        id: impl Into<String>,
        key: impl Into<String>,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(url)
            .map_err(|e| ClientError::local_with(code::CLI_INPUT, format!("invalid URL: {e}")))?;
        let transport = Transport::new(MacSigner::new(id, key))?;
        Ok(Self { base_url, transport })
    }

    /// Override the service base URL (self-hosted proxies, tests).
    pub fn set_base_url(&mut self, url: &str) -> Result<(), ClientError> {
        self.base_url = Url::parse(url)
            .map_err(|e| ClientError::local_with(code::CLI_INPUT, format!("invalid URL: {e}")))?;
        Ok(())
    }

    /// Check a single EU VAT number against VIES.
    pub fn get_vies_data(&self, euvat: &str) -> Result<ViesData, ClientError> {
        let number = validate_euvat(euvat)?;
        let doc = self.get_doc(&format!("get/vies/{number}"))?;
        ViesData::from_doc(&doc, "/result/vies")
    }

    /// Check a single EU VAT number and request the trader name and
    /// address parsed into structured components.
    pub fn get_vies_data_parsed(&self, euvat: &str) -> Result<ViesData, ClientError> {
        let number = validate_euvat(euvat)?;
        let doc = self.get_doc(&format!("get/vies/parsed/{number}"))?;
        ViesData::from_doc(&doc, "/result/vies")
    }

    /// Submit a batch of 2–99 EU VAT numbers for asynchronous checking.
    ///
    /// Returns the batch token to poll with
    /// [`get_vies_data_async_result`](Self::get_vies_data_async_result).
    /// Size violations and the first invalid number abort the submission
    /// before any network call.
    pub fn get_vies_data_async(&self, numbers: &[&str]) -> Result<String, ClientError> {
        if !(BATCH_MIN..=BATCH_MAX).contains(&numbers.len()) {
            return Err(ClientError::local(code::CLI_BATCH_SIZE));
        }

        let normalized = numbers
            .iter()
            .map(|n| validate_euvat(n))
            .collect::<Result<Vec<_>, _>>()?;

        let body = xml::batch_request_body(&normalized)?;
        let doc = self.post_doc("batch/vies", body)?;

        let token = doc.text("/result/batch/token");
        if token.is_empty() {
            return Err(ClientError::local(code::CLI_RESPONSE));
        }

        debug!(%token, count = normalized.len(), "batch submitted");
        Ok(token)
    }

    /// Poll a submitted batch.
    ///
    /// Returns `Ok(BatchPoll::Pending)` while the service is still
    /// processing; the caller decides the polling cadence. The token
    /// must be a syntactically valid UUID.
    pub fn get_vies_data_async_result(&self, token: &str) -> Result<BatchPoll, ClientError> {
        if Uuid::parse_str(token).is_err() {
            return Err(ClientError::local(code::CLI_INPUT));
        }

        poll_outcome(self.get_doc(&format!("batch/vies/{token}")))
    }

    /// Current account status: plan attributes and usage counters.
    pub fn get_account_status(&self) -> Result<AccountStatus, ClientError> {
        let doc = self.get_doc("check/account/status")?;
        AccountStatus::from_doc(&doc)
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        let joined = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined)
            .map_err(|e| ClientError::local_with(code::CLI_INPUT, format!("invalid URL: {e}")))
    }

    fn get_doc(&self, path: &str) -> Result<Document, ClientError> {
        let url = self.endpoint(path)?;
        let resp = self.transport.get(&url)?;
        classify_response(resp)
    }

    fn post_doc(&self, path: &str, body: String) -> Result<Document, ClientError> {
        let url = self.endpoint(path)?;
        let resp = self.transport.post(&url, body)?;
        classify_response(resp)
    }
}

/// Validate and normalize an EU VAT number before building a path.
fn validate_euvat(number: &str) -> Result<String, ClientError> {
    let Some(normalized) = euvat::normalize(number) else {
        return Err(ClientError::local(code::CLI_EUVAT));
    };
    if !euvat::is_valid(&normalized) {
        return Err(ClientError::local(code::CLI_EUVAT));
    }
    Ok(normalized)
}

/// Turn a raw HTTP response into a document or an error.
///
/// The body is parsed regardless of status — the service returns
/// structured XML error documents even on failure, and an embedded
/// `<result><error>` always wins. A non-2xx response without one is a
/// generic exception carrying the status line; an unparseable 2xx body
/// is a response-format error.
fn classify_response(resp: HttpResponse) -> Result<Document, ClientError> {
    let success = resp.status.is_success();
    match Document::parse(&resp.body) {
        Ok(doc) => {
            if let Some(err) = doc.service_error() {
                debug!(code = err.code(), "service error");
                return Err(err);
            }
            if !success {
                return Err(ClientError::local_with(
                    code::CLI_EXCEPTION,
                    resp.status.to_string(),
                ));
            }
            Ok(doc)
        }
        Err(reason) => {
            debug!(%reason, status = %resp.status, "unparseable response");
            if success {
                Err(ClientError::local(code::CLI_RESPONSE))
            } else {
                Err(ClientError::local_with(
                    code::CLI_EXCEPTION,
                    resp.status.to_string(),
                ))
            }
        }
    }
}

/// Map the distinguished "batch processing" service code to `Pending`;
/// everything else is terminal.
fn poll_outcome(result: Result<Document, ClientError>) -> Result<BatchPoll, ClientError> {
    match result {
        Ok(doc) => Ok(BatchPoll::Ready(BatchResult::from_doc(&doc)?)),
        Err(e) if !e.is_local() && e.code() == code::BATCH_PROCESSING => {
            debug!("batch still processing");
            Ok(BatchPoll::Pending)
        }
        Err(e) => Err(e),
    }
}
