//! Shared HTTP plumbing for upstream read APIs.

use serde::de::DeserializeOwned;

use crate::fetch::{FetchError, FetchResult};

/// GET a JSON document, classifying the failure at the point it is
/// observed: 429 is a rate-limit signal, any other non-success status
/// keeps its code, connection failures are transport errors, and a body
/// that does not parse is a decode error.
pub(crate) async fn get_json<D: DeserializeOwned>(
    http: &reqwest::Client,
    url: url::Url,
) -> FetchResult<D> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if status.as_u16() == 429 {
        return Err(FetchError::RateLimited);
    }
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    response
        .json::<D>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// Build a reqwest client with the given request timeout.
pub(crate) fn build_client(timeout_secs: u64) -> FetchResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| FetchError::Transport(e.to_string()))
}
